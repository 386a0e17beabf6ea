//! Renderer boundary and the static stage layout handed to it.
//!
//! The core never draws. A host implements [`FrameRenderer`] on top of
//! whatever surface it owns and receives one complete [`FrameState`] per tick.

use crate::config::{Color, DisplaySettings, LyricPosition};
use crate::curve::{Point, Viewport};
use crate::error::RenderError;
use crate::playback::FrameState;
use crate::session::ProjectInfo;
use const_format::concatcp;

/// Credit line drawn at the bottom center
pub const FOOTER_TEXT: &str = concatcp!("ustplayer v", env!("CARGO_PKG_VERSION"));

/// Font stack used for all text
pub const FONT_FAMILY: &str = "\"DengXian\", \"Microsoft YaHei\", \"Noto Sans CJK SC\", sans-serif";

const NOTE_NAME_ALPHA: u8 = 90;
const FOOTER_ALPHA: u8 = 100;
const FOOTER_GRAY: u8 = 195;
const CUE_GRAY: u8 = 180;
const SMALL_FONT_SIZE: f64 = 14.0;
const FOOTER_FONT_SIZE: f64 = 12.0;
const EDGE_MARGIN: f64 = 20.0;
const HEADER_LINE_STEP: f64 = 25.0;
const CUE_WRAP_MARGIN: f64 = 200.0;
const CURVE_STROKE_WIDTH: f64 = 5.0;

/// Consumer of frames.
///
/// Each call replaces everything drawn by the previous call. Empty text and
/// an empty curve mean the element is not drawn.
pub trait FrameRenderer {
    /// Draw `frame`, replacing the previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the surface could not be updated. The tick driver
    /// logs it and carries on with the next tick.
    fn render(&mut self, frame: &FrameState) -> Result<(), RenderError>;
}

/// Font size, color and weight of one kind of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub color: Color,
    pub bold: bool,
}

/// A fixed piece of text at a fixed position
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: Point,
}

/// Static drawing values derived once from the screen size and settings.
#[derive(Debug, Clone, PartialEq)]
pub struct StageLayout {
    pub viewport: Viewport,
    /// Anchor of the lyric and note name
    pub center: Point,
    pub background: Color,
    pub note_name: TextStyle,
    pub lyric: TextStyle,
    pub cue: TextStyle,
    pub cue_anchor: Point,
    pub cue_wrap_width: f64,
    /// Header, BPM and play-time text
    pub small: TextStyle,
    /// Song name and authors, top-left and stacked downwards
    pub header_lines: Vec<Label>,
    /// Top-right, anchored at its right edge
    pub bpm_label: Option<Label>,
    /// Bottom-left, anchored at its bottom edge
    pub play_time_anchor: Point,
    pub footer: Label,
    pub footer_style: TextStyle,
    pub curve_stroke_width: f64,
    pub curve_color: Color,
}

impl StageLayout {
    #[must_use]
    pub fn new(
        viewport: Viewport,
        settings: &DisplaySettings,
        project: &ProjectInfo,
        tempo: f64,
    ) -> Self {
        let Viewport { width, height } = viewport;
        let show = settings.show;

        let small = TextStyle {
            size: SMALL_FONT_SIZE,
            color: settings.text_color,
            bold: false,
        };

        let header_lines = [
            (show.song_name, &project.song_name),
            (show.song_author, &project.song_author),
            (show.ust_author, &project.ust_author),
        ]
        .into_iter()
        .filter(|(shown, text)| *shown && !text.is_empty())
        .zip(0_u32..)
        .map(|((_, text), row)| Label {
            text: text.clone(),
            position: Point::new(
                EDGE_MARGIN,
                HEADER_LINE_STEP.mul_add(f64::from(row), EDGE_MARGIN),
            ),
        })
        .collect();

        let cue_y = match settings.lyric_position {
            LyricPosition::Above => height * 0.3,
            LyricPosition::Below => height * 0.7,
        };

        Self {
            viewport,
            center: viewport.center(),
            background: settings.background_color,
            note_name: TextStyle {
                size: (height * 2.0 / 3.0 * 0.4).floor().max(50.0),
                color: settings.note_color.dimmed(NOTE_NAME_ALPHA),
                bold: true,
            },
            lyric: TextStyle {
                size: (height * 2.0 / 3.0 * 0.2).floor().max(80.0),
                color: settings.lyric_color,
                bold: true,
            },
            cue: TextStyle {
                size: (height * 0.03).floor().max(10.0),
                color: Color::gray(CUE_GRAY),
                bold: false,
            },
            cue_anchor: Point::new((width / 2.0).floor(), cue_y),
            cue_wrap_width: (width - CUE_WRAP_MARGIN).max(0.0),
            small,
            header_lines,
            bpm_label: show.bpm.then(|| Label {
                text: format!("BPM={tempo}"),
                position: Point::new(width - EDGE_MARGIN, EDGE_MARGIN),
            }),
            play_time_anchor: Point::new(EDGE_MARGIN, height - EDGE_MARGIN),
            footer: Label {
                text: FOOTER_TEXT.to_string(),
                position: Point::new((width / 2.0).floor(), height - EDGE_MARGIN),
            },
            footer_style: TextStyle {
                size: FOOTER_FONT_SIZE,
                color: Color::gray(FOOTER_GRAY).dimmed(FOOTER_ALPHA),
                bold: false,
            },
            curve_stroke_width: CURVE_STROKE_WIDTH,
            curve_color: settings.text_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> ProjectInfo {
        ProjectInfo {
            song_name: "Song".to_string(),
            song_author: String::new(),
            ust_author: "Tuner".to_string(),
        }
    }

    #[test]
    fn test_font_sizes_full_hd() {
        let layout = StageLayout::new(
            Viewport::new(1920.0, 1080.0),
            &DisplaySettings::default(),
            &project(),
            120.0,
        );
        assert!((layout.note_name.size - 288.0).abs() < f64::EPSILON);
        assert!((layout.lyric.size - 144.0).abs() < f64::EPSILON);
        assert!((layout.cue.size - 32.0).abs() < f64::EPSILON);
        assert_eq!(layout.center, Point::new(960.0, 540.0));
    }

    #[test]
    fn test_font_size_minimums() {
        let layout = StageLayout::new(
            Viewport::new(320.0, 240.0),
            &DisplaySettings::default(),
            &project(),
            120.0,
        );
        assert!((layout.note_name.size - 64.0).abs() < f64::EPSILON);
        assert!((layout.lyric.size - 80.0).abs() < f64::EPSILON);
        assert!((layout.cue.size - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_header_skips_empty_and_hidden_lines() {
        let layout = StageLayout::new(
            Viewport::default(),
            &DisplaySettings::default(),
            &project(),
            120.0,
        );
        let texts: Vec<_> = layout.header_lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["Song", "Tuner"]);
        assert_eq!(layout.header_lines[1].position, Point::new(20.0, 45.0));

        let mut settings = DisplaySettings::default();
        settings.show.song_name = false;
        settings.show.bpm = false;
        let layout = StageLayout::new(Viewport::default(), &settings, &project(), 120.0);
        assert_eq!(layout.header_lines.len(), 1);
        assert_eq!(layout.header_lines[0].position, Point::new(20.0, 20.0));
        assert!(layout.bpm_label.is_none());
    }

    #[test]
    fn test_bpm_label_and_cue_position() {
        let mut settings = DisplaySettings::default();
        settings.lyric_position = LyricPosition::Below;
        let layout = StageLayout::new(Viewport::new(1000.0, 1000.0), &settings, &project(), 145.5);

        assert_eq!(layout.bpm_label.map(|l| l.text).as_deref(), Some("BPM=145.5"));
        assert!((layout.cue_anchor.y - 700.0).abs() < 1e-9);
        assert!((layout.cue_wrap_width - 800.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_note_name_color_is_dimmed() {
        let layout = StageLayout::new(
            Viewport::default(),
            &DisplaySettings::default(),
            &project(),
            120.0,
        );
        assert_eq!(layout.note_name.color, Color::gray(0x44));
    }
}
