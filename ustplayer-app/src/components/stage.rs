use crate::state::StageState;
use dioxus::prelude::*;
use ustplayer_core::{Point, TextStyle, FONT_FAMILY};

/// How a piece of text hangs off its anchor point
#[derive(Clone, Copy)]
enum Anchor {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomCenter,
    Center,
}

/// Full-screen karaoke stage: note name, lyric, pitch curve, lyric line,
/// header, BPM, play time and credit line.
#[component]
pub fn Stage() -> Element {
    let stage = use_context::<StageState>();
    let layout = stage.layout.read();
    let frame = stage.frame.read();

    let width = layout.viewport.width;
    let height = layout.viewport.height;
    let curve_points = polyline_points(&frame.curve);
    let curve_color = layout.curve_color.to_hex();
    let cue_style = format!(
        "{} max-width: {}px; text-align: center; white-space: pre-wrap;",
        text_css(&layout.cue, layout.cue_anchor, Anchor::Center, width, height),
        layout.cue_wrap_width
    );
    let footer_style = text_css(
        &layout.footer_style,
        layout.footer.position,
        Anchor::BottomCenter,
        width,
        height,
    );

    rsx! {
        div {
            class: "stage",
            style: "position: absolute; inset: 0; font-family: {FONT_FAMILY};",

            if !frame.note_name.is_empty() {
                div {
                    class: "note-name",
                    style: "{text_css(&layout.note_name, layout.center, Anchor::Center, width, height)}",
                    "{frame.note_name}"
                }
            }

            if !frame.curve.is_empty() {
                svg {
                    class: "pitch-curve",
                    style: "position: absolute; inset: 0;",
                    width: "{width}",
                    height: "{height}",
                    view_box: "0 0 {width} {height}",
                    polyline {
                        points: "{curve_points}",
                        fill: "none",
                        stroke: "{curve_color}",
                        stroke_width: "{layout.curve_stroke_width}",
                        stroke_linejoin: "round",
                        stroke_linecap: "round",
                    }
                }
            }

            if !frame.lyric_text.is_empty() {
                div {
                    class: "lyric",
                    style: "{text_css(&layout.lyric, layout.center, Anchor::Center, width, height)}",
                    "{frame.lyric_text}"
                }
            }

            if !frame.cue_text.is_empty() {
                div {
                    class: "cue",
                    style: "{cue_style}",
                    "{frame.cue_text}"
                }
            }

            for (row, line) in layout.header_lines.iter().enumerate() {
                div {
                    key: "{row}",
                    class: "header",
                    style: "{text_css(&layout.small, line.position, Anchor::TopLeft, width, height)}",
                    "{line.text}"
                }
            }

            if let Some(bpm) = layout.bpm_label.as_ref() {
                div {
                    class: "bpm",
                    style: "{text_css(&layout.small, bpm.position, Anchor::TopRight, width, height)}",
                    "{bpm.text}"
                }
            }

            if !frame.play_time_text.is_empty() {
                div {
                    class: "play-time",
                    style: "{text_css(&layout.small, layout.play_time_anchor, Anchor::BottomLeft, width, height)}",
                    "{frame.play_time_text}"
                }
            }

            div {
                class: "footer",
                style: "{footer_style}",
                "{layout.footer.text}"
            }
        }
    }
}

/// Absolute-position CSS for text anchored at `at` on a `width` x `height` stage
fn text_css(style: &TextStyle, at: Point, anchor: Anchor, width: f64, height: f64) -> String {
    let position = match anchor {
        Anchor::TopLeft => format!("left: {}px; top: {}px;", at.x, at.y),
        Anchor::TopRight => format!("right: {}px; top: {}px;", width - at.x, at.y),
        Anchor::BottomLeft => format!("left: {}px; bottom: {}px;", at.x, height - at.y),
        Anchor::BottomCenter => format!(
            "left: {}px; bottom: {}px; transform: translateX(-50%);",
            at.x,
            height - at.y
        ),
        Anchor::Center => format!(
            "left: {}px; top: {}px; transform: translate(-50%, -50%);",
            at.x, at.y
        ),
    };

    format!(
        "position: absolute; {position} font-size: {}px; font-weight: {}; color: {}; \
        white-space: nowrap; line-height: 1;",
        style.size,
        if style.bold { "bold" } else { "normal" },
        style.color.to_hex()
    )
}

/// SVG `points` attribute for a polyline
fn polyline_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}
