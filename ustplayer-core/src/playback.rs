use crate::clock::{ClockSource, MonotonicClock, PlaybackClock};
use crate::config::DisplaySettings;
use crate::curve::{self, Point, Viewport};
use crate::lrc::LyricTrack;
use crate::pitch::note_name;
use crate::time::DurationExt;
use crate::timeline::{Note, Timeline};
use std::time::Duration;
use tracing::{debug, info};

/// Playback lifecycle. There is no way back from `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Running,
    Finished,
}

/// Everything the renderer needs to draw one frame.
///
/// Empty strings and an empty curve mean "do not draw this element".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameState {
    /// Lyric of the current note, or a rest/end placeholder
    pub lyric_text: String,
    /// Pitch name of the current note such as `C4`
    pub note_name: String,
    /// Pitch-bend polyline in screen coordinates
    pub curve: Vec<Point>,
    /// Active line of the external lyric track
    pub cue_text: String,
    /// Time since playback started
    pub elapsed: Duration,
    /// Formatted play time, empty when hidden
    pub play_time_text: String,
    pub is_finished: bool,
}

/// Turns elapsed time into frames.
///
/// Owns the per-session mutable state (carried lyric, cue cursor, status);
/// the timeline and lyric track are read-only after construction.
pub struct PlaybackEngine<C = MonotonicClock> {
    timeline: Timeline,
    lyrics: LyricTrack,
    settings: DisplaySettings,
    viewport: Viewport,
    clock: PlaybackClock<C>,
    status: PlaybackStatus,
    /// Most recent lyric that was neither a rest nor a sustain
    last_sustained_lyric: String,
    cue_cursor: Option<usize>,
}

impl PlaybackEngine<MonotonicClock> {
    /// Create an engine whose clock starts now
    #[must_use]
    pub fn start(
        timeline: Timeline,
        lyrics: LyricTrack,
        settings: DisplaySettings,
        viewport: Viewport,
    ) -> Self {
        Self::with_clock(
            timeline,
            lyrics,
            settings,
            viewport,
            PlaybackClock::start(MonotonicClock),
        )
    }
}

impl<C: ClockSource> PlaybackEngine<C> {
    #[must_use]
    pub fn with_clock(
        timeline: Timeline,
        lyrics: LyricTrack,
        settings: DisplaySettings,
        viewport: Viewport,
        clock: PlaybackClock<C>,
    ) -> Self {
        info!(
            "Starting playback: {} notes, {} ticks at {:.1} ticks/s, {} lyric cues",
            timeline.notes().len(),
            timeline.total_ticks(),
            timeline.tick_rate(),
            lyrics.len()
        );
        Self {
            timeline,
            lyrics,
            settings,
            viewport,
            clock,
            status: PlaybackStatus::Running,
            last_sustained_lyric: String::new(),
            cue_cursor: None,
        }
    }

    #[must_use]
    pub const fn status(&self) -> PlaybackStatus {
        self.status
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == PlaybackStatus::Finished
    }

    /// Compute the frame for the current clock reading.
    ///
    /// Returns `None` once the terminal frame has been produced.
    pub fn tick(&mut self) -> Option<FrameState> {
        let elapsed = self.clock.elapsed();
        self.frame_at(elapsed)
    }

    /// Compute the frame for a given elapsed time.
    pub fn frame_at(&mut self, elapsed: Duration) -> Option<FrameState> {
        if self.is_finished() {
            return None;
        }

        let elapsed_ticks = elapsed.as_ticks(self.timeline.tick_rate());
        if elapsed_ticks >= self.timeline.total_ticks() {
            self.status = PlaybackStatus::Finished;
            info!("Playback finished after {:?}", elapsed);
            return Some(FrameState {
                lyric_text: self.settings.end_text.clone(),
                elapsed,
                is_finished: true,
                ..FrameState::default()
            });
        }

        let mut frame = FrameState {
            elapsed,
            ..FrameState::default()
        };

        if let Some(note) = self.timeline.note_at(elapsed_ticks) {
            let (lyric_text, name) = resolve_note_display(
                note,
                &mut self.last_sustained_lyric,
                &self.settings.silent_text,
            );
            frame.lyric_text = lyric_text;
            frame.note_name = name;

            if self.settings.show.curve {
                frame.curve = curve::project(
                    &note.pitch_bend,
                    note.length,
                    self.viewport,
                    self.viewport.center(),
                );
            }
        }

        if self.settings.show.lyric && !self.lyrics.is_empty() {
            let index = self.lyrics.active_index(elapsed, self.cue_cursor);
            if index != self.cue_cursor {
                debug!("Lyric cue {:?} -> {:?} at {:?}", self.cue_cursor, index, elapsed);
                self.cue_cursor = index;
            }
            frame.cue_text = index
                .and_then(|i| self.lyrics.cue(i))
                .map(|cue| cue.text.clone())
                .unwrap_or_default();
        }

        if self.settings.show.play_time {
            frame.play_time_text = elapsed.play_time_text();
        }

        Some(frame)
    }
}

/// Apply the rest/sustain carry-forward rules to a note.
///
/// Returns the lyric text and note name to display.
fn resolve_note_display(
    note: &Note,
    last_sustained_lyric: &mut String,
    silent_text: &str,
) -> (String, String) {
    if note.is_rest() {
        return (silent_text.to_string(), String::new());
    }

    let lyric_text = if note.is_sustain() {
        if last_sustained_lyric.is_empty() {
            silent_text.to_string()
        } else {
            last_sustained_lyric.clone()
        }
    } else {
        last_sustained_lyric.clone_from(&note.lyric);
        note.lyric.clone()
    };

    (lyric_text, note_name(&note.note_number))
}
