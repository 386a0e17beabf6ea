//! Note timeline and the precomputed tick-range index over it.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Ticks per quarter note, the resolution every UST timeline is written in.
pub const TICKS_PER_QUARTER: f64 = 480.0;

/// Lyric marking a rest.
pub const REST_LYRIC: &str = "R";

/// Lyric that sustains the previous sounding note.
pub const SUSTAIN_LYRIC: &str = "-";

const fn default_length() -> i64 {
    480
}

/// MIDI note number as supplied by the session file.
///
/// Most inputs carry an integer. Fractional numbers are truncated and any
/// other JSON value is kept as text, so it can still be shown when no note
/// name can be derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, from = "Value")]
pub enum NoteNumber {
    Midi(i64),
    Text(String),
}

impl Default for NoteNumber {
    fn default() -> Self {
        Self::Midi(0)
    }
}

impl From<Value> for NoteNumber {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(truncate_to_i64))
                .map_or_else(|| Self::Text(number.to_string()), Self::Midi),
            Value::String(text) => Self::Text(text),
            other => Self::Text(other.to_string()),
        }
    }
}

/// Drop the fraction, saturating at the `i64` bounds
#[allow(clippy::cast_possible_truncation)]
fn truncate_to_i64(value: f64) -> i64 {
    // Float-to-int `as` saturates and maps NaN to zero
    value.trunc() as i64
}

/// Accept integer or fractional lengths; anything else takes the default
fn deserialize_length<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_i64()
        .or_else(|| value.as_f64().map(|length| truncate_to_i64(length.floor())))
        .unwrap_or_else(default_length))
}

/// A single note of the vocal timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Lyric text; `"R"` is a rest and `"-"` sustains the previous lyric
    #[serde(default)]
    pub lyric: String,
    #[serde(default, rename = "note_num")]
    pub note_number: NoteNumber,
    /// Raw length in ticks, possibly zero or negative in malformed input
    #[serde(
        default = "default_length",
        rename = "length",
        deserialize_with = "deserialize_length"
    )]
    pub length: i64,
    /// Pitch-bend offsets, nominally within ±100
    #[serde(default)]
    pub pitch_bend: Vec<f64>,
}

impl Note {
    #[must_use]
    pub fn new(lyric: impl Into<String>, note_number: i64, length: i64) -> Self {
        Self {
            lyric: lyric.into(),
            note_number: NoteNumber::Midi(note_number),
            length,
            pitch_bend: Vec::new(),
        }
    }

    /// Attach pitch-bend samples
    #[must_use]
    pub fn with_pitch_bend(mut self, samples: Vec<f64>) -> Self {
        self.pitch_bend = samples;
        self
    }

    /// Length in ticks, clamped to at least one tick.
    #[must_use]
    pub fn length_ticks(&self) -> u64 {
        u64::try_from(self.length.max(1)).unwrap_or(1)
    }

    #[must_use]
    pub fn is_rest(&self) -> bool {
        self.lyric == REST_LYRIC
    }

    #[must_use]
    pub fn is_sustain(&self) -> bool {
        self.lyric == SUSTAIN_LYRIC
    }
}

/// Half-open tick interval `[start_tick, end_tick)` occupied by one note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteRange {
    pub start_tick: u64,
    pub end_tick: u64,
    /// Position of the note in the timeline
    pub note_index: usize,
}

/// Contiguous tick ranges for every note, built once per session.
#[derive(Debug, Clone, Default)]
pub struct TimelineIndex {
    ranges: Vec<NoteRange>,
    total_ticks: u64,
}

impl TimelineIndex {
    /// Accumulate note lengths into back-to-back ranges starting at tick 0.
    #[must_use]
    pub fn build(notes: &[Note]) -> Self {
        let mut ranges = Vec::with_capacity(notes.len());
        let mut current_tick = 0_u64;

        for (note_index, note) in notes.iter().enumerate() {
            let end_tick = current_tick.saturating_add(note.length_ticks());
            ranges.push(NoteRange {
                start_tick: current_tick,
                end_tick,
                note_index,
            });
            current_tick = end_tick;
        }

        Self {
            ranges,
            total_ticks: current_tick,
        }
    }

    /// Index of the note covering `tick`, or `None` once the timeline is exhausted.
    #[must_use]
    pub fn lookup(&self, tick: u64) -> Option<usize> {
        // Ranges are sorted and contiguous, so the first range ending after
        // `tick` is the one containing it
        let position = self.ranges.partition_point(|range| range.end_tick <= tick);
        self.ranges
            .get(position)
            .filter(|range| range.start_tick <= tick)
            .map(|range| range.note_index)
    }

    #[must_use]
    pub fn ranges(&self) -> &[NoteRange] {
        &self.ranges
    }

    /// Sum of all clamped note lengths
    #[must_use]
    pub const fn total_ticks(&self) -> u64 {
        self.total_ticks
    }
}

/// Ordered notes at a fixed tempo, with their tick index.
#[derive(Debug, Clone)]
pub struct Timeline {
    tempo: f64,
    notes: Vec<Note>,
    index: TimelineIndex,
}

impl Timeline {
    /// Build a timeline, rejecting tempos that cannot drive a tick clock.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTempo`] if `tempo` is not finite or not positive.
    pub fn new(tempo: f64, notes: Vec<Note>) -> Result<Self> {
        if !tempo.is_finite() || tempo <= 0.0 {
            return Err(CoreError::InvalidTempo { tempo });
        }
        let index = TimelineIndex::build(&notes);
        Ok(Self {
            tempo,
            notes,
            index,
        })
    }

    /// Quarter notes per minute
    #[must_use]
    pub const fn tempo(&self) -> f64 {
        self.tempo
    }

    /// Ticks per second: tempo × 480 / 60
    #[must_use]
    pub fn tick_rate(&self) -> f64 {
        self.tempo * TICKS_PER_QUARTER / 60.0
    }

    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    #[must_use]
    pub const fn total_ticks(&self) -> u64 {
        self.index.total_ticks()
    }

    /// Note sounding at `tick`
    #[must_use]
    pub fn note_at(&self, tick: u64) -> Option<&Note> {
        self.index.lookup(tick).and_then(|i| self.notes.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes(lengths: &[i64]) -> Vec<Note> {
        lengths
            .iter()
            .enumerate()
            .map(|(i, &len)| Note::new(format!("n{i}"), 60, len))
            .collect()
    }

    #[test]
    fn test_ranges_partition_timeline() {
        let index = TimelineIndex::build(&notes(&[480, 240, 1, 960, 120]));
        let ranges = index.ranges();

        assert_eq!(ranges[0].start_tick, 0);
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end_tick, pair[1].start_tick);
            assert!(pair[0].start_tick < pair[0].end_tick);
        }
        let sum: u64 = ranges.iter().map(|r| r.end_tick - r.start_tick).sum();
        assert_eq!(sum, index.total_ticks());
        assert_eq!(ranges.last().unwrap().end_tick, index.total_ticks());
        assert_eq!(index.total_ticks(), 1801);
    }

    #[test]
    fn test_non_positive_lengths_clamped() {
        let index = TimelineIndex::build(&notes(&[0, -20, 5]));
        assert_eq!(index.total_ticks(), 7);
        assert_eq!(index.lookup(0), Some(0));
        assert_eq!(index.lookup(1), Some(1));
        assert_eq!(index.lookup(2), Some(2));
        assert_eq!(index.lookup(6), Some(2));
    }

    #[test]
    fn test_lookup_first_note_at_zero() {
        let index = TimelineIndex::build(&notes(&[480, 480]));
        assert_eq!(index.lookup(0), Some(0));
    }

    #[test]
    fn test_lookup_boundaries_are_half_open() {
        let index = TimelineIndex::build(&notes(&[480, 240]));
        assert_eq!(index.lookup(479), Some(0));
        assert_eq!(index.lookup(480), Some(1));
        assert_eq!(index.lookup(719), Some(1));
        assert_eq!(index.lookup(720), None);
        assert_eq!(index.lookup(u64::MAX), None);
    }

    #[test]
    fn test_lookup_matches_linear_scan() {
        let index = TimelineIndex::build(&notes(&[3, 1, 4, 1, 5, 9, 2, 6]));
        for tick in 0..=index.total_ticks() + 2 {
            let linear = index
                .ranges()
                .iter()
                .find(|r| r.start_tick <= tick && tick < r.end_tick)
                .map(|r| r.note_index);
            assert_eq!(index.lookup(tick), linear, "tick {tick}");
        }
    }

    #[test]
    fn test_empty_timeline() {
        let index = TimelineIndex::build(&[]);
        assert_eq!(index.total_ticks(), 0);
        assert_eq!(index.lookup(0), None);
    }

    #[test]
    fn test_tick_rate() {
        let timeline = Timeline::new(120.0, notes(&[480])).unwrap();
        assert!((timeline.tick_rate() - 960.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_tempo_rejected() {
        assert!(matches!(
            Timeline::new(0.0, Vec::new()),
            Err(CoreError::InvalidTempo { .. })
        ));
        assert!(Timeline::new(f64::NAN, Vec::new()).is_err());
        assert!(Timeline::new(-90.0, Vec::new()).is_err());
    }

    #[test]
    fn test_note_deserialize_defaults() {
        let note: Note = serde_json::from_str(r#"{ "lyric": "la" }"#).unwrap();
        assert_eq!(note.length, 480);
        assert_eq!(note.note_number, NoteNumber::Midi(0));
        assert!(note.pitch_bend.is_empty());
    }

    #[test]
    fn test_note_deserialize_text_note_number() {
        let note: Note =
            serde_json::from_str(r#"{ "lyric": "a", "note_num": "x", "length": 0 }"#).unwrap();
        assert_eq!(note.note_number, NoteNumber::Text("x".to_string()));
        assert_eq!(note.length_ticks(), 1);
    }

    #[test]
    fn test_note_deserialize_loose_note_numbers() {
        let parse = |note_num: &str| {
            let json = format!(r#"{{ "lyric": "a", "note_num": {note_num} }}"#);
            serde_json::from_str::<Note>(&json).unwrap().note_number
        };

        assert_eq!(parse("60.0"), NoteNumber::Midi(60));
        assert_eq!(parse("61.9"), NoteNumber::Midi(61));
        assert_eq!(parse("-3.5"), NoteNumber::Midi(-3));
        assert_eq!(parse("null"), NoteNumber::Text("null".to_string()));
        assert_eq!(parse("true"), NoteNumber::Text("true".to_string()));
        assert_eq!(parse("[60]"), NoteNumber::Text("[60]".to_string()));
    }

    #[test]
    fn test_note_deserialize_fractional_length() {
        let parse = |length: &str| {
            let json = format!(r#"{{ "lyric": "a", "length": {length} }}"#);
            serde_json::from_str::<Note>(&json).unwrap().length
        };

        assert_eq!(parse("480.0"), 480);
        assert_eq!(parse("240.7"), 240);
        assert_eq!(parse("-0.5"), -1);
        assert_eq!(parse("null"), 480);
        assert_eq!(parse(r#""long""#), 480);
    }
}
