//! MIDI note numbers to display names.

use crate::timeline::NoteNumber;

/// Pitch classes starting at C
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Name a MIDI note with its octave, where note 0 is `C-1` and 60 is `C4`.
///
/// Returns `None` outside the MIDI range 0..=127.
#[must_use]
pub fn midi_to_name(midi: i64) -> Option<String> {
    if !(0..=127).contains(&midi) {
        return None;
    }
    let pitch_class = usize::try_from(midi % 12).ok()?;
    let octave = midi / 12 - 1;
    Some(format!("{}{octave}", NOTE_NAMES[pitch_class]))
}

/// Display name for a note number, falling back to its literal text.
#[must_use]
pub fn note_name(number: &NoteNumber) -> String {
    match number {
        NoteNumber::Midi(midi) => midi_to_name(*midi).unwrap_or_else(|| midi.to_string()),
        NoteNumber::Text(text) => text
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(midi_to_name)
            .unwrap_or_else(|| text.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_c() {
        assert_eq!(midi_to_name(60).as_deref(), Some("C4"));
    }

    #[test]
    fn test_concert_a() {
        assert_eq!(midi_to_name(69).as_deref(), Some("A4"));
    }

    #[test]
    fn test_range_edges() {
        assert_eq!(midi_to_name(0).as_deref(), Some("C-1"));
        assert_eq!(midi_to_name(127).as_deref(), Some("G9"));
        assert_eq!(midi_to_name(61).as_deref(), Some("C#4"));
    }

    #[test]
    fn test_out_of_range_falls_back_to_literal() {
        assert_eq!(note_name(&NoteNumber::Midi(128)), "128");
        assert_eq!(note_name(&NoteNumber::Midi(-3)), "-3");
    }

    #[test]
    fn test_numeric_text_is_parsed() {
        assert_eq!(note_name(&NoteNumber::Text(" 72 ".to_string())), "C5");
    }

    #[test]
    fn test_non_numeric_text_falls_back_to_literal() {
        assert_eq!(note_name(&NoteNumber::Text("abc".to_string())), "abc");
    }
}
