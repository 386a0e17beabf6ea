//! Session input: the note timeline and project metadata to play.

use crate::error::Result;
use crate::timeline::{Note, Timeline};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

const fn default_tempo() -> f64 {
    120.0
}

/// Song metadata shown in the header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    #[serde(default)]
    pub song_name: String,
    #[serde(default)]
    pub song_author: String,
    #[serde(default)]
    pub ust_author: String,
}

/// On-disk JSON layout of a session
#[derive(Debug, Deserialize)]
struct SessionFile {
    #[serde(default = "default_tempo")]
    tempo: f64,
    #[serde(default)]
    notes: Vec<Note>,
    #[serde(default)]
    project_info: ProjectInfo,
}

/// Everything needed to play one song
#[derive(Debug, Clone)]
pub struct Session {
    pub timeline: Timeline,
    pub project: ProjectInfo,
}

impl Session {
    /// Parse a session from JSON text
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the tempo is invalid.
    pub fn from_json(input: &str) -> Result<Self> {
        let file: SessionFile = serde_json::from_str(input)?;
        Ok(Self {
            timeline: Timeline::new(file.tempo, file.notes)?,
            project: file.project_info,
        })
    }

    /// Load a session file from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let session = Self::from_json(&content)?;
        info!(
            "Loaded session {:?}: {} notes, {} ticks at {} bpm",
            path,
            session.timeline.notes().len(),
            session.timeline.total_ticks(),
            session.timeline.tempo()
        );
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::timeline::NoteNumber;

    #[test]
    fn test_from_json() {
        let input = r#"{
            "tempo": 150,
            "notes": [
                { "lyric": "la", "note_num": 60, "length": 480, "pitch_bend": [0, 12.5, -3] },
                { "lyric": "-", "note_num": 62, "length": 240 },
                { "lyric": "R" }
            ],
            "project_info": { "song_name": "Song", "ust_author": "me" }
        }"#;
        let session = Session::from_json(input).unwrap();

        assert!((session.timeline.tempo() - 150.0).abs() < f64::EPSILON);
        assert_eq!(session.timeline.notes().len(), 3);
        assert_eq!(session.timeline.notes()[0].pitch_bend, vec![0.0, 12.5, -3.0]);
        assert_eq!(session.timeline.notes()[1].note_number, NoteNumber::Midi(62));
        assert_eq!(session.timeline.total_ticks(), 1200);
        assert_eq!(session.project.song_name, "Song");
        assert_eq!(session.project.song_author, "");
        assert_eq!(session.project.ust_author, "me");
    }

    #[test]
    fn test_defaults() {
        let session = Session::from_json("{}").unwrap();
        assert!((session.timeline.tempo() - 120.0).abs() < f64::EPSILON);
        assert_eq!(session.timeline.total_ticks(), 0);
        assert_eq!(session.project, ProjectInfo::default());
    }

    #[test]
    fn test_loose_note_fields_do_not_reject_session() {
        let input = r#"{
            "notes": [
                { "lyric": "a", "note_num": 60.0, "length": 480.0 },
                { "lyric": "b", "note_num": null, "length": 240.5 },
                { "lyric": "c", "note_num": true }
            ]
        }"#;
        let session = Session::from_json(input).unwrap();
        let notes = session.timeline.notes();

        assert_eq!(notes[0].note_number, NoteNumber::Midi(60));
        assert_eq!(notes[1].note_number, NoteNumber::Text("null".to_string()));
        assert_eq!(notes[2].note_number, NoteNumber::Text("true".to_string()));
        assert_eq!(session.timeline.total_ticks(), 480 + 240 + 480);
    }

    #[test]
    fn test_invalid_tempo() {
        let result = Session::from_json(r#"{ "tempo": 0 }"#);
        assert!(matches!(result, Err(CoreError::InvalidTempo { .. })));
    }

    #[test]
    fn test_malformed_json() {
        let result = Session::from_json("{ notes: ");
        assert!(matches!(result, Err(CoreError::SessionParseError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Session::load(Path::new("/nonexistent/ustplayer/session.json"));
        assert!(matches!(result, Err(CoreError::IoError(_))));
    }
}
