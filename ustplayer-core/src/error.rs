use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // Configuration errors
    #[error("Config file not found at {path}. A template has been created with default settings.")]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to parse config file: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    // Session input errors
    #[error("Failed to parse session file: {0}")]
    SessionParseError(#[from] serde_json::Error),

    #[error("Invalid tempo {tempo}: must be a finite number greater than zero")]
    InvalidTempo { tempo: f64 },

    // IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // UI errors
    #[error("Window creation failed: {reason}")]
    WindowError { reason: String },
}

/// Failure while handing a frame to the display surface.
///
/// Always recoverable: the tick driver logs it and moves on to the next tick.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Display surface unavailable: {reason}")]
    Surface { reason: String },
}

/// Rejected color string. Callers substitute a fallback color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("Color {value:?} is not in #RRGGBB form")]
    Malformed { value: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
