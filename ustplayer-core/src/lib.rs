pub mod clock;
pub mod config;
pub mod curve;
pub mod error;
pub mod lrc;
pub mod paths;
pub mod pitch;
pub mod playback;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod time;
pub mod timeline;

pub use clock::{ClockSource, MonotonicClock, PlaybackClock};
pub use config::{
    Color, DisplaySettings, LoggingConfig, LyricPosition, PlayerConfig, ShowConfig, StyleConfig,
    CONFIG_TEMPLATE,
};

/// Re-export toml error type for config parsing error handling
pub use toml::de::Error as TomlParseError;
pub use curve::{Point, Viewport};
pub use error::{ColorError, CoreError, RenderError};
pub use lrc::{LyricCue, LyricTrack};
pub use paths::{config_dir, log_file_path, CONFIG_DIR_NAME, CONFIG_FILE_NAME, LOG_FILE_NAME};
pub use pitch::note_name;
pub use playback::{FrameState, PlaybackEngine, PlaybackStatus};
pub use render::{FrameRenderer, Label, StageLayout, TextStyle, FONT_FAMILY, FOOTER_TEXT};
pub use scheduler::{run_session, SessionEnd, TickHandle, FINISH_GRACE, TICK_PERIOD};
pub use session::{ProjectInfo, Session};
pub use time::DurationExt;
pub use timeline::{Note, NoteNumber, Timeline};
