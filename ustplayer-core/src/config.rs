use crate::error::{ColorError, CoreError, Result};
use crate::paths::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use const_format::concatcp;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub show: ShowConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Player appearance and placeholder texts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleConfig {
    #[serde(default = "default_true")]
    pub fullscreen: bool,
    #[serde(default = "default_background_color")]
    pub background_color: String,
    /// Color of the header, BPM and play-time text
    #[serde(default = "default_white")]
    pub text_color: String,
    #[serde(default = "default_white")]
    pub lyric_color: String,
    #[serde(default = "default_note_color")]
    pub note_color: String,
    /// LRC file shown alongside the notes
    #[serde(default)]
    pub lyric_file: Option<PathBuf>,
    /// "above" or "below" the screen center
    #[serde(default = "default_lyric_position")]
    pub lyric_position: String,
    /// Shown for rests: "R", "-" or "custom"
    #[serde(default = "default_silent_display")]
    pub silent_display: String,
    #[serde(default)]
    pub silent_custom_text: String,
    /// Shown once playback ends: "END", "-" or "custom"
    #[serde(default = "default_end_display")]
    pub end_display: String,
    #[serde(default)]
    pub end_custom_text: String,
}

const fn default_true() -> bool {
    true
}

fn default_background_color() -> String {
    "#000000".to_string()
}

fn default_white() -> String {
    "#FFFFFF".to_string()
}

fn default_note_color() -> String {
    "#C3C3C3".to_string()
}

fn default_lyric_position() -> String {
    "above".to_string()
}

fn default_silent_display() -> String {
    "R".to_string()
}

fn default_end_display() -> String {
    "END".to_string()
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            fullscreen: true,
            background_color: default_background_color(),
            text_color: default_white(),
            lyric_color: default_white(),
            note_color: default_note_color(),
            lyric_file: None,
            lyric_position: default_lyric_position(),
            silent_display: default_silent_display(),
            silent_custom_text: String::new(),
            end_display: default_end_display(),
            end_custom_text: String::new(),
        }
    }
}

/// Which elements are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ShowConfig {
    /// Pitch-bend curve of the current note
    #[serde(default)]
    pub curve: bool,
    /// External LRC lyric line
    #[serde(default = "default_true")]
    pub lyric: bool,
    #[serde(default = "default_true")]
    pub bpm: bool,
    #[serde(default = "default_true")]
    pub play_time: bool,
    #[serde(default = "default_true")]
    pub song_name: bool,
    #[serde(default = "default_true")]
    pub song_author: bool,
    #[serde(default = "default_true")]
    pub ust_author: bool,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            curve: false,
            lyric: true,
            bpm: true,
            play_time: true,
            song_name: true,
            song_author: true,
            ust_author: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write logs to a file in the cache directory
    #[serde(default)]
    pub enabled: bool,
}

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub const fn gray(level: u8) -> Self {
        Self::rgb(level, level, level)
    }

    /// Parse a strict `#RRGGBB` string (surrounding whitespace allowed)
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::Malformed`] for any other form.
    pub fn parse(value: &str) -> std::result::Result<Self, ColorError> {
        let malformed = || ColorError::Malformed {
            value: value.to_string(),
        };

        let hex = value.trim().strip_prefix('#').ok_or_else(malformed)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(malformed());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| malformed());
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Scale every channel by `alpha / 255`, i.e. blend towards black
    #[must_use]
    pub fn dimmed(self, alpha: u8) -> Self {
        let scale = |c: u8| u8::try_from(u16::from(c) * u16::from(alpha) / 255).unwrap_or(u8::MAX);
        Self::rgb(scale(self.r), scale(self.g), scale(self.b))
    }

    /// Lowercase `#rrggbb`
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Where the external lyric line sits relative to the screen center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LyricPosition {
    #[default]
    Above,
    Below,
}

/// Validated, fully resolved settings built once per session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySettings {
    pub fullscreen: bool,
    pub background_color: Color,
    pub text_color: Color,
    pub lyric_color: Color,
    pub note_color: Color,
    pub lyric_file: Option<PathBuf>,
    pub lyric_position: LyricPosition,
    /// Text displayed for rest notes
    pub silent_text: String,
    /// Text displayed once the timeline is exhausted
    pub end_text: String,
    pub show: ShowConfig,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        PlayerConfig::default().settings()
    }
}

impl PlayerConfig {
    /// Get the configuration directory path (~/.config/ustplayer/)
    #[must_use]
    pub fn config_dir() -> PathBuf {
        crate::paths::config_dir()
    }

    /// Get the config file path (~/.config/ustplayer/config.toml)
    #[must_use]
    pub fn config_path() -> PathBuf {
        crate::paths::config_path()
    }

    /// Load config from the default path or create a template on first run
    ///
    /// # Errors
    ///
    /// See [`PlayerConfig::load_or_create_at`].
    pub fn load_or_create() -> Result<Self> {
        Self::load_or_create_at(&Self::config_path())
    }

    /// Load config from `config_path`, writing the template if it does not exist
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConfigNotFound`] after writing a fresh template (the
    /// template holds the defaults, so callers may continue with
    /// [`PlayerConfig::default`]). Returns an error if the file cannot be read,
    /// written or parsed.
    pub fn load_or_create_at(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            // Create config directory if it doesn't exist
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }

            fs::write(config_path, CONFIG_TEMPLATE)?;

            return Err(CoreError::ConfigNotFound {
                path: config_path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(config_path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Resolve every option into [`DisplaySettings`], applying fallbacks.
    #[must_use]
    pub fn settings(&self) -> DisplaySettings {
        let style = &self.style;

        DisplaySettings {
            fullscreen: style.fullscreen,
            background_color: resolve_color("style.background_color", &style.background_color),
            text_color: resolve_color("style.text_color", &style.text_color),
            lyric_color: resolve_color("style.lyric_color", &style.lyric_color),
            note_color: resolve_color("style.note_color", &style.note_color),
            lyric_file: style
                .lyric_file
                .clone()
                .filter(|path| !path.as_os_str().is_empty()),
            lyric_position: resolve_lyric_position(&style.lyric_position),
            silent_text: resolve_placeholder(
                "style.silent_display",
                &style.silent_display,
                &["R", "-"],
                &style.silent_custom_text,
            ),
            end_text: resolve_placeholder(
                "style.end_display",
                &style.end_display,
                &["END", "-"],
                &style.end_custom_text,
            ),
            show: self.show,
        }
    }
}

/// Invalid colors fall back to white, whichever field they belong to
fn resolve_color(field: &str, value: &str) -> Color {
    Color::parse(value).unwrap_or_else(|e| {
        warn!("{field}: {e}, using #FFFFFF");
        Color::WHITE
    })
}

fn resolve_lyric_position(value: &str) -> LyricPosition {
    match value.trim().to_ascii_lowercase().as_str() {
        "above" => LyricPosition::Above,
        "below" => LyricPosition::Below,
        other => {
            warn!("style.lyric_position: unknown value {other:?}, using \"above\"");
            LyricPosition::Above
        }
    }
}

/// `mode` is either one of the `literals`, shown as-is, or "custom"
fn resolve_placeholder(field: &str, mode: &str, literals: &[&str], custom_text: &str) -> String {
    if literals.contains(&mode) {
        mode.to_string()
    } else if mode == "custom" {
        custom_text.to_string()
    } else {
        warn!("{field}: unknown mode {mode:?}, showing nothing");
        String::new()
    }
}

pub const CONFIG_TEMPLATE: &str = concatcp!(
    "# ustplayer Configuration\n# ~/.config/",
    CONFIG_DIR_NAME,
    "/",
    CONFIG_FILE_NAME,
    r##"

[style]
fullscreen = true
# Colors must be "#RRGGBB"; anything else falls back to white
background_color = "#000000"
text_color = "#FFFFFF"
lyric_color = "#FFFFFF"
note_color = "#C3C3C3"
# Optional LRC file shown alongside the notes
# lyric_file = "/path/to/song.lrc"
lyric_position = "above"  # "above", "below"
# Rest display: "R", "-" or "custom" (uses silent_custom_text)
silent_display = "R"
silent_custom_text = ""
# End display: "END", "-" or "custom" (uses end_custom_text)
end_display = "END"
end_custom_text = ""

[show]
curve = false
lyric = true
bpm = true
play_time = true
song_name = true
song_author = true
ust_author = true

[logging]
# Also write logs to ~/.cache/ustplayer/ustplayer.log
enabled = false
"##
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_matches_defaults() {
        let parsed: PlayerConfig = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(parsed, PlayerConfig::default());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let parsed: PlayerConfig = toml::from_str("").unwrap();
        let settings = parsed.settings();
        assert!(settings.fullscreen);
        assert_eq!(settings.background_color, Color::BLACK);
        assert_eq!(settings.note_color, Color::rgb(0xC3, 0xC3, 0xC3));
        assert_eq!(settings.silent_text, "R");
        assert_eq!(settings.end_text, "END");
        assert_eq!(settings.lyric_position, LyricPosition::Above);
        assert!(!settings.show.curve);
        assert!(settings.show.lyric);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(Color::parse("#1a2B3c"), Ok(Color::rgb(0x1a, 0x2b, 0x3c)));
        assert!(Color::parse("1a2b3c").is_err());
        assert!(Color::parse("#1a2b3").is_err());
        assert!(Color::parse("#1a2b3c4d").is_err());
        assert!(Color::parse("#gg0000").is_err());
        assert!(Color::parse("#ééé").is_err());
    }

    #[test]
    fn test_invalid_color_falls_back_to_white() {
        let config: PlayerConfig = toml::from_str(
            r##"
[style]
background_color = "black"
note_color = "#12345"
"##,
        )
        .unwrap();
        let settings = config.settings();
        assert_eq!(settings.background_color, Color::WHITE);
        assert_eq!(settings.note_color, Color::WHITE);
        assert_eq!(settings.lyric_color, Color::WHITE);
    }

    #[test]
    fn test_dimmed_and_hex() {
        assert_eq!(Color::rgb(195, 195, 195).dimmed(90).to_hex(), "#444444");
        assert_eq!(Color::WHITE.dimmed(255), Color::WHITE);
        assert_eq!(Color::WHITE.dimmed(0), Color::BLACK);
        assert_eq!(Color::gray(180).to_hex(), "#b4b4b4");
    }

    #[test]
    fn test_placeholder_modes() {
        let config: PlayerConfig = toml::from_str(
            r#"
[style]
silent_display = "custom"
silent_custom_text = "..."
end_display = "-"
"#,
        )
        .unwrap();
        let settings = config.settings();
        assert_eq!(settings.silent_text, "...");
        assert_eq!(settings.end_text, "-");
    }

    #[test]
    fn test_unknown_placeholder_mode_shows_nothing() {
        let config: PlayerConfig = toml::from_str(
            r#"
[style]
silent_display = "whatever"
end_display = "R"
"#,
        )
        .unwrap();
        let settings = config.settings();
        assert_eq!(settings.silent_text, "");
        assert_eq!(settings.end_text, "");
    }

    #[test]
    fn test_lyric_position_and_file() {
        let config: PlayerConfig = toml::from_str(
            r#"
[style]
lyric_position = "Below"
lyric_file = "song.lrc"
"#,
        )
        .unwrap();
        let settings = config.settings();
        assert_eq!(settings.lyric_position, LyricPosition::Below);
        assert_eq!(settings.lyric_file, Some(PathBuf::from("song.lrc")));
    }

    #[test]
    fn test_load_or_create_writes_template() {
        let dir = std::env::temp_dir().join(format!("ustplayer-config-{}", std::process::id()));
        let path = dir.join(CONFIG_FILE_NAME);
        let _ = fs::remove_dir_all(&dir);

        let first = PlayerConfig::load_or_create_at(&path);
        assert!(matches!(first, Err(CoreError::ConfigNotFound { .. })));

        let second = PlayerConfig::load_or_create_at(&path).unwrap();
        assert_eq!(second, PlayerConfig::default());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_malformed_config_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("ustplayer-badcfg-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(&path, "[style\nfullscreen = ").unwrap();

        let result = PlayerConfig::load_or_create_at(&path);
        assert!(matches!(result, Err(CoreError::ConfigParseError(_))));

        let _ = fs::remove_dir_all(&dir);
    }
}
