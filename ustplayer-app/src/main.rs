#![cfg_attr(feature = "bundle", windows_subsystem = "windows")]
mod app;
mod bridge;
mod components;
mod state;

use crate::app::App;
use crate::bridge::use_playback;
use crate::state::{PlayerContext, StageState};
use dioxus::desktop::tao::window::Fullscreen;
use dioxus::desktop::{use_window, DesktopContext, LogicalSize, WindowBuilder};
use dioxus::prelude::*;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use ustplayer_core::{
    CoreError, LyricTrack, PlayerConfig, Session, StageLayout, TickHandle, TomlParseError,
    Viewport,
};

const APP_NAME: &str = "ustplayer";

/// Window size when not running full screen
const WINDOWED_SIZE: (f64, f64) = (1280.0, 720.0);

fn main() {
    // Initialize logging with optional file output
    // Check config for logging.enabled before full config load
    let file_logging_enabled = check_file_logging_enabled();
    init_tracing(file_logging_enabled);

    let mut args = std::env::args_os().skip(1);
    let Some(session_path) = args.next().map(PathBuf::from) else {
        error!("Usage: {APP_NAME} <session.json> [lyrics.lrc]");
        std::process::exit(1);
    };
    let lyric_override = args.next().map(PathBuf::from);

    // Load config or create template on first run
    let config = match PlayerConfig::load_or_create() {
        Ok(config) => config,
        Err(CoreError::ConfigNotFound { path }) => {
            info!(
                "Created config template at {}, continuing with defaults",
                path.display()
            );
            PlayerConfig::default()
        }
        Err(CoreError::ConfigParseError(parse_error)) => {
            report_config_parse_error(&parse_error);
            std::process::exit(1);
        }
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let mut settings = config.settings();
    if let Some(path) = lyric_override {
        info!("Using lyric file from command line: {}", path.display());
        settings.lyric_file = Some(path);
    }

    let session = match Session::load(&session_path) {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to load session {}: {e}", session_path.display());
            std::process::exit(1);
        }
    };

    // A missing or unreadable lyric file only disables the lyric line
    let lyrics = settings
        .lyric_file
        .as_deref()
        .map(LyricTrack::load)
        .unwrap_or_default();

    // Shared handle for Escape, Ctrl+C and the tick loop
    let handle = TickHandle::new();

    // Set up Ctrl+C handler to stop playback
    let ctrlc_handle = handle.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received Ctrl+C, shutting down gracefully...");
        ctrlc_handle.cancel();
    }) {
        error!("Failed to set Ctrl+C handler: {}", e);
    }

    let window = WindowBuilder::new()
        .with_title(APP_NAME)
        .with_always_on_top(true)
        .with_resizable(!settings.fullscreen)
        .with_decorations(!settings.fullscreen)
        .with_inner_size(LogicalSize::new(WINDOWED_SIZE.0, WINDOWED_SIZE.1));

    let window = if settings.fullscreen {
        window.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        window
    };

    let background = settings.background_color;
    let dioxus_config = dioxus::desktop::Config::default()
        .with_window(window)
        .with_menu(None)
        .with_background_color((background.r, background.g, background.b, 255))
        .with_disable_context_menu(true);

    // Launch Dioxus application
    // Use with_context to inject the loaded session before launch
    dioxus::LaunchBuilder::desktop()
        .with_cfg(dioxus_config)
        .with_context(PlayerContext {
            session,
            lyrics,
            settings,
            handle,
        })
        .launch(app);
}

/// Root component that sizes the stage and starts playback
fn app() -> Element {
    let player = use_context::<PlayerContext>();
    let window = use_window();

    let stage = use_context_provider(|| {
        let viewport = match stage_viewport(&window, player.settings.fullscreen) {
            Ok(viewport) => viewport,
            Err(e) => {
                error!("{e}");
                player.handle.cancel();
                std::process::exit(1);
            }
        };
        info!("Stage size {}x{}", viewport.width, viewport.height);

        StageState::new(StageLayout::new(
            viewport,
            &player.settings,
            &player.session.project,
            player.session.timeline.tempo(),
        ))
    });

    use_playback(player, stage);

    rsx! {
        document::Title { "{APP_NAME}" },
        App {}
    }
}

/// Logical size of the drawing surface.
///
/// Full screen windows may not have their final size yet on first render, so
/// the monitor size is preferred there.
fn stage_viewport(window: &DesktopContext, fullscreen: bool) -> Result<Viewport, CoreError> {
    let monitor = if fullscreen {
        window.current_monitor()
    } else {
        None
    };

    let size = monitor.map_or_else(
        || window.inner_size().to_logical::<f64>(window.scale_factor()),
        |monitor| monitor.size().to_logical::<f64>(monitor.scale_factor()),
    );

    if size.width < 1.0 || size.height < 1.0 {
        return Err(CoreError::WindowError {
            reason: format!("no drawable area ({}x{})", size.width, size.height),
        });
    }

    Ok(Viewport::new(size.width, size.height))
}

fn report_config_parse_error(parse_error: &TomlParseError) {
    error!(
        "Config file {} has a syntax error and cannot be loaded: {parse_error}",
        PlayerConfig::config_path().display()
    );
    error!("Fix the file or delete it to have a fresh template written on next start");
}

/// Check if file logging is enabled by reading the config file.
/// This is done before full config loading to set up tracing first.
/// Returns `false` if config doesn't exist or can't be parsed.
fn check_file_logging_enabled() -> bool {
    // Minimal structs to parse just the logging.enabled field
    #[derive(serde::Deserialize)]
    struct PartialConfig {
        #[serde(default)]
        logging: PartialLoggingConfig,
    }
    #[derive(serde::Deserialize, Default)]
    struct PartialLoggingConfig {
        #[serde(default)]
        enabled: bool,
    }

    let config_path = PlayerConfig::config_path();
    let Ok(content) = std::fs::read_to_string(&config_path) else {
        return false;
    };

    toml::from_str::<PartialConfig>(&content)
        .map(|c| c.logging.enabled)
        .unwrap_or(false)
}

/// Initialize tracing with console output and optional file logging
fn init_tracing(file_logging_enabled: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer();

    if file_logging_enabled {
        let log_path = ustplayer_core::log_file_path();

        // Create cache directory if needed
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        match File::create(&log_path) {
            Ok(file) => {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(Arc::new(file))
                    .with_ansi(false);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt_layer)
                    .with(file_layer)
                    .init();

                return;
            }
            Err(e) => {
                eprintln!("Failed to create log file at {}: {e}", log_path.display());
            }
        }
    }

    // Fallback: console only
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
