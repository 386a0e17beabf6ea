use crate::state::{PlayerContext, StageState};
use dioxus::desktop::use_window;
use dioxus::prelude::*;
use tracing::{debug, info};
use ustplayer_core::{
    run_session, FrameRenderer, FrameState, PlaybackEngine, RenderError, SessionEnd,
    FINISH_GRACE, TICK_PERIOD,
};

const LOG_TARGET: &str = "ustplayer::bridge";

/// Renders frames by replacing the stage's frame signal.
pub struct SignalRenderer {
    frame: Signal<FrameState>,
}

impl SignalRenderer {
    #[must_use]
    pub const fn new(frame: Signal<FrameState>) -> Self {
        Self { frame }
    }
}

impl FrameRenderer for SignalRenderer {
    fn render(&mut self, frame: &FrameState) -> Result<(), RenderError> {
        let unchanged = {
            let current = self.frame.try_peek().map_err(|e| RenderError::Surface {
                reason: e.to_string(),
            })?;
            *current == *frame
        };

        // Skip the write so subscribers are not re-rendered
        if unchanged {
            return Ok(());
        }

        let mut current = self.frame.try_write().map_err(|e| RenderError::Surface {
            reason: e.to_string(),
        })?;
        *current = frame.clone();
        Ok(())
    }
}

/// Drive playback on the UI task and close the window when it ends.
///
/// The tick loop runs inside the component's own future, so every frame is
/// computed and written on the thread that owns the window.
pub fn use_playback(player: PlayerContext, stage: StageState) {
    let window = use_window();

    use_future(move || {
        let player = player.clone();
        let window = window.clone();
        async move {
            let viewport = stage.layout.peek().viewport;
            let mut engine = PlaybackEngine::start(
                player.session.timeline.clone(),
                player.lyrics.clone(),
                player.settings.clone(),
                viewport,
            );
            let mut renderer = SignalRenderer::new(stage.frame);

            info!(target: LOG_TARGET, "Playback started ({}x{})", viewport.width, viewport.height);
            let end = run_session(&mut engine, &mut renderer, &player.handle, TICK_PERIOD).await;

            match end {
                SessionEnd::Finished => {
                    info!(target: LOG_TARGET, "Playback finished, closing in {:?}", FINISH_GRACE);
                    tokio::time::sleep(FINISH_GRACE).await;
                }
                SessionEnd::Cancelled => {
                    debug!(target: LOG_TARGET, "Playback cancelled, closing now");
                }
            }

            window.close();
        }
    });
}
