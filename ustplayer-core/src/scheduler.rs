//! Fixed-period tick driver.
//!
//! The driver runs on the task that awaits it, which should be the task that
//! owns the display surface. Nothing is spawned, so engine state is only ever
//! touched from that one task and each tick is a synchronous
//! compute-then-render pass.

use crate::clock::ClockSource;
use crate::playback::PlaybackEngine;
use crate::render::FrameRenderer;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Period between ticks
pub const TICK_PERIOD: Duration = Duration::from_millis(5);

/// How long the end frame stays up before the host tears down
pub const FINISH_GRACE: Duration = Duration::from_secs(1);

/// Cancelable handle to a running tick loop.
///
/// Cancelling is idempotent: cancelling a stopped or never-started loop is a
/// no-op.
#[derive(Debug, Clone, Default)]
pub struct TickHandle {
    token: CancellationToken,
}

impl TickHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tie the loop to an external token, e.g. the process shutdown token
    #[must_use]
    pub const fn from_token(token: CancellationToken) -> Self {
        Self { token }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Get a clone of the cancellation token
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.token.clone()
    }
}

/// Why a tick loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The timeline ran out and the end frame was rendered
    Finished,
    /// The handle was cancelled (close request or shutdown)
    Cancelled,
}

/// Drive `engine` every `period`, handing each frame to `renderer`.
///
/// Render failures are logged and skipped. Finishing depends only on elapsed
/// time, so a renderer that always fails cannot keep the loop alive. The
/// handle is cancelled before this returns.
pub async fn run_session<C, R>(
    engine: &mut PlaybackEngine<C>,
    renderer: &mut R,
    handle: &TickHandle,
    period: Duration,
) -> SessionEnd
where
    C: ClockSource,
    R: FrameRenderer + ?Sized,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut failed_frames = 0_u64;

    loop {
        tokio::select! {
            biased;
            () = handle.token.cancelled() => {
                info!("Tick loop cancelled");
                return SessionEnd::Cancelled;
            }
            _ = interval.tick() => {
                let Some(frame) = engine.tick() else {
                    handle.cancel();
                    return SessionEnd::Finished;
                };

                match renderer.render(&frame) {
                    Ok(()) => {
                        if failed_frames > 0 {
                            debug!("Rendering recovered after {} failed frames", failed_frames);
                            failed_frames = 0;
                        }
                    }
                    Err(e) => {
                        if failed_frames == 0 {
                            warn!("Failed to render frame at {:?}: {}", frame.elapsed, e);
                        }
                        failed_frames += 1;
                    }
                }

                if frame.is_finished {
                    handle.cancel();
                    info!("Tick loop finished");
                    return SessionEnd::Finished;
                }
            }
        }
    }
}
