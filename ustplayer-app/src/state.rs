use dioxus::prelude::*;
use ustplayer_core::{DisplaySettings, FrameState, LyricTrack, Session, StageLayout, TickHandle};

/// Everything loaded before the window opens, injected via `with_context`.
#[derive(Clone)]
pub struct PlayerContext {
    pub session: Session,
    pub lyrics: LyricTrack,
    pub settings: DisplaySettings,
    /// Shared with the Ctrl+C handler and the Escape key
    pub handle: TickHandle,
}

/// Stage display state.
///
/// `frame` is replaced wholesale on every rendered tick; `layout` is fixed
/// once the window size is known.
#[derive(Clone, Copy)]
pub struct StageState {
    pub frame: Signal<FrameState>,
    pub layout: Signal<StageLayout>,
}

impl StageState {
    #[must_use]
    pub fn new(layout: StageLayout) -> Self {
        Self {
            frame: Signal::new(FrameState::default()),
            layout: Signal::new(layout),
        }
    }
}
