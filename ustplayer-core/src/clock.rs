//! Monotonic playback clock.
//!
//! Elapsed time is always `now - start`. Nothing is accumulated between
//! ticks, so a late or skipped tick never shifts the ones after it.

use std::time::Duration;
use tokio::time::Instant;

/// Source of monotonic instants.
pub trait ClockSource {
    fn now(&self) -> Instant;
}

/// Production clock backed by tokio's monotonic [`Instant`].
///
/// Under `tokio::time::pause` this follows the paused test clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl ClockSource for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Session clock with a start instant captured exactly once.
#[derive(Debug, Clone)]
pub struct PlaybackClock<C = MonotonicClock> {
    source: C,
    start: Instant,
}

impl<C: ClockSource> PlaybackClock<C> {
    /// Start the clock now
    pub fn start(source: C) -> Self {
        let start = source.now();
        Self { source, start }
    }

    #[must_use]
    pub const fn started_at(&self) -> Instant {
        self.start
    }

    /// Time since start, saturating at zero for instants before it
    #[must_use]
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.start)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(self.source.now())
    }
}
