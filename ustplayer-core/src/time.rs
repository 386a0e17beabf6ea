//! Time and duration conversion utilities.
//!
//! This module converts monotonic durations into timeline ticks and the
//! transport text shown while playing, with explicit saturation behavior.

use std::time::Duration;

/// Extension trait for playback-oriented Duration conversions.
pub trait DurationExt {
    /// Convert duration to whole timeline ticks at `tick_rate` ticks per second.
    ///
    /// The fractional tick is dropped. Since tick ranges start and end on whole
    /// ticks, `floor(t)` lands in the same range as `t` itself. Saturates at
    /// `u64::MAX`; a NaN or negative rate yields zero.
    fn as_ticks(&self, tick_rate: f64) -> u64;

    /// Format as `MM:SS:cc` (minutes, seconds, centiseconds).
    fn play_time_text(&self) -> String;
}

impl DurationExt for Duration {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn as_ticks(&self, tick_rate: f64) -> u64 {
        let ticks = self.as_secs_f64() * tick_rate;
        if ticks.is_nan() || ticks <= 0.0 {
            return 0;
        }
        // Float-to-int `as` saturates at u64::MAX
        ticks.floor() as u64
    }

    fn play_time_text(&self) -> String {
        let secs = self.as_secs();
        let centis = self.subsec_millis() / 10;
        format!("{:02}:{:02}:{centis:02}", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_ticks_at_120_bpm() {
        // 120 bpm -> 960 ticks per second
        let duration = Duration::from_millis(500);
        assert_eq!(duration.as_ticks(960.0), 480);
    }

    #[test]
    fn test_as_ticks_truncates_fraction() {
        let duration = Duration::from_micros(1_999);
        assert_eq!(duration.as_ticks(1000.0), 1);
    }

    #[test]
    fn test_as_ticks_zero() {
        assert_eq!(Duration::ZERO.as_ticks(960.0), 0);
    }

    #[test]
    fn test_as_ticks_invalid_rate() {
        let duration = Duration::from_secs(1);
        assert_eq!(duration.as_ticks(f64::NAN), 0);
        assert_eq!(duration.as_ticks(-5.0), 0);
        assert_eq!(duration.as_ticks(f64::INFINITY), u64::MAX);
    }

    #[test]
    fn test_play_time_text() {
        let duration = Duration::from_millis(62_345);
        assert_eq!(duration.play_time_text(), "01:02:34");
    }

    #[test]
    fn test_play_time_text_zero() {
        assert_eq!(Duration::ZERO.play_time_text(), "00:00:00");
    }

    #[test]
    fn test_play_time_text_long_session() {
        let duration = Duration::from_secs(3_725);
        assert_eq!(duration.play_time_text(), "62:05:00");
    }
}
