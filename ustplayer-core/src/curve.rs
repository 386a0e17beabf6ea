//! Pitch-bend curve projection into screen space.
//!
//! Samples are laid out across the note's length (one pixel per tick) and
//! offset vertically from the screen center. Points that leave the safe zone
//! are compressed toward it instead of being cut off, then hard-clamped so
//! nothing is ever drawn off-canvas.

/// Distance from the top and bottom edges where compression starts
pub const SAFE_ZONE_MARGIN: f64 = 100.0;

/// Distance from the top and bottom edges no point may cross
pub const HARD_LIMIT_MARGIN: f64 = 50.0;

/// Fraction of the canvas height covered by a full-scale (±100) sample
pub const PITCH_SCALE: f64 = 0.09;

/// Nominal full-scale pitch-bend sample value
pub const PITCH_FULL_SCALE: f64 = 100.0;

/// Lower bound of the compression factor applied outside the safe zone
pub const MIN_COMPRESSION: f64 = 0.3;

/// Horizontal pixels per tick
pub const PIXELS_PER_TICK: f64 = 1.0;

/// A point on the canvas, y growing downwards
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Canvas dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.width / 2.0).floor(), (self.height / 2.0).floor())
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1920.0, 1080.0)
    }
}

/// Project pitch-bend samples to an on-screen polyline centered on `center`.
///
/// Returns no points for fewer than two samples or a non-positive length.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn project(samples: &[f64], length_ticks: i64, viewport: Viewport, center: Point) -> Vec<Point> {
    if samples.len() < 2 || length_ticks <= 0 {
        return Vec::new();
    }

    let total_width = (length_ticks as f64 * PIXELS_PER_TICK).floor();
    let start_x = center.x - (total_width / 2.0).floor();
    let last = (samples.len() - 1) as f64;
    let amplitude = viewport.height * PITCH_SCALE;

    samples
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let x = start_x + (i as f64 / last) * total_width;
            let raw_y = center.y - (value / PITCH_FULL_SCALE) * amplitude;
            Point::new(x, fit_to_safe_zone(raw_y, viewport.height))
        })
        .collect()
}

/// Softly compress `y` into the safe zone, then hard-clamp it on-canvas.
///
/// Inside `[100, height - 100]` the value is untouched. Beyond it the excess is
/// scaled by `max(0.3, 1 - excess / height * 2)`, so far-out points approach
/// the hard limits without a visible cut-off.
#[must_use]
pub fn fit_to_safe_zone(y: f64, height: f64) -> f64 {
    let safe_top = SAFE_ZONE_MARGIN;
    let safe_bottom = height - SAFE_ZONE_MARGIN;

    let compressed = if y < safe_top {
        let excess = safe_top - y;
        safe_top - excess * compression(excess, height)
    } else if y > safe_bottom {
        let excess = y - safe_bottom;
        safe_bottom + excess * compression(excess, height)
    } else {
        y
    };

    compressed.max(HARD_LIMIT_MARGIN).min(height - HARD_LIMIT_MARGIN)
}

fn compression(excess: f64, height: f64) -> f64 {
    (1.0 - excess / height * 2.0).max(MIN_COMPRESSION)
}
