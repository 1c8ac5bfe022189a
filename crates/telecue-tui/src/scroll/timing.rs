//! L4 Atomic Layer: Time calculation utilities for the scroll engine
//!
//! All times are offsets from the start of the session clock, so the
//! functions stay pure and tests can feed exact values.

use std::time::Duration;

use telecue_core::config::BASE_SCROLL_VELOCITY;
use telecue_core::ScrollDirection;

/// Calculate animation progress (0.0 to 1.0) from elapsed time and duration
///
/// A zero duration is always complete.
#[inline]
pub fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Signed distance covered by continuous scrolling in `delta_seconds`
///
/// Forward travels toward decreasing offset, Reverse toward increasing.
#[inline]
pub fn scroll_distance(speed: f64, direction: ScrollDirection, delta_seconds: f64) -> f64 {
    direction.sign() * speed * BASE_SCROLL_VELOCITY * delta_seconds
}
