//! L3 Molecular Layer: Eased nudge transition
//!
//! Combines easing and timing atoms into the state of a single in-flight
//! nudge. The engine owns at most one of these at a time.

use std::time::Duration;

use super::easing::ease_in_out_cubic;
use super::timing::{lerp, progress};

/// A bounded-duration transition between two offsets
#[derive(Debug, Clone, PartialEq)]
pub struct NudgeAnimation {
    /// Offset when the nudge was issued
    pub start_offset: f64,
    /// Wrap-normalized destination
    pub target_offset: f64,
    /// Timestamp of the first frame, set lazily
    pub start_time: Option<Duration>,
    pub duration: Duration,
}

/// Interpolated position for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NudgeSample {
    /// Un-wrapped position for this frame
    pub offset: f64,
    /// True once the full duration has elapsed
    pub finished: bool,
}

impl NudgeAnimation {
    pub fn new(start_offset: f64, target_offset: f64, duration: Duration) -> Self {
        Self {
            start_offset,
            target_offset,
            start_time: None,
            duration,
        }
    }

    /// Advance to the frame at `now`
    ///
    /// The first call pins the start time, so the first frame always
    /// samples the start offset.
    pub fn sample(&mut self, now: Duration) -> NudgeSample {
        let start = *self.start_time.get_or_insert(now);
        let t = progress(now.saturating_sub(start), self.duration);
        NudgeSample {
            offset: lerp(self.start_offset, self.target_offset, ease_in_out_cubic(t)),
            finished: t >= 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_first_frame_starts_at_origin() {
        let mut anim = NudgeAnimation::new(100.0, 220.0, ms(280));
        let sample = anim.sample(ms(5000));
        assert_eq!(sample.offset, 100.0);
        assert!(!sample.finished);
        assert_eq!(anim.start_time, Some(ms(5000)));
    }

    #[test]
    fn test_midpoint_is_half_way() {
        let mut anim = NudgeAnimation::new(0.0, 120.0, ms(280));
        anim.sample(ms(0));
        let sample = anim.sample(ms(140));
        assert!((sample.offset - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_finishes_exactly_on_target() {
        let mut anim = NudgeAnimation::new(-40.0, 80.0, ms(280));
        anim.sample(ms(10));
        let sample = anim.sample(ms(290));
        assert!(sample.finished);
        assert!((sample.offset - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let mut anim = NudgeAnimation::new(0.0, 50.0, Duration::ZERO);
        let sample = anim.sample(ms(3));
        assert!(sample.finished);
        assert_eq!(sample.offset, 50.0);
    }
}
