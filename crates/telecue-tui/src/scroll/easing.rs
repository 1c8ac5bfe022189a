//! L4 Atomic Layer: Pure easing functions for nudge animations
//!
//! Maps input progress [0, 1] to output [0, 1].

/// Cubic ease-in-out: accelerates through the first half, decelerates through the second
///
/// f(t) = 4t³ for t < 0.5, otherwise 1 - (-2t + 2)³ / 2
#[inline]
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let inv = -2.0 * t + 2.0;
        1.0 - inv * inv * inv / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_boundaries() {
        assert!((ease_in_out_cubic(0.0) - 0.0).abs() < 1e-12);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-12);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
    }

    #[test]
    fn test_easing_clamps_input() {
        assert_eq!(ease_in_out_cubic(-1.0), 0.0);
        assert_eq!(ease_in_out_cubic(2.0), 1.0);
    }

    #[test]
    fn test_easing_symmetric() {
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let sum = ease_in_out_cubic(t) + ease_in_out_cubic(1.0 - t);
            assert!((sum - 1.0).abs() < 1e-9, "not symmetric at t={}", t);
        }
    }

    #[test]
    fn test_easing_monotonic() {
        let mut prev = 0.0;
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            let v = ease_in_out_cubic(t);
            assert!(v >= prev, "not monotonic at t={}", t);
            prev = v;
        }
    }
}
