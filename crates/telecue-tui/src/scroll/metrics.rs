//! L4 Atomic Layer: Layout metrics, the wrap rule and progress math
//!
//! The offset of the content relative to the container lives on a cycle
//! of length `container + content`. Forward scrolling starts with the
//! content just below the container (`offset = container`) and finishes
//! once it has fully left through the top (`offset = -content`). Reverse
//! runs the same cycle the other way round.

use telecue_core::ScrollDirection;

/// Extents reported by the surface, in position units
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutMetrics {
    pub container_extent: f64,
    pub content_extent: f64,
}

impl LayoutMetrics {
    /// Negative or non-finite extents are treated as zero
    pub fn new(container_extent: f64, content_extent: f64) -> Self {
        let sane = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self {
            container_extent: sane(container_extent),
            content_extent: sane(content_extent),
        }
    }

    /// Zero extents mean the surface cannot be measured yet
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.container_extent == 0.0 || self.content_extent == 0.0
    }

    /// Length of one full loop
    #[inline]
    pub fn cycle_length(&self) -> f64 {
        self.container_extent + self.content_extent
    }
}

/// Source of layout measurements, queried on demand
pub trait LayoutProvider {
    fn measure(&self) -> LayoutMetrics;
}

/// A surface whose size never changes
impl LayoutProvider for LayoutMetrics {
    fn measure(&self) -> LayoutMetrics {
        *self
    }
}

/// Apply cyclic re-entry so the content loops instead of stopping
///
/// Forward: at or past the leading edge (`<= -content`) re-enters at
/// `container`; past the trailing edge (`> container`) jumps to `-content`.
/// Reverse mirrors this.
pub fn wrap(offset: f64, metrics: LayoutMetrics, direction: ScrollDirection) -> f64 {
    let container = metrics.container_extent;
    let content = metrics.content_extent;
    match direction {
        ScrollDirection::Forward => {
            if offset <= -content {
                container
            } else if offset > container {
                -content
            } else {
                offset
            }
        }
        ScrollDirection::Reverse => {
            if offset >= container {
                -content
            } else if offset < -content {
                container
            } else {
                offset
            }
        }
    }
}

/// Offset at which a fresh cycle begins
pub fn entry_offset(metrics: LayoutMetrics, direction: ScrollDirection) -> f64 {
    match direction {
        ScrollDirection::Forward => metrics.container_extent,
        ScrollDirection::Reverse => -metrics.content_extent,
    }
}

/// Fraction of the cycle already travelled, clamped to [0, 1]
///
/// Returns `None` when the cycle has no length.
pub fn cycle_progress(offset: f64, metrics: LayoutMetrics, direction: ScrollDirection) -> Option<f64> {
    let total = metrics.cycle_length();
    if total <= 0.0 {
        return None;
    }
    let travelled = match direction {
        ScrollDirection::Forward => metrics.container_extent - offset,
        ScrollDirection::Reverse => offset + metrics.content_extent,
    };
    Some((travelled / total).clamp(0.0, 1.0))
}

/// Inverse of [`cycle_progress`]
pub fn offset_at_progress(progress: f64, metrics: LayoutMetrics, direction: ScrollDirection) -> f64 {
    let total = metrics.cycle_length();
    match direction {
        ScrollDirection::Forward => metrics.container_extent - progress * total,
        ScrollDirection::Reverse => -metrics.content_extent + progress * total,
    }
}

/// Move an offset measured against `prev` onto `next`, keeping the same
/// fraction through the cycle
///
/// Degenerate previous metrics or an empty cycle on either side fall back
/// to the entry offset of `next`.
pub fn translate(
    offset: f64,
    prev: LayoutMetrics,
    next: LayoutMetrics,
    direction: ScrollDirection,
) -> f64 {
    if prev.is_degenerate() || next.cycle_length() <= 0.0 {
        return entry_offset(next, direction);
    }
    match cycle_progress(offset, prev, direction) {
        Some(progress) => offset_at_progress(progress, next, direction),
        None => entry_offset(next, direction),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn metrics() -> LayoutMetrics {
        LayoutMetrics::new(600.0, 1200.0)
    }

    #[test]
    fn test_new_rejects_negative_and_nan() {
        let m = LayoutMetrics::new(-5.0, f64::NAN);
        assert_eq!(m, LayoutMetrics::default());
        assert!(m.is_degenerate());
    }

    #[test]
    fn test_forward_wrap() {
        let m = metrics();
        let fwd = ScrollDirection::Forward;
        assert_eq!(wrap(-1200.0, m, fwd), 600.0);
        assert_eq!(wrap(-1500.0, m, fwd), 600.0);
        assert_eq!(wrap(601.0, m, fwd), -1200.0);
        assert_eq!(wrap(600.0, m, fwd), 600.0);
        assert_eq!(wrap(-1199.5, m, fwd), -1199.5);
    }

    #[test]
    fn test_reverse_wrap() {
        let m = metrics();
        let rev = ScrollDirection::Reverse;
        assert_eq!(wrap(600.0, m, rev), -1200.0);
        assert_eq!(wrap(-1201.0, m, rev), 600.0);
        assert_eq!(wrap(-1200.0, m, rev), -1200.0);
        assert_eq!(wrap(599.5, m, rev), 599.5);
    }

    #[test]
    fn test_wrap_closure_in_direction_of_travel() {
        let m = metrics();
        // Forward only ever decreases the offset between wraps
        let mut offset = 600.0;
        for _ in 0..10_000 {
            offset = wrap(offset - 7.3, m, ScrollDirection::Forward);
            assert!(offset > -1200.0 && offset <= 600.0, "forward escaped: {}", offset);
        }
        let mut offset = -1200.0;
        for _ in 0..10_000 {
            offset = wrap(offset + 7.3, m, ScrollDirection::Reverse);
            assert!(offset >= -1200.0 && offset < 600.0, "reverse escaped: {}", offset);
        }
    }

    #[test]
    fn test_wrap_result_stays_on_cycle() {
        let m = metrics();
        for dir in [ScrollDirection::Forward, ScrollDirection::Reverse] {
            for i in -400..400 {
                let raw = i as f64 * 9.7;
                let wrapped = wrap(raw, m, dir);
                assert!(wrapped >= -1200.0 && wrapped <= 600.0, "{:?} {} -> {}", dir, raw, wrapped);
            }
        }
    }

    #[test]
    fn test_entry_offset() {
        let m = metrics();
        assert_eq!(entry_offset(m, ScrollDirection::Forward), 600.0);
        assert_eq!(entry_offset(m, ScrollDirection::Reverse), -1200.0);
    }

    #[test]
    fn test_progress_preserved_across_resize() {
        let prev = metrics();
        let next = LayoutMetrics::new(800.0, 1600.0);
        let progress = cycle_progress(-200.0, prev, ScrollDirection::Forward).unwrap();
        assert!((progress - 800.0 / 1800.0).abs() < EPS);

        let moved = translate(-200.0, prev, next, ScrollDirection::Forward);
        assert!((moved - (800.0 - (800.0 / 1800.0) * 2400.0)).abs() < EPS);
        assert!((moved - -266.666_666_666).abs() < 1e-6);
    }

    #[test]
    fn test_reverse_translate() {
        let prev = metrics();
        let next = LayoutMetrics::new(300.0, 600.0);
        // Halfway through the reverse cycle
        let moved = translate(-300.0, prev, next, ScrollDirection::Reverse);
        assert!((moved - (-600.0 + 0.5 * 900.0)).abs() < EPS);
    }

    #[test]
    fn test_progress_is_clamped() {
        let m = metrics();
        assert_eq!(cycle_progress(5000.0, m, ScrollDirection::Forward), Some(0.0));
        assert_eq!(cycle_progress(-5000.0, m, ScrollDirection::Forward), Some(1.0));
    }

    #[test]
    fn test_translate_from_degenerate_uses_entry() {
        let next = metrics();
        let moved = translate(42.0, LayoutMetrics::new(600.0, 0.0), next, ScrollDirection::Forward);
        assert_eq!(moved, 600.0);
        let moved = translate(42.0, LayoutMetrics::default(), next, ScrollDirection::Reverse);
        assert_eq!(moved, -1200.0);
    }

    #[test]
    fn test_translate_same_metrics_is_identity() {
        let m = metrics();
        for dir in [ScrollDirection::Forward, ScrollDirection::Reverse] {
            let moved = translate(-321.0, m, m, dir);
            assert!((moved - -321.0).abs() < EPS);
        }
    }

    #[test]
    fn test_empty_cycle_has_no_progress() {
        assert_eq!(cycle_progress(0.0, LayoutMetrics::default(), ScrollDirection::Forward), None);
    }
}
