//! L4 Atomic Layer: Hold-repeat state
//!
//! A held nudge key fires once immediately, waits for the initial delay,
//! then repeats on a fixed interval until released. The engine drives the
//! transitions; this module only describes the states.

use super::scheduler::TaskId;

/// Direction of a discrete nudge on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NudgeDirection {
    /// Move the text up (toward decreasing offset)
    Up,
    /// Move the text down (toward increasing offset)
    Down,
}

impl NudgeDirection {
    /// Signed displacement for a nudge of `distance` units
    #[inline]
    pub fn delta(self, distance: f64) -> f64 {
        match self {
            NudgeDirection::Up => -distance,
            NudgeDirection::Down => distance,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NudgeDirection::Up => "up",
            NudgeDirection::Down => "down",
        }
    }
}

/// Observable phase of the hold-repeat controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldPhase {
    Idle,
    /// Key down, waiting for the initial delay
    Pending,
    /// Repeating on the interval timer
    Repeating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum HoldState {
    #[default]
    Idle,
    Pending {
        direction: NudgeDirection,
        delay: TaskId,
    },
    Repeating {
        direction: NudgeDirection,
        interval: TaskId,
    },
}

impl HoldState {
    pub(crate) fn phase(&self) -> HoldPhase {
        match self {
            HoldState::Idle => HoldPhase::Idle,
            HoldState::Pending { .. } => HoldPhase::Pending,
            HoldState::Repeating { .. } => HoldPhase::Repeating,
        }
    }

    /// Timer currently armed for this hold, if any
    pub(crate) fn timer(&self) -> Option<TaskId> {
        match self {
            HoldState::Idle => None,
            HoldState::Pending { delay, .. } => Some(*delay),
            HoldState::Repeating { interval, .. } => Some(*interval),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nudge_delta_sign() {
        assert_eq!(NudgeDirection::Up.delta(120.0), -120.0);
        assert_eq!(NudgeDirection::Down.delta(120.0), 120.0);
    }

    #[test]
    fn test_idle_has_no_timer() {
        assert_eq!(HoldState::Idle.timer(), None);
        assert_eq!(HoldState::Idle.phase(), HoldPhase::Idle);
    }
}
