//! L4 Atomic Layer: Frame and timer scheduling port
//!
//! The engine never reads a wall clock. It registers interest in the next
//! frame or in a timer and gets handed a [`Wakeup`] when the driver pumps
//! it with the current session time. [`TimerQueue`] is the deterministic
//! implementation used both by the terminal loop and by tests.

use std::collections::VecDeque;
use std::time::Duration;

/// Handle of a registered frame request or timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// A registration that has come due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wakeup {
    /// Frame callback, `at` is the frame timestamp
    Frame { id: TaskId, at: Duration },
    /// Timeout or interval tick, `at` is its scheduled deadline
    Timer { id: TaskId, at: Duration },
}

/// Scheduling port used by the scroll engine
pub trait Scheduler {
    /// Current time as last observed by the scheduler
    fn now(&self) -> Duration;

    /// Ask for a callback on the next frame
    fn request_frame(&mut self) -> TaskId;

    /// One-shot timer firing `delay` after [`Scheduler::now`]
    fn set_timeout(&mut self, delay: Duration) -> TaskId;

    /// Periodic timer, first tick one `period` after [`Scheduler::now`]
    fn set_interval(&mut self, period: Duration) -> TaskId;

    /// Drop a registration. Cancelled tasks are never returned again.
    fn cancel(&mut self, id: TaskId);

    /// Pop the next registration due at or before `now`
    fn next_due(&mut self, now: Duration) -> Option<Wakeup>;

    /// True when nothing is registered
    fn is_idle(&self) -> bool;
}

#[derive(Debug, Clone)]
struct Timer {
    id: TaskId,
    deadline: Duration,
    period: Option<Duration>,
}

/// Deterministic scheduler driven by explicit timestamps
///
/// Timers fire in deadline order and are dispatched at their own deadline,
/// so a coarse pump still observes every interval tick at the right time.
/// A frame requested while frames are being dispatched waits for the next
/// frame timestamp.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    clock: Duration,
    timers: Vec<Timer>,
    /// Requested frames waiting for the next frame timestamp
    pending_frames: Vec<TaskId>,
    /// Frames being dispatched for `last_frame`
    due_frames: VecDeque<TaskId>,
    last_frame: Option<Duration>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> TaskId {
        self.next_id += 1;
        TaskId(self.next_id)
    }

    /// Number of live registrations
    pub fn pending(&self) -> usize {
        self.timers.len() + self.pending_frames.len() + self.due_frames.len()
    }

    fn pop_timer(&mut self, now: Duration) -> Option<Wakeup> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= now)
            .min_by_key(|(_, t)| (t.deadline, t.id))
            .map(|(i, _)| i)?;

        let deadline = self.timers[index].deadline;
        let id = self.timers[index].id;
        match self.timers[index].period {
            Some(period) => self.timers[index].deadline = deadline + period,
            None => {
                self.timers.swap_remove(index);
            }
        }
        self.clock = self.clock.max(deadline);
        Some(Wakeup::Timer { id, at: deadline })
    }
}

impl Scheduler for TimerQueue {
    fn now(&self) -> Duration {
        self.clock
    }

    fn request_frame(&mut self) -> TaskId {
        let id = self.allocate();
        self.pending_frames.push(id);
        id
    }

    fn set_timeout(&mut self, delay: Duration) -> TaskId {
        let id = self.allocate();
        self.timers.push(Timer {
            id,
            deadline: self.clock + delay,
            period: None,
        });
        id
    }

    fn set_interval(&mut self, period: Duration) -> TaskId {
        // A zero period would never let the clock advance
        let period = period.max(Duration::from_millis(1));
        let id = self.allocate();
        self.timers.push(Timer {
            id,
            deadline: self.clock + period,
            period: Some(period),
        });
        id
    }

    fn cancel(&mut self, id: TaskId) {
        self.timers.retain(|t| t.id != id);
        self.pending_frames.retain(|f| *f != id);
        self.due_frames.retain(|f| *f != id);
    }

    fn next_due(&mut self, now: Duration) -> Option<Wakeup> {
        if let Some(wakeup) = self.pop_timer(now) {
            return Some(wakeup);
        }
        self.clock = self.clock.max(now);

        let frame_time = self.clock;
        if self.due_frames.is_empty()
            && !self.pending_frames.is_empty()
            && self.last_frame.map_or(true, |last| frame_time > last)
        {
            self.due_frames.extend(self.pending_frames.drain(..));
            self.last_frame = Some(frame_time);
        }

        let id = self.due_frames.pop_front()?;
        Some(Wakeup::Frame {
            id,
            at: self.last_frame.unwrap_or(frame_time),
        })
    }

    fn is_idle(&self) -> bool {
        self.pending() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn drain(queue: &mut TimerQueue, now: Duration) -> Vec<Wakeup> {
        std::iter::from_fn(|| queue.next_due(now)).collect()
    }

    #[test]
    fn test_timeout_fires_once_at_deadline() {
        let mut queue = TimerQueue::new();
        let id = queue.set_timeout(ms(260));

        assert!(drain(&mut queue, ms(259)).is_empty());
        assert_eq!(drain(&mut queue, ms(300)), vec![Wakeup::Timer { id, at: ms(260) }]);
        assert!(drain(&mut queue, ms(1000)).is_empty());
        assert!(queue.is_idle());
    }

    #[test]
    fn test_interval_catches_up_in_order() {
        let mut queue = TimerQueue::new();
        let id = queue.set_interval(ms(180));

        let fired: Vec<Duration> = drain(&mut queue, ms(700))
            .into_iter()
            .map(|w| match w {
                Wakeup::Timer { id: fired, at } => {
                    assert_eq!(fired, id);
                    at
                }
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(fired, vec![ms(180), ms(360), ms(540)]);
        assert_eq!(queue.now(), ms(700));
    }

    #[test]
    fn test_timer_armed_during_dispatch_uses_dispatch_time() {
        let mut queue = TimerQueue::new();
        queue.set_timeout(ms(260));

        assert!(matches!(queue.next_due(ms(700)), Some(Wakeup::Timer { .. })));
        assert_eq!(queue.now(), ms(260));
        queue.set_interval(ms(180));

        let ticks = drain(&mut queue, ms(700));
        let times: Vec<Duration> = ticks
            .iter()
            .map(|w| match w {
                Wakeup::Timer { at, .. } => *at,
                Wakeup::Frame { at, .. } => *at,
            })
            .collect();
        assert_eq!(times, vec![ms(440), ms(620)]);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut queue = TimerQueue::new();
        let id = queue.set_interval(ms(10));
        queue.cancel(id);
        assert!(drain(&mut queue, ms(1000)).is_empty());
        assert!(queue.is_idle());
    }

    #[test]
    fn test_frame_requested_during_frame_waits_for_next() {
        let mut queue = TimerQueue::new();
        let first = queue.request_frame();

        assert_eq!(queue.next_due(ms(16)), Some(Wakeup::Frame { id: first, at: ms(16) }));
        let second = queue.request_frame();
        assert_eq!(queue.next_due(ms(16)), None);
        assert_eq!(queue.next_due(ms(32)), Some(Wakeup::Frame { id: second, at: ms(32) }));
    }

    #[test]
    fn test_cancel_due_frame() {
        let mut queue = TimerQueue::new();
        let a = queue.request_frame();
        let b = queue.request_frame();

        assert_eq!(queue.next_due(ms(16)), Some(Wakeup::Frame { id: a, at: ms(16) }));
        queue.cancel(b);
        assert_eq!(queue.next_due(ms(16)), None);
    }

    #[test]
    fn test_timers_before_frames() {
        let mut queue = TimerQueue::new();
        let frame = queue.request_frame();
        let timer = queue.set_timeout(ms(5));

        assert_eq!(queue.next_due(ms(16)), Some(Wakeup::Timer { id: timer, at: ms(5) }));
        assert_eq!(queue.next_due(ms(16)), Some(Wakeup::Frame { id: frame, at: ms(16) }));
    }
}
