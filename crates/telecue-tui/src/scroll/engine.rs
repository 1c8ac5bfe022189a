//! L2 Organism Layer: The scroll engine
//!
//! Owns the single authoritative offset of a presentation session and
//! every mutator of it: the continuous scroller, the nudge animator and
//! the hold-repeat controller. At most one of scroller and nudge holds a
//! frame registration at any time; starting one cancels the other before
//! touching the offset. Every mutation re-applies the wrap rule and then
//! publishes the offset.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use telecue_core::config::clamp_speed;
use telecue_core::{ScrollConfig, ScrollDirection};

use super::animation::NudgeAnimation;
use super::hold::{HoldPhase, HoldState, NudgeDirection};
use super::metrics::{self, LayoutMetrics, LayoutProvider};
use super::scheduler::{Scheduler, TaskId, TimerQueue, Wakeup};
use super::timing::scroll_distance;

/// Output published by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// New offset after a mutation
    Offset(f64),
    /// A user-initiated nudge was issued
    Nudged { delta: f64 },
    /// Play state changed
    Playback { playing: bool },
}

/// Which animation currently writes the offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Idle,
    Scrolling,
    Nudging,
}

#[derive(Debug, Clone)]
enum Motion {
    Idle,
    Scrolling {
        frame: TaskId,
        /// None until the first frame after (re)starting
        last_tick: Option<Duration>,
    },
    Nudging {
        frame: TaskId,
        animation: NudgeAnimation,
    },
}

impl Motion {
    fn frame(&self) -> Option<TaskId> {
        match self {
            Motion::Idle => None,
            Motion::Scrolling { frame, .. } | Motion::Nudging { frame, .. } => Some(*frame),
        }
    }

    fn activity(&self) -> Activity {
        match self {
            Motion::Idle => Activity::Idle,
            Motion::Scrolling { .. } => Activity::Scrolling,
            Motion::Nudging { .. } => Activity::Nudging,
        }
    }
}

/// Scroll and layout engine for one presentation surface
///
/// Drive it by calling [`ScrollEngine::pump`] with the session time on
/// every loop iteration; input and configuration calls may happen in
/// between.
pub struct ScrollEngine<L, S = TimerQueue> {
    config: ScrollConfig,
    layout: L,
    scheduler: S,
    /// Metrics measured by the last recompute
    metrics: LayoutMetrics,
    offset: f64,
    active: bool,
    /// User intent: keep scrolling whenever no nudge is in flight
    playing: bool,
    motion: Motion,
    hold: HoldState,
    event_tx: Option<mpsc::UnboundedSender<EngineEvent>>,
}

impl<L: LayoutProvider, S: Scheduler> ScrollEngine<L, S> {
    pub fn new(config: ScrollConfig, layout: L, scheduler: S) -> Self {
        Self {
            config: config.sanitized(),
            layout,
            scheduler,
            metrics: LayoutMetrics::default(),
            offset: 0.0,
            active: false,
            playing: false,
            motion: Motion::Idle,
            hold: HoldState::Idle,
            event_tx: None,
        }
    }

    /// Set the channel that receives published output
    pub fn with_event_sender(mut self, tx: mpsc::UnboundedSender<EngineEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    #[inline]
    pub fn metrics(&self) -> LayoutMetrics {
        self.metrics
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.config.speed
    }

    #[inline]
    pub fn direction(&self) -> ScrollDirection {
        self.config.direction
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn activity(&self) -> Activity {
        self.motion.activity()
    }

    pub fn hold_phase(&self) -> HoldPhase {
        self.hold.phase()
    }

    /// Fraction of the current cycle already travelled
    pub fn progress(&self) -> Option<f64> {
        metrics::cycle_progress(self.offset, self.metrics, self.config.direction)
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Mutable access to the provider. Call [`ScrollEngine::on_resize`]
    /// afterwards if the change affects the metrics.
    pub fn layout_mut(&mut self) -> &mut L {
        &mut self.layout
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    // ----- lifecycle -------------------------------------------------

    /// Activate the surface and place the content at its entry position
    pub fn enter_presentation(&mut self) {
        self.active = true;
        self.recompute(false);
        info!(
            offset = self.offset,
            direction = self.config.direction.label(),
            "Presentation started"
        );
    }

    /// Stop every animation and timer and park the offset at zero
    pub fn exit_presentation(&mut self) {
        self.cancel_hold();
        self.cancel_motion();
        self.set_playing(false);
        self.active = false;
        self.metrics = LayoutMetrics::default();
        self.offset = 0.0;
        self.publish();
        info!("Presentation ended");
    }

    // ----- playback --------------------------------------------------

    /// Begin continuous scrolling
    ///
    /// While a nudge is in flight the scroller starts once it completes.
    pub fn start(&mut self) {
        if !self.active {
            debug!("Ignoring start: presentation is not active");
            return;
        }
        self.set_playing(true);
        if matches!(self.motion, Motion::Idle) {
            self.start_scroller();
        }
    }

    /// Stop continuous scrolling. Idempotent; an in-flight nudge still
    /// completes but will not resume the scroller.
    pub fn stop(&mut self) {
        self.set_playing(false);
        if matches!(self.motion, Motion::Scrolling { .. }) {
            self.cancel_motion();
            debug!(offset = self.offset, "Scroller stopped");
        }
    }

    pub fn toggle_play(&mut self) {
        if self.playing {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Jump back to the entry position, keeping playback running
    pub fn reset(&mut self) {
        if !self.active {
            return;
        }
        self.cancel_motion();
        self.recompute(false);
        if self.playing {
            self.start_scroller();
        }
    }

    // ----- configuration ---------------------------------------------

    /// Set the speed multiplier, clamped to the supported range.
    /// Takes effect on the next frame without touching timing state.
    pub fn set_speed(&mut self, speed: f64) -> f64 {
        self.config.speed = clamp_speed(speed);
        debug!(speed = self.config.speed, "Speed changed");
        self.recompute(true);
        self.config.speed
    }

    pub fn adjust_speed(&mut self, delta: f64) -> f64 {
        // Round away float drift from repeated 0.1 steps
        let speed = ((self.config.speed + delta) * 1000.0).round() / 1000.0;
        self.set_speed(speed)
    }

    /// Change direction while keeping the content where it is on screen
    pub fn set_direction(&mut self, direction: ScrollDirection) {
        if direction == self.config.direction {
            return;
        }
        self.config.direction = direction;
        debug!(direction = direction.label(), "Direction changed");
        if !self.active {
            return;
        }
        self.cancel_motion();
        self.recompute(true);
        if self.playing {
            self.start_scroller();
        }
    }

    pub fn toggle_direction(&mut self) -> ScrollDirection {
        self.set_direction(self.config.direction.flipped());
        self.config.direction
    }

    // ----- layout ----------------------------------------------------

    /// The surface changed size
    pub fn on_resize(&mut self) {
        self.recompute(true);
    }

    /// Mutate the layout provider, then re-measure keeping progress
    pub fn update_layout<F>(&mut self, update: F)
    where
        F: FnOnce(&mut L),
    {
        update(&mut self.layout);
        self.recompute(true);
    }

    /// Re-measure the surface and reposition the content
    ///
    /// With `preserve` and usable previous metrics the content keeps its
    /// fraction through the cycle; otherwise it goes to the entry position.
    /// No-op while the presentation is inactive.
    pub fn recompute(&mut self, preserve: bool) {
        if !self.active {
            return;
        }

        let prev = self.metrics;
        let next = self.layout.measure();
        self.metrics = next;
        let direction = self.config.direction;

        let preserving = preserve && !prev.is_degenerate();
        let offset = if preserving {
            metrics::translate(self.offset, prev, next, direction)
        } else {
            metrics::entry_offset(next, direction)
        };

        if preserving {
            if let Motion::Nudging { animation, .. } = &mut self.motion {
                animation.start_offset =
                    metrics::translate(animation.start_offset, prev, next, direction);
                animation.target_offset = metrics::wrap(
                    metrics::translate(animation.target_offset, prev, next, direction),
                    next,
                    direction,
                );
            }
        }

        self.offset = metrics::wrap(offset, next, direction);
        debug!(
            preserve,
            container = next.container_extent,
            content = next.content_extent,
            offset = self.offset,
            "Recomputed layout"
        );
        self.publish();
    }

    // ----- nudges ----------------------------------------------------

    /// Animate the offset by `delta` over the nudge duration
    ///
    /// The target is wrapped before animating, so a nudge that crosses
    /// the cycle seam interpolates straight toward the wrapped value.
    pub fn nudge(&mut self, delta: f64, announce: bool) {
        if !self.active {
            return;
        }
        if self.metrics.is_degenerate() {
            self.recompute(true);
        }

        self.cancel_motion();

        let direction = self.config.direction;
        let start = self.offset;
        let target = metrics::wrap(start + delta, self.metrics, direction);
        if announce {
            self.send_event(EngineEvent::Nudged { delta });
        }

        let frame = self.scheduler.request_frame();
        self.motion = Motion::Nudging {
            frame,
            animation: NudgeAnimation::new(start, target, self.nudge_duration()),
        };
        debug!(start, target, delta, "Nudge started");
    }

    /// A nudge key went down (`is_repeat` for auto-repeat signals)
    pub fn begin_nudge(&mut self, direction: NudgeDirection, is_repeat: bool) {
        if !self.active {
            return;
        }
        let delta = direction.delta(self.config.nudge_distance);

        if is_repeat {
            self.nudge(delta, false);
            return;
        }

        self.cancel_hold();
        self.nudge(delta, true);
        let delay = self
            .scheduler
            .set_timeout(Duration::from_millis(self.config.hold_delay_ms));
        self.hold = HoldState::Pending { direction, delay };
        debug!(direction = direction.label(), "Hold pending");
    }

    /// The nudge key was released
    pub fn end_nudge(&mut self) {
        self.cancel_hold();
    }

    /// Drop any hold and its timers (release, focus loss, other input)
    pub fn cancel_hold(&mut self) {
        if let Some(timer) = self.hold.timer() {
            self.scheduler.cancel(timer);
            debug!(phase = ?self.hold.phase(), "Hold cancelled");
        }
        self.hold = HoldState::Idle;
    }

    // ----- driver ----------------------------------------------------

    /// Dispatch every frame and timer due at `now`
    pub fn pump(&mut self, now: Duration) {
        while let Some(wakeup) = self.scheduler.next_due(now) {
            match wakeup {
                Wakeup::Frame { id, at } => self.on_frame(id, at),
                Wakeup::Timer { id, .. } => self.on_timer(id),
            }
        }
    }

    fn on_frame(&mut self, id: TaskId, at: Duration) {
        let owner = match &self.motion {
            Motion::Scrolling { frame, .. } if *frame == id => Activity::Scrolling,
            Motion::Nudging { frame, .. } if *frame == id => Activity::Nudging,
            _ => Activity::Idle,
        };
        match owner {
            Activity::Scrolling => self.scroll_frame(at),
            Activity::Nudging => self.nudge_frame(at),
            Activity::Idle => debug!(?id, "Ignoring stale frame"),
        }
    }

    fn on_timer(&mut self, id: TaskId) {
        match self.hold {
            HoldState::Pending { direction, delay } if delay == id => {
                let interval = self
                    .scheduler
                    .set_interval(Duration::from_millis(self.config.hold_interval_ms));
                self.hold = HoldState::Repeating { direction, interval };
                debug!(direction = direction.label(), "Hold repeating");
            }
            HoldState::Repeating { direction, interval } if interval == id => {
                self.nudge(direction.delta(self.config.nudge_distance), false);
            }
            _ => debug!(?id, "Ignoring stale hold timer"),
        }
    }

    fn scroll_frame(&mut self, at: Duration) {
        let Motion::Scrolling { last_tick, .. } = &mut self.motion else {
            return;
        };
        let previous = last_tick.replace(at);

        let next_frame = self.scheduler.request_frame();
        if let Motion::Scrolling { frame, .. } = &mut self.motion {
            *frame = next_frame;
        }

        // The first frame after a (re)start only records the timestamp
        if let Some(previous) = previous {
            let delta_seconds = at.saturating_sub(previous).as_secs_f64();
            let distance = scroll_distance(self.config.speed, self.config.direction, delta_seconds);
            self.offset = metrics::wrap(self.offset + distance, self.metrics, self.config.direction);
            self.publish();
        }
    }

    fn nudge_frame(&mut self, at: Duration) {
        let sample = match &mut self.motion {
            Motion::Nudging { animation, .. } => animation.sample(at),
            _ => return,
        };

        self.offset = metrics::wrap(sample.offset, self.metrics, self.config.direction);
        self.publish();

        if sample.finished {
            self.motion = Motion::Idle;
            debug!(offset = self.offset, "Nudge finished");
            if self.playing {
                self.start_scroller();
            }
        } else {
            let next_frame = self.scheduler.request_frame();
            if let Motion::Nudging { frame, .. } = &mut self.motion {
                *frame = next_frame;
            }
        }
    }

    fn start_scroller(&mut self) {
        self.cancel_motion();
        self.recompute(true);
        let frame = self.scheduler.request_frame();
        self.motion = Motion::Scrolling {
            frame,
            last_tick: None,
        };
        debug!(offset = self.offset, speed = self.config.speed, "Scroller started");
    }

    fn cancel_motion(&mut self) {
        if let Some(frame) = self.motion.frame() {
            self.scheduler.cancel(frame);
        }
        self.motion = Motion::Idle;
    }

    fn set_playing(&mut self, playing: bool) {
        if self.playing != playing {
            self.playing = playing;
            self.send_event(EngineEvent::Playback { playing });
        }
    }

    fn nudge_duration(&self) -> Duration {
        Duration::from_millis(self.config.nudge_duration_ms)
    }

    fn publish(&self) {
        self.send_event(EngineEvent::Offset(self.offset));
    }

    /// Send an event to the surface (if an event channel is configured)
    fn send_event(&self, event: EngineEvent) {
        if let Some(ref tx) = self.event_tx {
            if tx.send(event).is_err() {
                warn!("Failed to send engine event: receiver dropped");
            }
        }
    }
}
