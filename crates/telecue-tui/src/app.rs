use std::time::Duration;

use crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use tokio::sync::mpsc;
use tracing::{debug, info};

use telecue_core::{AppConfig, Script};

use crate::input::{handle_key_event, Action, Command, KeyPhase};
use crate::keymap::Keymap;
use crate::layout::TextLayout;
use crate::scroll::{EngineEvent, NudgeDirection, ScrollEngine, TimerQueue};
use crate::theme::Theme;

/// Columns added or removed per padding key press
const PADDING_STEP: u16 = 2;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Script preview, the engine is inactive
    Ready,
    /// Prompter surface is live
    Presenting,
}

/// Message shown in the status bar until `expires_at`
#[derive(Debug, Clone)]
pub struct StatusFlash {
    pub message: String,
    pub expires_at: Duration,
}

/// Application state
pub struct App {
    /// Configuration the session started with
    pub config: AppConfig,
    pub script: Script,
    pub engine: ScrollEngine<TextLayout>,
    pub keymap: Keymap,
    pub theme: Theme,
    pub mode: Mode,
    /// Whether the app should quit
    pub should_quit: bool,
    pub status: Option<StatusFlash>,
    /// Whether the terminal reports key releases and repeats
    pub release_events: bool,
    /// Session time of the latest event
    now: Duration,
    events: mpsc::UnboundedReceiver<EngineEvent>,
    needs_redraw: bool,
}

impl App {
    pub fn new(config: AppConfig, script: Script) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let display = config.display.sanitized();
        let layout = TextLayout::new(script.text(), display.clone());
        let engine =
            ScrollEngine::new(config.scroll.clone(), layout, TimerQueue::new()).with_event_sender(tx);

        Self {
            keymap: Keymap::from_config(&config.keymap),
            theme: Theme::from_display(&display),
            config,
            script,
            engine,
            mode: Mode::Ready,
            should_quit: false,
            status: None,
            release_events: false,
            now: Duration::ZERO,
            events,
            needs_redraw: true,
        }
    }

    /// Split the terminal into prompter area and status bar
    pub fn split(area: Rect) -> (Rect, Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);
        (chunks[0], chunks[1])
    }

    /// Terminal was resized (also called once at startup)
    pub fn resize(&mut self, width: u16, height: u16) {
        let (prompter, _) = Self::split(Rect::new(0, 0, width, height));
        debug!(width = prompter.width, height = prompter.height, "Prompter resized");
        self.engine
            .layout_mut()
            .set_viewport(prompter.width, prompter.height);
        self.engine.on_resize();
        self.needs_redraw = true;
    }

    /// Advance to session time `now`: run due frames and timers, collect
    /// engine output and expire status messages
    pub fn tick(&mut self, now: Duration) {
        self.now = now;
        self.engine.pump(now);
        self.drain_engine_events();

        if self
            .status
            .as_ref()
            .is_some_and(|status| status.expires_at <= now)
        {
            self.status = None;
            self.needs_redraw = true;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Duration) {
        // Keep the scheduler clock current before arming any timer
        self.tick(now);
        let command = handle_key_event(key, self);
        self.apply(command);
        self.drain_engine_events();
        self.needs_redraw = true;
    }

    pub fn apply(&mut self, command: Command) {
        let nudge = command.action.nudge_direction();

        if command.phase == KeyPhase::Release {
            if nudge.is_some() {
                self.engine.end_nudge();
            }
            return;
        }

        match nudge {
            Some(direction) => self.nudge(direction, command.phase == KeyPhase::Repeat),
            None => {
                self.engine.cancel_hold();
                self.handle_action(command.action);
            }
        }
    }

    fn nudge(&mut self, direction: NudgeDirection, is_repeat: bool) {
        self.engine.begin_nudge(direction, is_repeat);
        if !self.release_events {
            // Each OS key repeat arrives as a fresh press
            self.engine.end_nudge();
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::TogglePlay => match self.mode {
                Mode::Ready => self.enter_presentation(),
                Mode::Presenting => self.engine.toggle_play(),
            },
            Action::ExitPresentation => self.exit_presentation(),
            Action::Nudge(direction) => self.nudge(direction, false),
            Action::SpeedUp => {
                let speed = self.engine.adjust_speed(self.engine.config().speed_step);
                self.flash(format!("Speed {:.1}x", speed));
            }
            Action::SpeedDown => {
                let speed = self.engine.adjust_speed(-self.engine.config().speed_step);
                self.flash(format!("Speed {:.1}x", speed));
            }
            Action::ToggleDirection => {
                let direction = self.engine.toggle_direction();
                self.flash(format!("Direction: {}", direction.label()));
            }
            Action::Reset => {
                if self.mode == Mode::Presenting {
                    self.engine.reset();
                    self.flash("Back to start");
                }
            }
            Action::PaddingDecrease | Action::PaddingIncrease => {
                let current = self.engine.layout().display().frame_padding;
                let padding = if action == Action::PaddingIncrease {
                    current.saturating_add(PADDING_STEP)
                } else {
                    current.saturating_sub(PADDING_STEP)
                };
                let mut applied = current;
                self.engine
                    .update_layout(|layout| applied = layout.set_frame_padding(padding));
                self.flash(format!("Padding {}", applied));
            }
            Action::SpacingDecrease | Action::SpacingIncrease => {
                let current = self.engine.layout().display().line_spacing;
                let spacing = if action == Action::SpacingIncrease {
                    current.saturating_add(1)
                } else {
                    current.saturating_sub(1)
                };
                let mut applied = current;
                self.engine
                    .update_layout(|layout| applied = layout.set_line_spacing(spacing));
                self.flash(format!("Line spacing {}", applied));
            }
            Action::CycleAlignment => {
                let alignment = self.engine.layout().display().alignment.next();
                self.engine
                    .update_layout(|layout| layout.set_alignment(alignment));
                self.flash(format!("Align {}", alignment.label()));
            }
            Action::None => {}
        }
    }

    pub fn enter_presentation(&mut self) {
        if self.script.is_blank() {
            self.flash("Script is empty");
            return;
        }
        self.mode = Mode::Presenting;
        self.engine.enter_presentation();
        self.engine.start();
        info!(script = %self.script.title(), "Presenting");
    }

    pub fn exit_presentation(&mut self) {
        if self.mode != Mode::Presenting {
            return;
        }
        self.engine.exit_presentation();
        self.mode = Mode::Ready;
    }

    /// The terminal lost focus; a held key will never report its release
    pub fn on_focus_lost(&mut self) {
        self.engine.cancel_hold();
    }

    /// Show a message in the status bar for the configured duration
    pub fn flash(&mut self, message: impl Into<String>) {
        let duration = Duration::from_millis(self.config.ui.status_duration_ms);
        self.status = Some(StatusFlash {
            message: message.into(),
            expires_at: self.now + duration,
        });
        self.needs_redraw = true;
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.message.as_str())
    }

    /// Cycle progress as a whole percentage, while presenting
    pub fn progress_percent(&self) -> Option<u8> {
        if self.mode != Mode::Presenting {
            return None;
        }
        self.engine
            .progress()
            .map(|progress| (progress * 100.0).round() as u8)
    }

    /// Returns true once per change that needs a new frame drawn
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    /// Configuration with the settings adjusted during the session
    pub fn settings(&self) -> AppConfig {
        let mut config = self.config.clone();
        config.scroll.speed = self.engine.speed();
        config.scroll.direction = self.engine.direction();
        config.display = self.engine.layout().display().clone();
        config
    }

    fn drain_engine_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                EngineEvent::Offset(_) => self.needs_redraw = true,
                EngineEvent::Nudged { delta } => {
                    let direction = if delta < 0.0 { "up" } else { "down" };
                    self.flash(format!("Nudged {}", direction));
                }
                EngineEvent::Playback { playing } => {
                    if self.engine.is_active() {
                        self.flash(if playing { "Playing" } else { "Paused" });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};

    use crate::scroll::{Activity, HoldPhase, Scheduler};

    pub(crate) fn test_app(text: &str) -> App {
        let mut app = App::new(AppConfig::default(), Script::new(text));
        app.resize(80, 25);
        app
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn press(app: &mut App, code: KeyCode, now: Duration) {
        let key = KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press);
        app.handle_key(key, now);
    }

    fn release(app: &mut App, code: KeyCode, now: Duration) {
        let key = KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release);
        app.handle_key(key, now);
    }

    #[test]
    fn test_blank_script_is_refused() {
        let mut app = test_app("  \n ");
        press(&mut app, KeyCode::Char(' '), ms(0));
        assert_eq!(app.mode, Mode::Ready);
        assert_eq!(app.status_message(), Some("Script is empty"));
        assert!(!app.engine.is_active());
    }

    #[test]
    fn test_space_enters_then_pauses() {
        let mut app = test_app("hello\nworld");
        press(&mut app, KeyCode::Char(' '), ms(0));
        assert_eq!(app.mode, Mode::Presenting);
        assert!(app.engine.is_playing());
        assert_eq!(app.engine.activity(), Activity::Scrolling);

        press(&mut app, KeyCode::Char(' '), ms(100));
        assert!(!app.engine.is_playing());
        assert_eq!(app.status_message(), Some("Paused"));
    }

    #[test]
    fn test_escape_leaves_presentation() {
        let mut app = test_app("hello");
        press(&mut app, KeyCode::Enter, ms(0));
        press(&mut app, KeyCode::Esc, ms(50));
        assert_eq!(app.mode, Mode::Ready);
        assert!(!app.engine.is_active());
        assert_eq!(app.engine.offset(), 0.0);
        assert!(app.engine.scheduler().is_idle());
    }

    #[test]
    fn test_hold_with_release_events() {
        let mut app = test_app("hello");
        app.release_events = true;
        press(&mut app, KeyCode::Enter, ms(0));

        press(&mut app, KeyCode::Up, ms(10));
        assert_eq!(app.engine.hold_phase(), HoldPhase::Pending);
        assert_eq!(app.engine.activity(), Activity::Nudging);
        app.tick(ms(400));
        assert_eq!(app.engine.hold_phase(), HoldPhase::Repeating);

        release(&mut app, KeyCode::Up, ms(420));
        assert_eq!(app.engine.hold_phase(), HoldPhase::Idle);
    }

    #[test]
    fn test_press_without_release_events_is_single_nudge() {
        let mut app = test_app("hello");
        press(&mut app, KeyCode::Enter, ms(0));
        press(&mut app, KeyCode::Down, ms(10));
        assert_eq!(app.engine.hold_phase(), HoldPhase::Idle);
        assert_eq!(app.engine.activity(), Activity::Nudging);
        assert_eq!(app.status_message(), Some("Nudged down"));
    }

    #[test]
    fn test_other_key_cancels_hold() {
        let mut app = test_app("hello");
        app.release_events = true;
        press(&mut app, KeyCode::Enter, ms(0));
        press(&mut app, KeyCode::Up, ms(10));
        press(&mut app, KeyCode::Char('+'), ms(20));
        assert_eq!(app.engine.hold_phase(), HoldPhase::Idle);
        assert_eq!(app.engine.speed(), 1.1);
        assert_eq!(app.status_message(), Some("Speed 1.1x"));
    }

    #[test]
    fn test_focus_loss_cancels_hold() {
        let mut app = test_app("hello");
        app.release_events = true;
        press(&mut app, KeyCode::Enter, ms(0));
        press(&mut app, KeyCode::Up, ms(10));
        app.on_focus_lost();
        assert_eq!(app.engine.hold_phase(), HoldPhase::Idle);
    }

    #[test]
    fn test_layout_keys_update_settings() {
        let mut app = test_app("hello");
        press(&mut app, KeyCode::Right, ms(0));
        press(&mut app, KeyCode::Char(']'), ms(0));
        press(&mut app, KeyCode::Char('a'), ms(0));
        press(&mut app, KeyCode::Char('d'), ms(0));
        press(&mut app, KeyCode::Char('-'), ms(0));

        let settings = app.settings();
        assert_eq!(settings.display.frame_padding, 6);
        assert_eq!(settings.display.line_spacing, 2);
        assert_eq!(settings.display.alignment, telecue_core::Alignment::Right);
        assert_eq!(settings.scroll.direction, telecue_core::ScrollDirection::Reverse);
        assert_eq!(settings.scroll.speed, 0.9);
    }

    #[test]
    fn test_padding_change_keeps_progress() {
        let mut app = test_app(&"word ".repeat(400));
        press(&mut app, KeyCode::Enter, ms(0));
        app.tick(ms(16));
        app.tick(ms(10_000));
        let before = app.engine.progress().unwrap();

        press(&mut app, KeyCode::Right, ms(10_000));
        let after = app.engine.progress().unwrap();
        assert!((before - after).abs() < 1e-9);
        assert!(app.engine.is_playing());
    }

    #[test]
    fn test_status_flash_expires() {
        let mut app = test_app("hello");
        press(&mut app, KeyCode::Char('d'), ms(0));
        assert!(app.status_message().is_some());
        app.tick(ms(1000));
        assert!(app.status_message().is_some());
        app.tick(ms(1600));
        assert!(app.status_message().is_none());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = test_app("hello");
        press(&mut app, KeyCode::Char('q'), ms(0));
        assert!(app.should_quit);

        let mut app = test_app("hello");
        let key = KeyEvent::new_with_kind(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
            KeyEventKind::Press,
        );
        app.handle_key(key, ms(0));
        assert!(app.should_quit);
    }

    #[test]
    fn test_progress_only_while_presenting() {
        let mut app = test_app("hello");
        assert_eq!(app.progress_percent(), None);
        press(&mut app, KeyCode::Enter, ms(0));
        assert_eq!(app.progress_percent(), Some(0));
    }
}
