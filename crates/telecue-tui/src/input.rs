use crossterm::event::{KeyEvent, KeyEventKind};

use crate::app::{App, Mode};
use crate::keymap::KeyBinding;
use crate::scroll::NudgeDirection;

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    TogglePlay,          // Space/Enter: enter presentation, then play/pause
    ExitPresentation,    // Esc: back to the script preview
    Nudge(NudgeDirection),
    SpeedUp,
    SpeedDown,
    ToggleDirection,
    Reset,               // Back to the entry position
    PaddingDecrease,
    PaddingIncrease,
    SpacingDecrease,
    SpacingIncrease,
    CycleAlignment,
    None,
}

impl Action {
    /// Direction of a nudge action
    pub fn nudge_direction(self) -> Option<NudgeDirection> {
        match self {
            Action::Nudge(direction) => Some(direction),
            _ => None,
        }
    }
}

/// How a key event relates to a held key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Press,
    /// Auto-repeat while the key stays down
    Repeat,
    Release,
}

impl From<KeyEventKind> for KeyPhase {
    fn from(kind: KeyEventKind) -> Self {
        match kind {
            KeyEventKind::Press => KeyPhase::Press,
            KeyEventKind::Repeat => KeyPhase::Repeat,
            KeyEventKind::Release => KeyPhase::Release,
        }
    }
}

/// Resolved key event: what to do and whether the key went down or up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub action: Action,
    pub phase: KeyPhase,
}

/// Handle a key event and return the corresponding command
pub fn handle_key_event(key: KeyEvent, app: &App) -> Command {
    let phase = KeyPhase::from(key.kind);
    let binding = KeyBinding::new(key.code, key.modifiers);
    let action = app.keymap.lookup(&binding).unwrap_or(Action::None);

    let action = match (&app.mode, action) {
        // Nothing to leave while previewing
        (Mode::Ready, Action::ExitPresentation) => Action::None,
        _ => action,
    };

    Command { action, phase }
}
