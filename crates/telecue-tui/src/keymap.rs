use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};
use telecue_core::config::KeymapConfig;
use tracing::warn;

use crate::input::Action;
use crate::scroll::NudgeDirection;

/// Parsed key binding (key code + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn simple(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }
}

/// Runtime keymap for efficient key-to-action lookup
pub struct Keymap {
    bindings: HashMap<KeyBinding, Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeymapConfig::default())
    }
}

impl Keymap {
    /// Create a keymap from configuration
    pub fn from_config(config: &KeymapConfig) -> Self {
        let mut bindings = HashMap::new();

        // Helper to add binding with conflict detection
        let mut add_binding = |key_str: &str, action: Action| {
            if let Some(binding) = parse_key_binding(key_str) {
                if let Some(existing) = bindings.get(&binding) {
                    warn!(
                        "Key conflict: '{}' already bound to {:?}, ignoring binding to {:?}",
                        key_str, existing, action
                    );
                } else {
                    bindings.insert(binding, action);
                }
            } else {
                warn!("Invalid key binding: '{}', ignoring", key_str);
            }
        };

        // Add all configured bindings
        add_binding(&config.quit, Action::Quit);
        add_binding(&config.toggle_play, Action::TogglePlay);
        add_binding(&config.exit_presentation, Action::ExitPresentation);
        add_binding(&config.nudge_up, Action::Nudge(NudgeDirection::Up));
        add_binding(&config.nudge_down, Action::Nudge(NudgeDirection::Down));
        add_binding(&config.speed_up, Action::SpeedUp);
        add_binding(&config.speed_down, Action::SpeedDown);
        add_binding(&config.toggle_direction, Action::ToggleDirection);
        add_binding(&config.reset, Action::Reset);
        add_binding(&config.padding_decrease, Action::PaddingDecrease);
        add_binding(&config.padding_increase, Action::PaddingIncrease);
        add_binding(&config.spacing_decrease, Action::SpacingDecrease);
        add_binding(&config.spacing_increase, Action::SpacingIncrease);
        add_binding(&config.cycle_alignment, Action::CycleAlignment);

        // Add hardcoded bindings that shouldn't be configurable
        // Ctrl+C always quits
        bindings.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        // Enter starts and pauses like Space, '=' is the unshifted '+'
        bindings.entry(KeyBinding::simple(KeyCode::Enter)).or_insert(Action::TogglePlay);
        bindings.entry(KeyBinding::simple(KeyCode::Char('='))).or_insert(Action::SpeedUp);

        Self { bindings }
    }

    /// Get action for a key binding
    pub fn get(&self, binding: &KeyBinding) -> Option<&Action> {
        self.bindings.get(binding)
    }

    /// Resolve a key event, retrying without Shift since terminals report
    /// symbols like '+' either with or without the modifier
    pub fn lookup(&self, binding: &KeyBinding) -> Option<Action> {
        if let Some(action) = self.bindings.get(binding) {
            return Some(*action);
        }
        if binding.modifiers.contains(KeyModifiers::SHIFT) {
            let unshifted = KeyBinding::new(binding.code, binding.modifiers.difference(KeyModifiers::SHIFT));
            return self.bindings.get(&unshifted).copied();
        }
        None
    }
}

/// Parse Vim-style key notation into KeyBinding
/// Supported formats:
/// - Single char: "q", "d", "r", "a", etc.
/// - Uppercase (Shift): "D", "R", etc.
/// - Special chars: "+", "-", "[", "]", etc.
/// - Ctrl: "<C-c>", "<C-r>", etc.
/// - Shift: "<S-Tab>", "<S-Up>", etc.
/// - Special keys: "<CR>", "<Enter>", "<Esc>", "<Tab>", "<Space>", "<Left>", "<Right>", "<Up>", "<Down>"
pub fn parse_key_binding(s: &str) -> Option<KeyBinding> {
    let s = s.trim();

    // Handle special notation <...>
    if s.starts_with('<') && s.ends_with('>') {
        let inner = &s[1..s.len() - 1];
        return parse_special_key(inner);
    }

    // Single character
    if s.len() == 1 {
        let c = s.chars().next()?;
        // Uppercase letters are Shift+lowercase
        if c.is_ascii_uppercase() {
            return Some(KeyBinding::shift(KeyCode::Char(c)));
        }
        return Some(KeyBinding::simple(KeyCode::Char(c)));
    }

    None
}

/// Parse special key notation (content inside <...>)
fn parse_special_key(inner: &str) -> Option<KeyBinding> {
    // Handle modifiers: C- (Ctrl), S- (Shift), A-/M- (Alt)
    if let Some(rest) = inner.strip_prefix("C-") {
        let key = parse_key_name(rest)?;
        return Some(KeyBinding::ctrl(key));
    }

    if let Some(rest) = inner.strip_prefix("S-") {
        let key = parse_key_name(rest)?;
        return Some(KeyBinding::shift(key));
    }

    // Handle special key names without modifiers
    parse_key_name(inner).map(KeyBinding::simple)
}

/// Parse a key name (without modifiers)
fn parse_key_name(name: &str) -> Option<KeyCode> {
    match name.to_lowercase().as_str() {
        "cr" | "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "backtab" => Some(KeyCode::BackTab),
        "space" | "spc" => Some(KeyCode::Char(' ')),
        "bs" | "backspace" => Some(KeyCode::Backspace),
        "del" | "delete" => Some(KeyCode::Delete),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" | "pgup" => Some(KeyCode::PageUp),
        "pagedown" | "pgdn" => Some(KeyCode::PageDown),
        "insert" | "ins" => Some(KeyCode::Insert),
        "f1" => Some(KeyCode::F(1)),
        "f2" => Some(KeyCode::F(2)),
        "f3" => Some(KeyCode::F(3)),
        "f4" => Some(KeyCode::F(4)),
        "f5" => Some(KeyCode::F(5)),
        "f6" => Some(KeyCode::F(6)),
        "f7" => Some(KeyCode::F(7)),
        "f8" => Some(KeyCode::F(8)),
        "f9" => Some(KeyCode::F(9)),
        "f10" => Some(KeyCode::F(10)),
        "f11" => Some(KeyCode::F(11)),
        "f12" => Some(KeyCode::F(12)),
        _ => {
            // Single character after modifier (e.g., "j" in "<C-j>")
            if name.len() == 1 {
                let c = name.chars().next()?;
                Some(KeyCode::Char(c.to_ascii_lowercase()))
            } else {
                None
            }
        }
    }
}
