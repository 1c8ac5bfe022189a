use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent};

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Poll for the next event, waiting at most one tick
    ///
    /// Key presses, repeats and releases are all forwarded; releases only
    /// arrive when the terminal reports event types.
    pub fn next(&self) -> Result<Option<AppEvent>> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                Event::Key(key) => Ok(Some(AppEvent::Key(key))),
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                Event::FocusLost => Ok(Some(AppEvent::FocusLost)),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed, repeated or released
    Key(KeyEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// Terminal window lost focus
    FocusLost,
    /// Tick event for frame updates
    Tick,
}
