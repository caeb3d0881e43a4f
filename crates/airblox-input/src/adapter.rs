//! Boundary adapter from winit keyboard events to [`InputState`].
//!
//! Logical keys are used (not scan codes) because the alias table lists the
//! characters each layout produces; `Key::Named` keys map to their variant
//! name, e.g. `ArrowUp`.

use crate::state::InputState;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::Key;

/// Minimal description of a key event for processing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawKeyEvent {
    /// The logical key involved.
    pub key: Key,
    /// Whether the key was pressed or released.
    pub state: ElementState,
    /// Whether this is a repeat event.
    pub repeat: bool,
}

/// Name of a logical key as used by the alias table, if it has one.
#[must_use]
pub fn key_name(key: &Key) -> Option<String> {
    match key {
        Key::Character(text) => Some(text.to_string()),
        Key::Named(named) => Some(format!("{named:?}")),
        Key::Unidentified(_) | Key::Dead(_) => None,
    }
}

impl InputState {
    /// Processes a winit [`KeyEvent`].
    pub fn process_event(&mut self, event: &KeyEvent) {
        self.process_raw(&RawKeyEvent {
            key: event.logical_key.clone(),
            state: event.state,
            repeat: event.repeat,
        });
    }

    /// Processes a [`RawKeyEvent`] (platform-independent, test-friendly).
    ///
    /// Repeat events are ignored; keys without a name are dropped.
    pub fn process_raw(&mut self, event: &RawKeyEvent) {
        if event.repeat {
            return;
        }
        let Some(name) = key_name(&event.key) else {
            return;
        };
        self.set_key(&name, event.state == ElementState::Pressed);
    }
}
