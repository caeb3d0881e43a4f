//! Held-key tracker that reduces keyboard state to discrete control intent.
//!
//! [`InputState`] records which key names are currently held (normalized,
//! so `W` and `w` are the same key) and answers one question per control
//! axis: does the player want +1, -1 or 0 on it this tick.

use crate::action::{FlightAction, KeyAliasTable, normalize_key};
use serde::Serialize;
use std::collections::HashSet;

/// Discrete player intent for one tick, each axis in `{-1, 0, 1}`.
///
/// Positive pitch raises the nose; positive roll banks to the right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ControlIntent {
    /// Pitch intent.
    pub pitch: i8,
    /// Roll intent.
    pub roll: i8,
}

impl ControlIntent {
    /// No input on either axis.
    pub const NEUTRAL: Self = Self { pitch: 0, roll: 0 };

    /// Build an intent, clamping each axis into `{-1, 0, 1}`.
    #[must_use]
    pub fn new(pitch: i8, roll: i8) -> Self {
        Self {
            pitch: pitch.signum(),
            roll: roll.signum(),
        }
    }

    /// Returns true when neither axis has input.
    #[must_use]
    pub fn is_neutral(self) -> bool {
        self.pitch == 0 && self.roll == 0
    }
}

/// Tracks held keys and resolves them through a [`KeyAliasTable`].
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<String>,
    aliases: KeyAliasTable,
}

impl InputState {
    /// Creates an `InputState` with the default aliases and no keys held.
    #[must_use]
    pub fn new() -> Self {
        Self::with_aliases(KeyAliasTable::default())
    }

    /// Creates an `InputState` that resolves keys through `aliases`.
    #[must_use]
    pub fn with_aliases(aliases: KeyAliasTable) -> Self {
        Self {
            held: HashSet::new(),
            aliases,
        }
    }

    /// The alias table in use.
    #[must_use]
    pub fn aliases(&self) -> &KeyAliasTable {
        &self.aliases
    }

    /// Record a key transition. Names are case-insensitive.
    pub fn set_key(&mut self, key: &str, pressed: bool) {
        let key = normalize_key(key);
        if pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
    }

    /// Returns true while `key` is held.
    #[must_use]
    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(&normalize_key(key))
    }

    /// Release every held key (e.g. when the window loses focus).
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Returns true if any alias of `action` is held.
    #[must_use]
    pub fn action_held(&self, action: FlightAction) -> bool {
        self.aliases
            .aliases(action)
            .iter()
            .any(|alias| self.held.contains(alias))
    }

    /// `+1` for pitch-up, `-1` for pitch-down, `0` for neither or both.
    #[must_use]
    pub fn pitch_intent(&self) -> i8 {
        self.axis(FlightAction::PitchUp, FlightAction::PitchDown)
    }

    /// `+1` for roll-right, `-1` for roll-left, `0` for neither or both.
    #[must_use]
    pub fn roll_intent(&self) -> i8 {
        self.axis(FlightAction::RollRight, FlightAction::RollLeft)
    }

    /// Both axes at once.
    #[must_use]
    pub fn intent(&self) -> ControlIntent {
        ControlIntent {
            pitch: self.pitch_intent(),
            roll: self.roll_intent(),
        }
    }

    fn axis(&self, positive: FlightAction, negative: FlightAction) -> i8 {
        i8::from(self.action_held(positive)) - i8::from(self.action_held(negative))
    }
}
