//! Logical flight actions and the key alias table that feeds them.
//!
//! Every [`FlightAction`] is bound to several key names so the same physical
//! keys work on more than one keyboard layout. Key names are compared after
//! [`normalize_key`], which makes matching case-insensitive.

use crate::error::InputError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

/// Logical control actions understood by the flight model.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FlightAction {
    /// Raise the nose.
    PitchUp,
    /// Lower the nose.
    PitchDown,
    /// Bank to the left.
    RollLeft,
    /// Bank to the right.
    RollRight,
}

impl FlightAction {
    /// All actions, in a stable order.
    pub const ALL: [FlightAction; 4] = [
        FlightAction::PitchUp,
        FlightAction::PitchDown,
        FlightAction::RollLeft,
        FlightAction::RollRight,
    ];

    /// Kebab-case name used in config files and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PitchUp => "pitch-up",
            Self::PitchDown => "pitch-down",
            Self::RollLeft => "roll-left",
            Self::RollRight => "roll-right",
        }
    }
}

impl FromStr for FlightAction {
    type Err = InputError;

    /// Accepts both `pitch-up` and `PitchUp` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "pitchup" => Ok(Self::PitchUp),
            "pitchdown" => Ok(Self::PitchDown),
            "rollleft" => Ok(Self::RollLeft),
            "rollright" => Ok(Self::RollRight),
            _ => Err(InputError::UnknownAction(s.to_string())),
        }
    }
}

/// Normalize a key name for case-insensitive comparison.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// An alias shared by more than one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// The duplicated (normalized) key name.
    pub key: String,
    /// Actions that share this key.
    pub actions: Vec<FlightAction>,
}

/// Maps each [`FlightAction`] to the key names that trigger it.
///
/// Multiple aliases per action use OR logic. Serializable to RON so players
/// can edit their layout by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyAliasTable {
    /// The alias table, keys stored normalized.
    pub bindings: HashMap<FlightAction, Vec<String>>,
}

impl Default for KeyAliasTable {
    /// QWERTY letters, the Russian layout letters on the same physical keys,
    /// and the arrow keys.
    fn default() -> Self {
        let mut table = Self::new();
        table.set_aliases(FlightAction::PitchUp, ["w", "ц", "ArrowUp"]);
        table.set_aliases(FlightAction::PitchDown, ["s", "ы", "ArrowDown"]);
        table.set_aliases(FlightAction::RollLeft, ["a", "ф", "ArrowLeft"]);
        table.set_aliases(FlightAction::RollRight, ["d", "в", "ArrowRight"]);
        table
    }
}

impl KeyAliasTable {
    /// Create an empty table with no aliases.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Replace all aliases for `action`.
    pub fn set_aliases<I, S>(&mut self, action: FlightAction, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = keys.into_iter().map(|k| normalize_key(k.as_ref())).collect();
        self.bindings.insert(action, keys);
    }

    /// Aliases bound to `action`, or an empty slice.
    #[must_use]
    pub fn aliases(&self, action: FlightAction) -> &[String] {
        self.bindings
            .get(&action)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns true if `key` is an alias of `action`.
    #[must_use]
    pub fn matches(&self, action: FlightAction, key: &str) -> bool {
        let key = normalize_key(key);
        self.aliases(action).iter().any(|alias| *alias == key)
    }

    /// Apply per-action overrides from configuration.
    ///
    /// Action names may be written `pitch-up` or `PitchUp`.
    ///
    /// # Errors
    /// Returns [`InputError::UnknownAction`] for an unrecognized action name;
    /// the table is left unchanged in that case.
    pub fn apply_overrides(
        &mut self,
        overrides: &HashMap<String, Vec<String>>,
    ) -> Result<(), InputError> {
        let parsed = overrides
            .iter()
            .map(|(name, keys)| name.parse::<FlightAction>().map(|action| (action, keys)))
            .collect::<Result<Vec<_>, InputError>>()?;
        for (action, keys) in parsed {
            self.set_aliases(action, keys);
        }
        Ok(())
    }

    /// Detect keys bound to more than one action.
    #[must_use]
    pub fn detect_conflicts(&self) -> Vec<Conflict> {
        let mut seen: HashMap<&str, Vec<FlightAction>> = HashMap::new();
        for (action, keys) in &self.bindings {
            for key in keys {
                seen.entry(key.as_str()).or_default().push(*action);
            }
        }

        let mut conflicts: Vec<Conflict> = seen
            .into_iter()
            .filter(|(_, actions)| actions.len() > 1)
            .map(|(key, mut actions)| {
                actions.sort();
                Conflict {
                    key: key.to_string(),
                    actions,
                }
            })
            .collect();
        conflicts.sort_by(|a, b| a.key.cmp(&b.key));
        conflicts
    }

    /// Serialize to a pretty RON string.
    ///
    /// # Errors
    /// Returns an error if RON serialization fails.
    pub fn to_ron(&self) -> Result<String, InputError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Parse a table from a RON string.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid alias table.
    pub fn from_ron(s: &str) -> Result<Self, InputError> {
        let mut table: Self = ron::from_str(s)?;
        for keys in table.bindings.values_mut() {
            for key in keys.iter_mut() {
                *key = normalize_key(key);
            }
        }
        Ok(table)
    }

    /// Save the table to a RON file at `path`.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn save(&self, path: &Path) -> Result<(), InputError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Load a table from a RON file at `path`.
    ///
    /// Falls back to [`KeyAliasTable::default`] if the file is missing or
    /// malformed, logging a warning in either case.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_ron(&contents) {
                Ok(table) => table,
                Err(e) => {
                    warn!(
                        "Malformed alias file {}: {e}; using defaults",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(e) => {
                warn!(
                    "Could not read alias file {}: {e}; using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Returns the platform config path for `keys.ron`.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("airblox").join("keys.ron"))
    }
}
