//! Log categories, category filter maps, and named presets.

use crate::error::DebugError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Tag attached to every recorder entry.
#[derive(
    Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    /// Changes in player intent.
    Input,
    /// Per-axis control state transitions.
    State,
    /// Autostabilization disable/idle events.
    Stabilization,
    /// High rotation speed and inverted flight flags.
    Anomaly,
    /// An angle passed through level attitude.
    ZeroCross,
    /// Altitude-above-ground changes.
    Altitude,
    /// Chase camera framing.
    Camera,
    /// Periodic full-state snapshots.
    Snapshot,
    /// Session start/stop and policy selection.
    Session,
}

impl LogCategory {
    /// Every category, in a stable order.
    pub const ALL: [LogCategory; 9] = [
        LogCategory::Input,
        LogCategory::State,
        LogCategory::Stabilization,
        LogCategory::Anomaly,
        LogCategory::ZeroCross,
        LogCategory::Altitude,
        LogCategory::Camera,
        LogCategory::Snapshot,
        LogCategory::Session,
    ];

    /// Snake-case name, matching the serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::State => "state",
            Self::Stabilization => "stabilization",
            Self::Anomaly => "anomaly",
            Self::ZeroCross => "zero_cross",
            Self::Altitude => "altitude",
            Self::Camera => "camera",
            Self::Snapshot => "snapshot",
            Self::Session => "session",
        }
    }
}

impl FromStr for LogCategory {
    type Err = DebugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DebugError::UnknownCategory(s.to_string()))
    }
}

/// Category → enabled map. Categories missing from the map are disabled.
pub type CategoryFilters = BTreeMap<LogCategory, bool>;

/// Named filter configurations that replace the whole filter map at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogPreset {
    /// Altitude and periodic snapshots only.
    Minimal,
    /// Input, control state, stabilization and zero-cross events.
    Control,
    /// Anomalies, stabilization and snapshots.
    Diagnostics,
    /// Everything.
    Full,
}

impl LogPreset {
    /// Name used in config files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Control => "control",
            Self::Diagnostics => "diagnostics",
            Self::Full => "full",
        }
    }

    /// The complete filter map for this preset.
    #[must_use]
    pub fn filters(self) -> CategoryFilters {
        LogCategory::ALL
            .into_iter()
            .map(|category| (category, self.enables(category)))
            .collect()
    }

    fn enables(self, category: LogCategory) -> bool {
        use LogCategory::*;
        match self {
            Self::Minimal => matches!(category, Altitude | Snapshot),
            Self::Control => matches!(category, Input | State | Stabilization | ZeroCross),
            Self::Diagnostics => matches!(category, Anomaly | Stabilization | Snapshot),
            Self::Full => true,
        }
    }
}

impl FromStr for LogPreset {
    type Err = DebugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "control" => Ok(Self::Control),
            "diagnostics" => Ok(Self::Diagnostics),
            "full" => Ok(Self::Full),
            _ => Err(DebugError::UnknownPreset(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_enables_everything() {
        let filters = LogPreset::Full.filters();
        assert_eq!(filters.len(), LogCategory::ALL.len());
        assert!(filters.values().all(|enabled| *enabled));
    }

    #[test]
    fn test_minimal_keeps_altitude_and_snapshots() {
        let filters = LogPreset::Minimal.filters();
        let enabled: Vec<_> = filters
            .iter()
            .filter(|(_, on)| **on)
            .map(|(c, _)| *c)
            .collect();
        assert_eq!(enabled, vec![LogCategory::Altitude, LogCategory::Snapshot]);
    }

    #[test]
    fn test_preset_names_roundtrip() {
        for preset in [
            LogPreset::Minimal,
            LogPreset::Control,
            LogPreset::Diagnostics,
            LogPreset::Full,
        ] {
            assert_eq!(preset.as_str().parse::<LogPreset>().unwrap(), preset);
        }
        assert!(matches!(
            "verbose".parse::<LogPreset>(),
            Err(DebugError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("zero_cross".parse::<LogCategory>().unwrap(), LogCategory::ZeroCross);
        assert!("zerocross".parse::<LogCategory>().is_err());
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&LogCategory::ZeroCross).unwrap();
        assert_eq!(json, "\"zero_cross\"");
    }
}
