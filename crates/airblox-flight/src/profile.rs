//! Aircraft profiles: the tunable constants that give each aircraft its feel.
//!
//! Angular quantities are per tick, not per second: the flight model runs one
//! fixed step per frame and the constants were tuned against that step.

use crate::error::ProfileError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Physical constants for one aircraft.
///
/// Preconditions, checked by [`validate`](Self::validate):
/// `0 < damping < 1`, `accel >= 0`, `auto_level >= 0`, `speed >= 0`,
/// `max_* > 0`, all finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AircraftProfile {
    /// Forward distance travelled per tick.
    pub speed: f64,
    /// Pitch velocity gained per tick of held input (rad/tick²).
    pub pitch_accel: f64,
    /// Roll velocity gained per tick of held input (rad/tick²).
    pub roll_accel: f64,
    /// Per-tick multiplier on pitch velocity.
    pub pitch_damping: f64,
    /// Per-tick multiplier on roll velocity.
    pub roll_damping: f64,
    /// Autostabilization gain.
    pub auto_level: f64,
    /// Pitch limit in radians (clamped angle mode only).
    pub max_pitch: f64,
    /// Roll limit in radians (clamped angle mode only).
    pub max_roll: f64,
}

/// Most maneuverable preset.
pub const LIGHT_FIGHTER: AircraftProfile = AircraftProfile {
    speed: 0.42,
    pitch_accel: 0.0012,
    roll_accel: 0.0025,
    pitch_damping: 0.92,
    roll_damping: 0.90,
    auto_level: 0.015,
    max_pitch: 0.9,
    max_roll: 1.4,
};

/// Slow, heavily damped preset.
pub const HEAVY_ATTACKER: AircraftProfile = AircraftProfile {
    speed: 0.32,
    pitch_accel: 0.0018,
    roll_accel: 0.0022,
    pitch_damping: 0.96,
    roll_damping: 0.95,
    auto_level: 0.010,
    max_pitch: 0.6,
    max_roll: 0.9,
};

/// General-purpose preset; the default.
pub const BALANCED: AircraftProfile = AircraftProfile {
    speed: 0.36,
    pitch_accel: 0.0025,
    roll_accel: 0.0030,
    pitch_damping: 0.94,
    roll_damping: 0.93,
    auto_level: 0.012,
    max_pitch: 0.75,
    max_roll: 1.1,
};

/// Fast reconnaissance preset.
pub const SCOUT: AircraftProfile = AircraftProfile {
    speed: 0.50,
    pitch_accel: 0.0020,
    roll_accel: 0.0035,
    pitch_damping: 0.93,
    roll_damping: 0.92,
    auto_level: 0.014,
    max_pitch: 0.7,
    max_roll: 1.3,
};

/// Very stable training preset.
pub const TRAINER: AircraftProfile = AircraftProfile {
    speed: 0.28,
    pitch_accel: 0.0015,
    roll_accel: 0.0020,
    pitch_damping: 0.97,
    roll_damping: 0.96,
    auto_level: 0.020,
    max_pitch: 0.5,
    max_roll: 0.8,
};

impl Default for AircraftProfile {
    fn default() -> Self {
        BALANCED
    }
}

impl AircraftProfile {
    /// Check every precondition.
    ///
    /// # Errors
    /// Returns the first violated precondition.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let checks: [(&'static str, f64, fn(f64) -> bool, &'static str); 8] = [
            ("speed", self.speed, |v| v >= 0.0, "must be >= 0"),
            ("pitch_accel", self.pitch_accel, |v| v >= 0.0, "must be >= 0"),
            ("roll_accel", self.roll_accel, |v| v >= 0.0, "must be >= 0"),
            ("pitch_damping", self.pitch_damping, |v| v > 0.0 && v < 1.0, "must be in (0, 1)"),
            ("roll_damping", self.roll_damping, |v| v > 0.0 && v < 1.0, "must be in (0, 1)"),
            ("auto_level", self.auto_level, |v| v >= 0.0, "must be >= 0"),
            ("max_pitch", self.max_pitch, |v| v > 0.0, "must be > 0"),
            ("max_roll", self.max_roll, |v| v > 0.0, "must be > 0"),
        ];
        for (field, value, ok, reason) in checks {
            if !value.is_finite() || !ok(value) {
                return Err(ProfileError::InvalidConstant {
                    field,
                    value,
                    reason,
                });
            }
        }
        Ok(())
    }
}

/// The named presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AircraftKind {
    /// See [`LIGHT_FIGHTER`].
    LightFighter,
    /// See [`HEAVY_ATTACKER`].
    HeavyAttacker,
    /// See [`BALANCED`].
    #[default]
    Balanced,
    /// See [`SCOUT`].
    Scout,
    /// See [`TRAINER`].
    Trainer,
}

impl AircraftKind {
    /// Every preset, in table order.
    pub const ALL: [AircraftKind; 5] = [
        AircraftKind::LightFighter,
        AircraftKind::HeavyAttacker,
        AircraftKind::Balanced,
        AircraftKind::Scout,
        AircraftKind::Trainer,
    ];

    /// The preset's constants.
    #[must_use]
    pub fn profile(self) -> AircraftProfile {
        match self {
            Self::LightFighter => LIGHT_FIGHTER,
            Self::HeavyAttacker => HEAVY_ATTACKER,
            Self::Balanced => BALANCED,
            Self::Scout => SCOUT,
            Self::Trainer => TRAINER,
        }
    }

    /// Kebab-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LightFighter => "light-fighter",
            Self::HeavyAttacker => "heavy-attacker",
            Self::Balanced => "balanced",
            Self::Scout => "scout",
            Self::Trainer => "trainer",
        }
    }
}

impl FromStr for AircraftKind {
    type Err = ProfileError;

    /// Accepts `light-fighter`, `light_fighter` and `LightFighter`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().replace('-', "") == folded)
            .ok_or_else(|| ProfileError::UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_presets_valid() {
        for kind in AircraftKind::ALL {
            assert_eq!(kind.profile().validate(), Ok(()), "{kind:?}");
        }
    }

    #[test]
    fn test_default_is_balanced() {
        assert_eq!(AircraftProfile::default(), BALANCED);
        assert_eq!(AircraftKind::default().profile(), BALANCED);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("light-fighter".parse::<AircraftKind>().unwrap(), AircraftKind::LightFighter);
        assert_eq!("HeavyAttacker".parse::<AircraftKind>().unwrap(), AircraftKind::HeavyAttacker);
        assert_eq!("scout".parse::<AircraftKind>().unwrap(), AircraftKind::Scout);
        assert_eq!(
            "zeppelin".parse::<AircraftKind>(),
            Err(ProfileError::UnknownPreset("zeppelin".to_string()))
        );
    }

    #[test]
    fn test_damping_of_one_rejected() {
        let profile = AircraftProfile {
            pitch_damping: 1.0,
            ..BALANCED
        };
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::InvalidConstant {
                field: "pitch_damping",
                ..
            })
        ));
    }

    #[test]
    fn test_negative_auto_level_rejected() {
        let profile = AircraftProfile {
            auto_level: -0.01,
            ..BALANCED
        };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_nan_rejected() {
        let profile = AircraftProfile {
            speed: f64::NAN,
            ..BALANCED
        };
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::InvalidConstant { field: "speed", .. })
        ));
    }

    #[test]
    fn test_trainer_more_stable_than_fighter() {
        assert!(TRAINER.auto_level > LIGHT_FIGHTER.auto_level);
        assert!(TRAINER.pitch_damping > LIGHT_FIGHTER.pitch_damping);
        assert!(TRAINER.max_roll < LIGHT_FIGHTER.max_roll);
    }
}
