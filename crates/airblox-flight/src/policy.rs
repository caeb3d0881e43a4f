//! Session-wide flight policies: how angles are constrained and how the
//! autostabilizer responds to attitude.

use crate::error::ProfileError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::str::FromStr;

/// Attitude beyond which autostabilization switches off on an axis.
pub const STABILIZATION_LIMIT: f64 = PI * 0.25;

/// How pitch and roll are applied to the aircraft orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleConstraintMode {
    /// Angles are clamped to the profile's `max_pitch`/`max_roll`.
    Clamped,
    /// Rotations compose about the aircraft's local axes without limits,
    /// so loops and barrel rolls are possible.
    #[default]
    Unclamped,
}

/// Shape of the autostabilization response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilizationCurve {
    /// `velocity -= angle * auto_level`.
    Linear,
    /// Weak near level, strong far from level, scaled up with speed.
    #[default]
    NonLinearSpeedScaled,
}

/// Per-axis shape constants for [`StabilizationCurve::NonLinearSpeedScaled`]:
/// `force = auto_level * (|angle| * gain + bias)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveShape {
    /// Growth of the restoring force with attitude.
    pub gain: f64,
    /// Restoring force at level attitude.
    pub bias: f64,
}

/// Pitch curve shape.
pub const PITCH_CURVE: CurveShape = CurveShape {
    gain: 1.2,
    bias: 0.1,
};

/// Roll curve shape.
pub const ROLL_CURVE: CurveShape = CurveShape {
    gain: 1.5,
    bias: 0.2,
};

impl StabilizationCurve {
    /// Velocity change the stabilizer contributes this tick.
    ///
    /// Always opposes `angle`. Returns exactly zero at level attitude and
    /// whenever `|angle| >= STABILIZATION_LIMIT`.
    #[must_use]
    pub fn correction(self, angle: f64, shape: CurveShape, auto_level: f64, speed: f64) -> f64 {
        let angle_abs = angle.abs();
        if angle_abs >= STABILIZATION_LIMIT {
            return 0.0;
        }
        match self {
            Self::Linear => -angle * auto_level,
            Self::NonLinearSpeedScaled => {
                let speed_factor = speed * 2.0;
                let force = auto_level * (angle_abs * shape.gain + shape.bias);
                -angle * force * speed_factor
            }
        }
    }
}

/// The pair of policies bound to a flight session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlightPolicy {
    /// Angle application mode.
    pub angle_mode: AngleConstraintMode,
    /// Stabilization response.
    pub curve: StabilizationCurve,
}

impl FlightPolicy {
    /// Parse both policies from their config names.
    ///
    /// # Errors
    /// Returns an error naming whichever policy was not recognized.
    pub fn from_names(angle_mode: &str, curve: &str) -> Result<Self, ProfileError> {
        Ok(Self {
            angle_mode: angle_mode.parse()?,
            curve: curve.parse()?,
        })
    }
}

impl FromStr for AngleConstraintMode {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clamped" => Ok(Self::Clamped),
            "unclamped" => Ok(Self::Unclamped),
            _ => Err(ProfileError::UnknownAngleMode(s.to_string())),
        }
    }
}

impl FromStr for StabilizationCurve {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "linear" => Ok(Self::Linear),
            "nonlinear" | "nonlinearspeedscaled" => Ok(Self::NonLinearSpeedScaled),
            _ => Err(ProfileError::UnknownCurve(s.to_string())),
        }
    }
}
