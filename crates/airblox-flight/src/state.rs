//! Aircraft pose and per-axis flight state.

use glam::{DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};

/// Local forward axis of the aircraft.
pub const FORWARD: DVec3 = DVec3::Z;
/// Local right-wing axis; positive rotation about it raises the nose.
pub const PITCH_AXIS: DVec3 = DVec3::NEG_X;
/// Local longitudinal axis; positive rotation about it banks right.
pub const ROLL_AXIS: DVec3 = DVec3::Z;

/// Height at which a session starts, just above the ocean.
pub const START_HEIGHT: f64 = 2.0;

/// World-space transform of an aircraft or camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: DVec3,
    pub orientation: DQuat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: DVec3::new(0.0, START_HEIGHT, 0.0),
            orientation: DQuat::IDENTITY,
        }
    }
}

impl Pose {
    #[must_use]
    pub fn new(position: DVec3, orientation: DQuat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Default start position with the given pitch and roll (radians).
    #[must_use]
    pub fn with_attitude(pitch: f64, roll: f64) -> Self {
        Self::with_heading(pitch, 0.0, roll)
    }

    /// Default start position with a full attitude; `yaw` turns the
    /// heading about world up.
    #[must_use]
    pub fn with_heading(pitch: f64, yaw: f64, roll: f64) -> Self {
        Self {
            orientation: attitude_quat(pitch, yaw, roll),
            ..Self::default()
        }
    }

    /// Unit vector the nose points along.
    #[must_use]
    pub fn forward(&self) -> DVec3 {
        self.orientation * FORWARD
    }

    /// `(pitch, yaw, roll)` in radians, using the aircraft sign conventions.
    #[must_use]
    pub fn attitude(&self) -> (f64, f64, f64) {
        attitude_of(self.orientation)
    }
}

/// Decompose a rotation into `(pitch, yaw, roll)`.
///
/// Yaw is taken about world up first, so pitch and roll are measured
/// against the horizon whatever the heading. Positive pitch is nose up,
/// positive roll is right wing down. Pitch is in `[-π/2, π/2]`; roll and
/// yaw are in `(-π, π]`.
#[must_use]
pub fn attitude_of(rotation: DQuat) -> (f64, f64, f64) {
    let (yaw, x, roll) = rotation.to_euler(EulerRot::YXZ);
    (-x, yaw, roll)
}

/// Inverse of [`attitude_of`] for pitch inside `[-π/2, π/2]`.
#[must_use]
pub fn attitude_quat(pitch: f64, yaw: f64, roll: f64) -> DQuat {
    DQuat::from_euler(EulerRot::YXZ, yaw, -pitch, roll)
}

/// Mutable flight state owned by the flight model.
///
/// Angles are not stored: they are always derived from the orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightState {
    pub pose: Pose,
    /// rad/tick.
    pub pitch_velocity: f64,
    /// rad/tick.
    pub roll_velocity: f64,
}

impl FlightState {
    #[must_use]
    pub fn new(pose: Pose) -> Self {
        Self {
            pose,
            ..Self::default()
        }
    }

    /// `(pitch, roll)` derived from the orientation.
    #[must_use]
    pub fn angles(&self) -> (f64, f64) {
        let (pitch, _, roll) = self.pose.attitude();
        (pitch, roll)
    }

    #[must_use]
    pub fn pitch_angle(&self) -> f64 {
        self.angles().0
    }

    #[must_use]
    pub fn roll_angle(&self) -> f64 {
        self.angles().1
    }

    #[must_use]
    pub fn position(&self) -> DVec3 {
        self.pose.position
    }

    #[must_use]
    pub fn forward(&self) -> DVec3 {
        self.pose.forward()
    }

    /// Angular velocity on `axis`.
    #[must_use]
    pub fn velocity(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Pitch => self.pitch_velocity,
            Axis::Roll => self.roll_velocity,
        }
    }

    pub(crate) fn velocity_mut(&mut self, axis: Axis) -> &mut f64 {
        match axis {
            Axis::Pitch => &mut self.pitch_velocity,
            Axis::Roll => &mut self.roll_velocity,
        }
    }
}

/// A controlled rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Pitch,
    Roll,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::Pitch, Axis::Roll];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pitch => "pitch",
            Self::Roll => "roll",
        }
    }
}

/// Who is driving an axis this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisState {
    /// Intent is non-zero.
    PlayerControlled,
    /// No intent and the angle is inside the stabilization limit.
    #[default]
    Stabilizing,
    /// No intent and the angle is at or beyond the stabilization limit.
    Disabled,
}

impl AxisState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlayerControlled => "player_controlled",
            Self::Stabilizing => "stabilizing",
            Self::Disabled => "disabled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_default_pose_is_level() {
        let state = FlightState::default();
        assert_eq!(state.position(), DVec3::new(0.0, START_HEIGHT, 0.0));
        assert!(state.pitch_angle().abs() < EPS);
        assert!(state.roll_angle().abs() < EPS);
        assert!((state.forward() - DVec3::Z).length() < EPS);
    }

    #[test]
    fn test_attitude_round_trip() {
        let pose = Pose::with_attitude(0.4, -0.7);
        let (pitch, yaw, roll) = pose.attitude();
        assert!((pitch - 0.4).abs() < EPS);
        assert!(yaw.abs() < EPS);
        assert!((roll + 0.7).abs() < EPS);
    }

    #[test]
    fn test_positive_pitch_raises_nose() {
        let pose = Pose::with_attitude(0.3, 0.0);
        assert!(pose.forward().y > 0.0);
        assert!((pose.forward().y - 0.3_f64.sin()).abs() < EPS);
    }

    #[test]
    fn test_positive_roll_drops_right_wing() {
        let pose = Pose::with_attitude(0.0, 0.3);
        let right_wing = pose.orientation * PITCH_AXIS;
        assert!(right_wing.y < 0.0);
    }

    #[test]
    fn test_rotation_about_local_pitch_axis_matches_attitude() {
        let q = DQuat::from_axis_angle(PITCH_AXIS, 0.25);
        let (pitch, _, roll) = attitude_of(q);
        assert!((pitch - 0.25).abs() < EPS);
        assert!(roll.abs() < EPS);
    }

    #[test]
    fn test_velocity_accessors() {
        let mut state = FlightState::default();
        *state.velocity_mut(Axis::Roll) = 0.02;
        assert_eq!(state.velocity(Axis::Roll), 0.02);
        assert_eq!(state.velocity(Axis::Pitch), 0.0);
        assert_eq!(state.roll_velocity, 0.02);
    }

    #[test]
    fn test_inverted_roll_reads_past_ninety_degrees() {
        let pose = Pose::with_attitude(0.0, 2.5);
        assert!(pose.attitude().2.abs() > FRAC_PI_2);
    }

    #[test]
    fn test_level_flight_reads_level_on_any_heading() {
        for yaw in [PI, FRAC_PI_2, -FRAC_PI_2, 2.0] {
            let (pitch, _, roll) = attitude_of(DQuat::from_rotation_y(yaw));
            assert!(pitch.abs() < EPS, "yaw {yaw}: pitch {pitch}");
            assert!(roll.abs() < EPS, "yaw {yaw}: roll {roll}");
        }
    }

    #[test]
    fn test_attitude_independent_of_heading() {
        for yaw in [0.0, PI, FRAC_PI_2, -FRAC_PI_2, -2.5] {
            let pose = Pose::with_heading(0.4, yaw, -0.7);
            let (pitch, _, roll) = pose.attitude();
            assert!((pitch - 0.4).abs() < EPS, "yaw {yaw}");
            assert!((roll + 0.7).abs() < EPS, "yaw {yaw}");
            // Nose height depends only on pitch.
            assert!((pose.forward().y - 0.4_f64.sin()).abs() < EPS);
        }
    }

    #[test]
    fn test_attitude_quat_inverts_attitude_of() {
        for (pitch, yaw, roll) in [(0.3, 2.9, -1.2), (-1.1, -0.4, 2.8), (0.0, PI, 0.0)] {
            let q = attitude_quat(pitch, yaw, roll);
            let (p, y, r) = attitude_of(q);
            assert!(attitude_quat(p, y, r).angle_between(q) < 1e-7);
            assert!((p - pitch).abs() < EPS && (r - roll).abs() < EPS);
        }
    }
}
