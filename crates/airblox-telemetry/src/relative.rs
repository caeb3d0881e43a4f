//! Aircraft pose as seen from the chase camera.

use airblox_flight::Pose;
use airblox_flight::state::attitude_of;
use serde::Serialize;

/// Distance to the camera and the aircraft's attitude in the camera frame.
///
/// Angles are radians and follow the aircraft sign conventions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraRelative {
    pub distance: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

/// Compose the inverse camera orientation with the aircraft orientation and
/// decompose the result. `None` when there is no camera.
#[must_use]
pub fn compute_camera_relative(aircraft: &Pose, camera: Option<&Pose>) -> Option<CameraRelative> {
    let camera = camera?;
    let relative = camera.orientation.inverse() * aircraft.orientation;
    let (pitch, yaw, roll) = attitude_of(relative);
    Some(CameraRelative {
        distance: aircraft.position.distance(camera.position),
        pitch,
        yaw,
        roll,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use airblox_flight::state::attitude_quat;
    use glam::{DQuat, DVec3};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_no_camera() {
        assert_eq!(compute_camera_relative(&Pose::default(), None), None);
    }

    #[test]
    fn test_aligned_camera_sees_no_rotation() {
        let aircraft = Pose::new(DVec3::new(0.0, 2.0, 10.0), DQuat::IDENTITY);
        let camera = Pose::new(DVec3::new(0.0, 5.0, 6.0), DQuat::IDENTITY);
        let rel = compute_camera_relative(&aircraft, Some(&camera)).unwrap();
        assert!((rel.distance - 5.0).abs() < EPS);
        assert!(rel.pitch.abs() < EPS && rel.yaw.abs() < EPS && rel.roll.abs() < EPS);
    }

    #[test]
    fn test_relative_roll_through_yawed_camera() {
        let aircraft = Pose::new(DVec3::ZERO, attitude_quat(0.0, 0.5, 0.3));
        let camera = Pose::new(DVec3::new(0.0, 0.0, -8.0), attitude_quat(0.0, 0.5, 0.0));
        let rel = compute_camera_relative(&aircraft, Some(&camera)).unwrap();
        assert!(rel.yaw.abs() < EPS);
        assert!((rel.roll - 0.3).abs() < EPS);
        assert!((rel.distance - 8.0).abs() < EPS);
    }

    #[test]
    fn test_relative_pitch_when_camera_level() {
        let aircraft = Pose::with_attitude(0.2, 0.0);
        let camera = Pose::default();
        let rel = compute_camera_relative(&aircraft, Some(&camera)).unwrap();
        assert!((rel.pitch - 0.2).abs() < EPS);
        assert!(rel.distance.abs() < EPS);
    }
}
