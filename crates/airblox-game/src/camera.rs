//! Chase camera: trails the aircraft at a fixed world-space offset.

use airblox_flight::Pose;
use glam::{DMat3, DQuat, DVec3};

/// Camera that lerps toward `target + offset` and always looks at the target.
#[derive(Debug, Clone)]
pub struct ChaseCamera {
    pub offset: DVec3,
    /// 0.0 = never moves, 1.0 = snaps.
    pub follow: f64,
    pose: Pose,
}

impl ChaseCamera {
    /// Start at the resting position behind `target`.
    #[must_use]
    pub fn new(offset: DVec3, follow: f64, target: &Pose) -> Self {
        let position = target.position + offset;
        Self {
            offset,
            follow,
            pose: Pose::new(
                position,
                look_at(position, target.position).unwrap_or(DQuat::IDENTITY),
            ),
        }
    }

    /// Follow `target` for one tick.
    pub fn update(&mut self, target: &Pose) {
        let desired = target.position + self.offset;
        self.pose.position = self.pose.position.lerp(desired, self.follow);
        if let Some(orientation) = look_at(self.pose.position, target.position) {
            self.pose.orientation = orientation;
        }
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }
}

/// Orientation whose local +Z points from `eye` to `target` with +Y up.
///
/// `None` when the two points coincide or the view is straight up or down.
fn look_at(eye: DVec3, target: DVec3) -> Option<DQuat> {
    let forward = (target - eye).try_normalize()?;
    let right = DVec3::Y.cross(forward).try_normalize()?;
    let up = forward.cross(right);
    Some(DQuat::from_mat3(&DMat3::from_cols(right, up, forward)))
}
