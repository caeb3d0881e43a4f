//! Downward ground probes.

use glam::DVec3;

/// Something a ray cast straight down can hit.
pub trait GroundProbe: Send + Sync {
    /// Distance from `origin` down to the nearest surface, or `None` if the
    /// ray hits nothing.
    fn cast_down(&self, origin: DVec3) -> Option<f64>;
}

/// Infinite horizontal plane, e.g. the ocean surface.
///
/// Only hit from above.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatGround {
    pub height: f64,
}

impl FlatGround {
    #[must_use]
    pub fn new(height: f64) -> Self {
        Self { height }
    }
}

impl GroundProbe for FlatGround {
    fn cast_down(&self, origin: DVec3) -> Option<f64> {
        (origin.y >= self.height).then(|| origin.y - self.height)
    }
}

/// Axis-aligned box whose top face can be hit, e.g. an island block.
///
/// A ray starting inside the box does not hit it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGround {
    pub min: DVec3,
    pub max: DVec3,
}

impl BoxGround {
    /// Box spanning `center ± size / 2`.
    #[must_use]
    pub fn from_center_size(center: DVec3, size: DVec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }
}

impl GroundProbe for BoxGround {
    fn cast_down(&self, origin: DVec3) -> Option<f64> {
        let over = (self.min.x..=self.max.x).contains(&origin.x)
            && (self.min.z..=self.max.z).contains(&origin.z);
        (over && origin.y >= self.max.y).then(|| origin.y - self.max.y)
    }
}

/// Nearest hit among several probes.
#[derive(Default)]
pub struct NearestHit {
    probes: Vec<Box<dyn GroundProbe>>,
}

impl NearestHit {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, probe: impl GroundProbe + 'static) -> Self {
        self.push(probe);
        self
    }

    pub fn push(&mut self, probe: impl GroundProbe + 'static) {
        self.probes.push(Box::new(probe));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

impl std::fmt::Debug for NearestHit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NearestHit")
            .field("probes", &self.probes.len())
            .finish()
    }
}

impl GroundProbe for NearestHit {
    fn cast_down(&self, origin: DVec3) -> Option<f64> {
        self.probes
            .iter()
            .filter_map(|probe| probe.cast_down(origin))
            .min_by(f64::total_cmp)
    }
}

/// Height above the ground directly below `position`.
///
/// `None` when there is no probe or the probe hits nothing.
#[must_use]
pub fn compute_altitude(position: DVec3, probe: Option<&dyn GroundProbe>) -> Option<f64> {
    probe.and_then(|probe| probe.cast_down(position))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_ground_distance() {
        let ocean = FlatGround::new(-3.0);
        assert_eq!(ocean.cast_down(DVec3::new(5.0, 2.0, -7.0)), Some(5.0));
    }

    #[test]
    fn test_flat_ground_missed_from_below() {
        let ocean = FlatGround::new(-3.0);
        assert_eq!(ocean.cast_down(DVec3::new(0.0, -4.0, 0.0)), None);
    }

    #[test]
    fn test_box_hit_only_when_over_top() {
        let island = BoxGround::from_center_size(DVec3::new(10.0, -2.0, 10.0), DVec3::new(20.0, 4.0, 20.0));
        assert_eq!(island.cast_down(DVec3::new(12.0, 5.0, 8.0)), Some(5.0));
        assert_eq!(island.cast_down(DVec3::new(30.0, 5.0, 8.0)), None);
        // Inside the block.
        assert_eq!(island.cast_down(DVec3::new(12.0, -1.0, 8.0)), None);
    }

    #[test]
    fn test_nearest_hit_picks_closest() {
        let world = NearestHit::new()
            .with(FlatGround::new(-3.0))
            .with(BoxGround::from_center_size(DVec3::ZERO, DVec3::new(10.0, 2.0, 10.0)));
        assert_eq!(world.len(), 2);
        assert_eq!(world.cast_down(DVec3::new(0.0, 4.0, 0.0)), Some(3.0));
        assert_eq!(world.cast_down(DVec3::new(50.0, 4.0, 0.0)), Some(7.0));
    }

    #[test]
    fn test_empty_nearest_hit_misses() {
        let world = NearestHit::new();
        assert!(world.is_empty());
        assert_eq!(world.cast_down(DVec3::new(0.0, 10.0, 0.0)), None);
    }

    #[test]
    fn test_altitude_without_probe_is_unknown() {
        assert_eq!(compute_altitude(DVec3::new(0.0, 2.0, 0.0), None), None);
        let ocean = FlatGround::new(0.0);
        assert_eq!(compute_altitude(DVec3::new(0.0, 2.0, 0.0), Some(&ocean)), Some(2.0));
    }
}
