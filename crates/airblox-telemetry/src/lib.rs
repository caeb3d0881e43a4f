//! Read-only telemetry derived from the flight state after each tick:
//! altitude from a downward ground probe, the aircraft pose relative to the
//! chase camera, and the HUD/log output built from them.

pub mod probe;
pub mod relative;
pub mod sample;

pub use probe::{BoxGround, FlatGround, GroundProbe, NearestHit, compute_altitude};
pub use relative::{CameraRelative, compute_camera_relative};
pub use sample::{Telemetry, TelemetrySample, UNKNOWN};
