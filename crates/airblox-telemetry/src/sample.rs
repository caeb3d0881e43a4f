//! Per-tick telemetry samples and their HUD/recorder output.

use crate::probe::{GroundProbe, compute_altitude};
use crate::relative::{CameraRelative, compute_camera_relative};
use airblox_debug::{ChannelHandle, LogCategory};
use airblox_flight::{FlightState, Pose};
use serde::Serialize;
use serde_json::{Value, json};

/// HUD text for a value that could not be measured.
pub const UNKNOWN: &str = "unknown";

/// Altitude change that triggers a new `altitude` log entry.
pub const ALTITUDE_LOG_STEP: f64 = 1.0;

/// Camera distance change that triggers a new `camera_distance` log entry.
pub const CAMERA_LOG_STEP: f64 = 1.0;

/// Everything derived from one tick. Recomputed every tick, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetrySample {
    pub tick: u64,
    /// Radians.
    pub pitch: f64,
    /// Radians.
    pub roll: f64,
    pub pitch_velocity: f64,
    pub roll_velocity: f64,
    pub speed: f64,
    /// `None` when no ground was found below the aircraft.
    pub altitude: Option<f64>,
    /// `None` when there is no camera.
    pub camera: Option<CameraRelative>,
}

impl TelemetrySample {
    /// Sample the state left by the tick that just finished.
    #[must_use]
    pub fn capture(
        tick: u64,
        state: &FlightState,
        speed: f64,
        probe: Option<&dyn GroundProbe>,
        camera: Option<&Pose>,
    ) -> Self {
        let (pitch, roll) = state.angles();
        Self {
            tick,
            pitch,
            roll,
            pitch_velocity: state.pitch_velocity,
            roll_velocity: state.roll_velocity,
            speed,
            altitude: compute_altitude(state.position(), probe),
            camera: compute_camera_relative(&state.pose, camera),
        }
    }

    /// HUD lines, angles in degrees.
    #[must_use]
    pub fn hud_pairs(&self) -> Vec<(&'static str, String)> {
        let degrees = |rad: f64| format!("{:.1}", rad.to_degrees());
        let mut pairs = vec![
            ("pitch", degrees(self.pitch)),
            ("roll", degrees(self.roll)),
            ("pitch_vel", format!("{:.4}", self.pitch_velocity)),
            ("roll_vel", format!("{:.4}", self.roll_velocity)),
            ("speed", format!("{:.2}", self.speed)),
            (
                "altitude",
                self.altitude
                    .map_or_else(|| UNKNOWN.to_string(), |alt| format!("{alt:.2}")),
            ),
        ];
        match self.camera {
            Some(cam) => pairs.extend([
                ("cam_distance", format!("{:.2}", cam.distance)),
                ("cam_pitch", degrees(cam.pitch)),
                ("cam_yaw", degrees(cam.yaw)),
                ("cam_roll", degrees(cam.roll)),
            ]),
            None => pairs.extend(
                ["cam_distance", "cam_pitch", "cam_yaw", "cam_roll"]
                    .map(|key| (key, UNKNOWN.to_string())),
            ),
        }
        pairs
    }

    /// Recorder payload; unknown values are `null`.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        json!({
            "altitude": self.altitude,
            "camera_distance": self.camera.map(|c| c.distance),
            "camera_pitch": self.camera.map(|c| c.pitch),
            "camera_yaw": self.camera.map(|c| c.yaw),
            "camera_roll": self.camera.map(|c| c.roll),
        })
    }
}

/// Publishes telemetry to the recorder and HUD.
///
/// Altitude and camera distance are logged when they move by more than one
/// unit since the last logged value, or when they become known or unknown.
#[derive(Debug)]
pub struct Telemetry {
    recorder: ChannelHandle,
    last_altitude: Option<Option<f64>>,
    last_camera_distance: Option<Option<f64>>,
}

fn moved(last: Option<Option<f64>>, current: Option<f64>, step: f64) -> bool {
    match (last, current) {
        (None, _) => true,
        (Some(Some(a)), Some(b)) => (a - b).abs() > step,
        (Some(a), b) => a.is_some() != b.is_some(),
    }
}

impl Telemetry {
    #[must_use]
    pub fn new(recorder: ChannelHandle) -> Self {
        Self {
            recorder,
            last_altitude: None,
            last_camera_distance: None,
        }
    }

    /// Log the sample's notable changes and refresh the HUD.
    pub fn publish(&mut self, sample: &TelemetrySample) {
        if moved(self.last_altitude, sample.altitude, ALTITUDE_LOG_STEP) {
            self.last_altitude = Some(sample.altitude);
            self.recorder.log(
                LogCategory::Altitude,
                "altitude",
                json!({ "tick": sample.tick, "altitude": sample.altitude }),
            );
        }

        let distance = sample.camera.map(|c| c.distance);
        if moved(self.last_camera_distance, distance, CAMERA_LOG_STEP) {
            self.last_camera_distance = Some(distance);
            self.recorder.log(
                LogCategory::Camera,
                "camera_distance",
                json!({ "tick": sample.tick, "distance": distance }),
            );
        }

        self.recorder.snapshot_hud(sample.hud_pairs());
    }
}
