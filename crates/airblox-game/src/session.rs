//! One flight session: input, flight model, chase camera and telemetry
//! advanced together on a fixed tick.

use crate::camera::ChaseCamera;
use crate::error::SessionError;
use airblox_config::Config;
use airblox_debug::{ChannelHandle, Clock, LogCategory, ManualClock, ObservabilityChannel};
use airblox_flight::{AircraftKind, FlightModel, FlightPolicy, TickReport};
use airblox_input::{InputState, KeyAliasTable};
use airblox_telemetry::{BoxGround, FlatGround, GroundProbe, NearestHit, Telemetry, TelemetrySample};
use glam::DVec3;
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Everything a running flight owns.
#[derive(Debug)]
pub struct FlightSession {
    aircraft: AircraftKind,
    model: FlightModel,
    input: InputState,
    held: Vec<String>,
    camera: ChaseCamera,
    telemetry: Telemetry,
    ground: NearestHit,
    recorder: ChannelHandle,
    manual_clock: Option<Arc<ManualClock>>,
    tick_dt: Duration,
}

impl FlightSession {
    /// Build a session from configuration.
    ///
    /// With a `manual_clock` the recorder clock advances exactly one tick
    /// per [`step`](Self::step); otherwise `clock` is read as-is.
    ///
    /// # Errors
    /// Returns an error for unknown preset, policy, action or log preset
    /// names, or an aircraft profile that fails validation.
    pub fn new(
        config: &Config,
        clock: Arc<dyn Clock>,
        manual_clock: Option<Arc<ManualClock>>,
    ) -> Result<Self, SessionError> {
        let aircraft: AircraftKind = config.flight.aircraft.parse()?;
        let profile = aircraft.profile();
        profile.validate()?;
        let policy = FlightPolicy::from_names(&config.flight.angle_mode, &config.flight.stabilization)?;

        let mut aliases = KeyAliasTable::default();
        aliases.apply_overrides(&config.input.keybindings)?;
        for conflict in aliases.detect_conflicts() {
            warn!("Key '{}' is bound to {:?}", conflict.key, conflict.actions);
        }

        let recorder = ChannelHandle::new(ObservabilityChannel::from_config(&config.debug, clock)?);
        let model = FlightModel::new(profile, policy, recorder.clone())
            .with_idle_threshold(Duration::from_millis(config.debug.idle_threshold_ms));
        let camera = ChaseCamera::new(
            DVec3::from_array(config.sim.camera_offset),
            config.sim.camera_follow,
            model.pose(),
        );
        let mut ground = NearestHit::new().with(FlatGround::new(config.sim.ocean_height));
        for island in &config.sim.islands {
            ground.push(BoxGround::from_center_size(
                DVec3::from_array(island.center),
                DVec3::from_array(island.size),
            ));
        }

        recorder.log(
            LogCategory::Session,
            "session_start",
            json!({
                "aircraft": aircraft.as_str(),
                "profile": profile,
                "angle_mode": policy.angle_mode,
                "stabilization": policy.curve,
                "tick_rate_hz": config.sim.tick_rate_hz,
            }),
        );
        info!(
            "Session: aircraft={} angle_mode={:?} stabilization={:?}",
            aircraft.as_str(),
            policy.angle_mode,
            policy.curve
        );

        Ok(Self {
            aircraft,
            model,
            input: InputState::with_aliases(aliases),
            held: Vec::new(),
            camera,
            telemetry: Telemetry::new(recorder.clone()),
            ground,
            recorder,
            manual_clock,
            tick_dt: Duration::from_secs_f64(1.0 / f64::from(config.sim.tick_rate_hz.max(1))),
        })
    }

    /// A session whose recorder runs on simulated time.
    ///
    /// # Errors
    /// See [`new`](Self::new).
    pub fn headless(config: &Config) -> Result<Self, SessionError> {
        let clock = Arc::new(ManualClock::new());
        Self::new(config, clock.clone(), Some(clock))
    }

    pub fn model(&self) -> &FlightModel {
        &self.model
    }

    pub fn recorder(&self) -> &ChannelHandle {
        &self.recorder
    }

    pub fn tick_dt(&self) -> Duration {
        self.tick_dt
    }

    /// Hold exactly `keys`, pressing and releasing whatever changed.
    pub fn hold(&mut self, keys: &[String]) {
        for key in &self.held {
            if !keys.contains(key) {
                self.input.set_key(key, false);
            }
        }
        for key in keys {
            if !self.held.contains(key) {
                self.input.set_key(key, true);
            }
        }
        self.held = keys.to_vec();
    }

    /// Run one tick: flight model, camera, telemetry, HUD and snapshot.
    pub fn step(&mut self) -> TickReport {
        let report = self.model.update(self.input.intent());
        self.camera.update(self.model.pose());

        let ground: &dyn GroundProbe = &self.ground;
        let sample = TelemetrySample::capture(
            report.tick,
            self.model.state(),
            self.model.profile().speed,
            Some(ground),
            Some(self.camera.pose()),
        );
        self.telemetry.publish(&sample);
        let model = &self.model;
        self.recorder
            .maybe_snapshot(|| snapshot_payload(model, &sample));

        if let Some(clock) = &self.manual_clock {
            clock.advance(self.tick_dt);
        }
        report
    }

    /// Log the end of the session.
    pub fn finish(&self) {
        let position = self.model.state().position();
        self.recorder.log(
            LogCategory::Session,
            "session_end",
            json!({
                "aircraft": self.aircraft.as_str(),
                "ticks": self.model.tick(),
                "position": [position.x, position.y, position.z],
            }),
        );
        let recorder = self.recorder.lock();
        info!(
            "Session finished after {} ticks; {} recorder entries ({} evicted)",
            self.model.tick(),
            recorder.len(),
            recorder.evicted()
        );
    }

    pub fn hud_text(&self) -> String {
        self.recorder.lock().hud_text()
    }

    /// Write the flight recorder buffer to `path` as JSON.
    ///
    /// # Errors
    /// Returns [`SessionError::Recorder`] if the file cannot be written.
    pub fn export(&self, path: &Path) -> Result<(), SessionError> {
        Ok(self.recorder.lock().export_to_file(path)?)
    }
}

/// Flight state and telemetry merged into one snapshot object.
fn snapshot_payload(model: &FlightModel, sample: &TelemetrySample) -> Value {
    let mut payload = model.snapshot_payload();
    if let (Some(fields), Value::Object(telemetry)) = (payload.as_object_mut(), sample.to_payload()) {
        fields.extend(telemetry);
    }
    payload
}
