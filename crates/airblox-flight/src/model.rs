//! The per-tick flight model.
//!
//! One [`FlightModel::update`] call turns the current control intent into
//! angular velocity, rotates the aircraft and flies it forward by one step.
//! Every step of the tick runs in a fixed order:
//!
//! 1. accumulate intent into angular velocity
//! 2. autostabilize axes that have no intent
//! 3. clamp angular velocity
//! 4. damp angular velocity
//! 5. flag anomalies (log only)
//! 6. apply the rotation
//! 7. translate along the forward axis
//! 8. detect zero crossings (log only)

use crate::policy::{
    AngleConstraintMode, CurveShape, FlightPolicy, PITCH_CURVE, ROLL_CURVE, STABILIZATION_LIMIT,
    StabilizationCurve,
};
use crate::profile::AircraftProfile;
use crate::state::{Axis, AxisState, FlightState, PITCH_AXIS, Pose, ROLL_AXIS, attitude_quat};
use airblox_debug::{ChannelHandle, LogCategory};
use airblox_input::ControlIntent;
use glam::DQuat;
use serde::Serialize;
use serde_json::{Value, json};
use std::f64::consts::FRAC_PI_2;
use std::time::Duration;

/// Pitch rate bound, rad/tick.
pub const MAX_PITCH_RATE: f64 = 0.05;
/// Roll rate bound, rad/tick.
pub const MAX_ROLL_RATE: f64 = 0.06;
/// Pitch rate above which a high rotation speed is flagged.
pub const HIGH_PITCH_RATE: f64 = 0.04;
/// Roll rate above which a high rotation speed is flagged.
pub const HIGH_ROLL_RATE: f64 = 0.05;
/// Attitude beyond which an axis counts as inverted.
pub const INVERTED_ANGLE: f64 = FRAC_PI_2;
/// How long stabilization may stay disabled before it is reported idle.
pub const DEFAULT_IDLE_THRESHOLD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy)]
struct AxisParams {
    accel: f64,
    damping: f64,
    max_angle: f64,
    rate_limit: f64,
    high_rate: f64,
    shape: CurveShape,
}

impl AxisParams {
    fn of(axis: Axis, profile: &AircraftProfile) -> Self {
        match axis {
            Axis::Pitch => Self {
                accel: profile.pitch_accel,
                damping: profile.pitch_damping,
                max_angle: profile.max_pitch,
                rate_limit: MAX_PITCH_RATE,
                high_rate: HIGH_PITCH_RATE,
                shape: PITCH_CURVE,
            },
            Axis::Roll => Self {
                accel: profile.roll_accel,
                damping: profile.roll_damping,
                max_angle: profile.max_roll,
                rate_limit: MAX_ROLL_RATE,
                high_rate: HIGH_ROLL_RATE,
                shape: ROLL_CURVE,
            },
        }
    }
}

/// Outcome of the velocity half of a tick (steps 1 to 4) on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityStep {
    pub state: AxisState,
    /// Velocity change contributed by the stabilizer (zero unless stabilizing).
    pub stabilization: f64,
    /// Velocity after clamping and damping.
    pub velocity: f64,
}

/// Which state an axis is in given its intent and current angle.
#[must_use]
pub fn axis_state(intent: i8, angle: f64) -> AxisState {
    if intent != 0 {
        AxisState::PlayerControlled
    } else if angle.abs() >= STABILIZATION_LIMIT {
        AxisState::Disabled
    } else {
        AxisState::Stabilizing
    }
}

/// Integrate one axis' angular velocity: accumulate, stabilize, clamp, damp.
#[must_use]
pub fn step_velocity(
    velocity: f64,
    intent: i8,
    angle: f64,
    axis: Axis,
    profile: &AircraftProfile,
    curve: StabilizationCurve,
) -> VelocityStep {
    let params = AxisParams::of(axis, profile);
    let state = axis_state(intent, angle);
    let mut velocity = velocity + f64::from(intent) * params.accel;

    let stabilization = if state == AxisState::Stabilizing {
        curve.correction(angle, params.shape, profile.auto_level, profile.speed)
    } else {
        0.0
    };
    velocity += stabilization;

    velocity = velocity.clamp(-params.rate_limit, params.rate_limit);
    velocity *= params.damping;

    VelocityStep {
        state,
        stabilization,
        velocity,
    }
}

fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Whether stepping `angle` by `velocity` changes its sign.
///
/// Zero is its own sign, so leaving or reaching exactly level counts.
/// Wrapping through ±π keeps the sign and does not count.
#[must_use]
pub fn crosses_zero(angle: f64, velocity: f64) -> bool {
    sign(angle) != sign(angle + velocity)
}

/// What happened on one axis during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisReport {
    pub state: AxisState,
    pub angle_before: f64,
    pub angle_after: f64,
    /// Velocity applied this tick.
    pub velocity: f64,
    pub stabilization: f64,
    pub zero_cross: bool,
    pub high_rate: bool,
    pub inverted: bool,
    /// Stabilization has been disabled for longer than the idle threshold.
    pub idle: bool,
}

/// Summary of one [`FlightModel::update`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub pitch: AxisReport,
    pub roll: AxisReport,
}

impl TickReport {
    #[must_use]
    pub fn axis(&self, axis: Axis) -> &AxisReport {
        match axis {
            Axis::Pitch => &self.pitch,
            Axis::Roll => &self.roll,
        }
    }
}

/// Per-axis bookkeeping for edge-triggered log events.
#[derive(Debug, Clone, Copy, Default)]
struct AxisMonitor {
    state: AxisState,
    stabilizer_off: bool,
    disabled_since: Option<Duration>,
    idle_reported: bool,
    high_rate: bool,
    inverted: bool,
}

/// Owns the flight state of one aircraft and advances it tick by tick.
#[derive(Debug)]
pub struct FlightModel {
    profile: AircraftProfile,
    policy: FlightPolicy,
    state: FlightState,
    recorder: ChannelHandle,
    idle_threshold: Duration,
    tick: u64,
    last_intent: ControlIntent,
    pitch: AxisMonitor,
    roll: AxisMonitor,
}

impl FlightModel {
    /// A level aircraft at the default start pose.
    ///
    /// `profile` must satisfy [`AircraftProfile::validate`]; it is checked
    /// once at load time, not per tick.
    #[must_use]
    pub fn new(profile: AircraftProfile, policy: FlightPolicy, recorder: ChannelHandle) -> Self {
        debug_assert!(profile.validate().is_ok(), "invalid profile {profile:?}");
        tracing::debug!(
            angle_mode = ?policy.angle_mode,
            curve = ?policy.curve,
            speed = profile.speed,
            "Flight model created"
        );
        Self {
            profile,
            policy,
            state: FlightState::default(),
            recorder,
            idle_threshold: DEFAULT_IDLE_THRESHOLD,
            tick: 0,
            last_intent: ControlIntent::NEUTRAL,
            pitch: AxisMonitor::default(),
            roll: AxisMonitor::default(),
        }
    }

    /// Start from `pose` instead of the default.
    #[must_use]
    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.state.pose = pose;
        self
    }

    #[must_use]
    pub fn with_idle_threshold(mut self, threshold: Duration) -> Self {
        self.idle_threshold = threshold;
        self
    }

    pub fn profile(&self) -> &AircraftProfile {
        &self.profile
    }

    pub fn policy(&self) -> FlightPolicy {
        self.policy
    }

    pub fn state(&self) -> &FlightState {
        &self.state
    }

    pub fn pose(&self) -> &Pose {
        &self.state.pose
    }

    pub fn recorder(&self) -> &ChannelHandle {
        &self.recorder
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// State each axis was left in by the last tick.
    pub fn axis_state(&self, axis: Axis) -> AxisState {
        self.monitor(axis).state
    }

    fn monitor(&self, axis: Axis) -> &AxisMonitor {
        match axis {
            Axis::Pitch => &self.pitch,
            Axis::Roll => &self.roll,
        }
    }

    fn monitor_mut(&mut self, axis: Axis) -> &mut AxisMonitor {
        match axis {
            Axis::Pitch => &mut self.pitch,
            Axis::Roll => &mut self.roll,
        }
    }

    /// Advance the aircraft by one tick.
    pub fn update(&mut self, intent: ControlIntent) -> TickReport {
        self.tick += 1;
        let now = self.recorder.now();
        self.note_intent(intent);

        let (pitch_before, roll_before) = self.state.angles();
        let pitch = self.integrate(Axis::Pitch, intent.pitch, pitch_before, now);
        let roll = self.integrate(Axis::Roll, intent.roll, roll_before, now);

        self.apply_rotation(pitch, roll);
        let forward = self.state.forward();
        self.state.pose.position += forward * self.profile.speed;

        let (pitch_after, roll_after) = self.state.angles();
        let mut report = TickReport {
            tick: self.tick,
            pitch: AxisReport {
                angle_after: pitch_after,
                ..pitch
            },
            roll: AxisReport {
                angle_after: roll_after,
                ..roll
            },
        };
        for axis in Axis::ALL {
            let axis_report = match axis {
                Axis::Pitch => &mut report.pitch,
                Axis::Roll => &mut report.roll,
            };
            axis_report.zero_cross = crosses_zero(axis_report.angle_before, axis_report.velocity);
            if axis_report.zero_cross {
                self.recorder.log(
                    LogCategory::ZeroCross,
                    "zero_cross",
                    json!({
                        "tick": self.tick,
                        "axis": axis.as_str(),
                        "before": axis_report.angle_before,
                        "after": axis_report.angle_after,
                        "velocity": axis_report.velocity,
                    }),
                );
            }
        }
        report
    }

    fn note_intent(&mut self, intent: ControlIntent) {
        if intent == self.last_intent {
            return;
        }
        self.recorder.log(
            LogCategory::Input,
            "intent_changed",
            json!({
                "tick": self.tick,
                "pitch": intent.pitch,
                "roll": intent.roll,
                "previous_pitch": self.last_intent.pitch,
                "previous_roll": self.last_intent.roll,
            }),
        );
        self.last_intent = intent;
    }

    /// Steps 1 to 5 on one axis.
    fn integrate(&mut self, axis: Axis, intent: i8, angle: f64, now: Duration) -> AxisReport {
        let step = step_velocity(
            self.state.velocity(axis),
            intent,
            angle,
            axis,
            &self.profile,
            self.policy.curve,
        );
        *self.state.velocity_mut(axis) = step.velocity;

        let tick = self.tick;
        let idle_threshold = self.idle_threshold;
        let high_rate = step.velocity.abs() > AxisParams::of(axis, &self.profile).high_rate;
        let inverted = angle.abs() > INVERTED_ANGLE;
        let recorder = self.recorder.clone();
        let monitor = self.monitor_mut(axis);

        if step.state != monitor.state {
            recorder.log(
                LogCategory::State,
                "axis_state",
                json!({
                    "tick": tick,
                    "axis": axis.as_str(),
                    "from": monitor.state.as_str(),
                    "to": step.state.as_str(),
                    "angle": angle,
                }),
            );
            match step.state {
                AxisState::Disabled => {
                    monitor.stabilizer_off = true;
                    recorder.log(
                        LogCategory::Stabilization,
                        "stabilization_disabled",
                        json!({ "tick": tick, "axis": axis.as_str(), "angle": angle }),
                    );
                }
                AxisState::Stabilizing if monitor.stabilizer_off => {
                    monitor.stabilizer_off = false;
                    recorder.log(
                        LogCategory::Stabilization,
                        "stabilization_enabled",
                        json!({ "tick": tick, "axis": axis.as_str(), "angle": angle }),
                    );
                }
                _ => {}
            }
            monitor.state = step.state;
        }

        let idle = if step.state == AxisState::Disabled {
            let since = *monitor.disabled_since.get_or_insert(now);
            let disabled_for = now.saturating_sub(since);
            let idle = disabled_for > idle_threshold;
            if idle && !monitor.idle_reported {
                monitor.idle_reported = true;
                recorder.log(
                    LogCategory::Stabilization,
                    "stabilization_idle",
                    json!({
                        "tick": tick,
                        "axis": axis.as_str(),
                        "disabled_ms": disabled_for.as_secs_f64() * 1000.0,
                        "angle": angle,
                    }),
                );
            }
            idle
        } else {
            monitor.disabled_since = None;
            monitor.idle_reported = false;
            false
        };

        if high_rate && !monitor.high_rate {
            recorder.log(
                LogCategory::Anomaly,
                "high_rotation_speed",
                json!({ "tick": tick, "axis": axis.as_str(), "velocity": step.velocity }),
            );
        }
        monitor.high_rate = high_rate;
        if inverted && !monitor.inverted {
            recorder.log(
                LogCategory::Anomaly,
                "inverted_flight",
                json!({ "tick": tick, "axis": axis.as_str(), "angle": angle }),
            );
        }
        monitor.inverted = inverted;

        AxisReport {
            state: step.state,
            angle_before: angle,
            angle_after: angle,
            velocity: step.velocity,
            stabilization: step.stabilization,
            zero_cross: false,
            high_rate,
            inverted,
            idle,
        }
    }

    /// Step 6.
    fn apply_rotation(&mut self, pitch: AxisReport, roll: AxisReport) {
        let orientation = self.state.pose.orientation;
        self.state.pose.orientation = match self.policy.angle_mode {
            AngleConstraintMode::Clamped => {
                let (_, yaw, _) = self.state.pose.attitude();
                let bounded = |axis: Axis, report: AxisReport| {
                    let max = AxisParams::of(axis, &self.profile).max_angle;
                    (report.angle_before + report.velocity).clamp(-max, max)
                };
                attitude_quat(bounded(Axis::Pitch, pitch), yaw, bounded(Axis::Roll, roll))
            }
            AngleConstraintMode::Unclamped => {
                let pitch_rot = DQuat::from_axis_angle(orientation * PITCH_AXIS, pitch.velocity);
                let pitched = pitch_rot * orientation;
                let roll_rot = DQuat::from_axis_angle(pitched * ROLL_AXIS, roll.velocity);
                (roll_rot * pitched).normalize()
            }
        };
    }

    /// Full-state payload for the periodic flight-recorder snapshot.
    #[must_use]
    pub fn snapshot_payload(&self) -> Value {
        let (pitch, roll) = self.state.angles();
        let p = self.state.position();
        json!({
            "tick": self.tick,
            "position": [p.x, p.y, p.z],
            "pitch": pitch,
            "roll": roll,
            "pitch_velocity": self.state.pitch_velocity,
            "roll_velocity": self.state.roll_velocity,
            "pitch_state": self.pitch.state.as_str(),
            "roll_state": self.roll.state.as_str(),
        })
    }
}
