//! Flight dynamics for Airblox: aircraft profiles, the stabilization and
//! angle policies, and the per-tick [`FlightModel`].
//!
//! The model is a pure numeric core. It owns the [`FlightState`] of one
//! aircraft, reads a [`ControlIntent`](airblox_input::ControlIntent) each
//! tick and reports what it did through a
//! [`ChannelHandle`](airblox_debug::ChannelHandle). Angular quantities are
//! expressed per tick.

pub mod error;
pub mod model;
pub mod policy;
pub mod profile;
pub mod state;


pub use error::ProfileError;
pub use model::{AxisReport, FlightModel, TickReport, VelocityStep, crosses_zero, step_velocity};
pub use policy::{AngleConstraintMode, FlightPolicy, STABILIZATION_LIMIT, StabilizationCurve};
pub use profile::{AircraftKind, AircraftProfile};
pub use state::{Axis, AxisState, FlightState, Pose};
