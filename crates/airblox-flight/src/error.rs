//! Flight configuration error types.

/// Errors raised while selecting or validating an aircraft profile or policy.
///
/// These are load-time errors; the per-tick update never fails.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ProfileError {
    /// No preset with this name exists.
    #[error("unknown aircraft preset: {0}")]
    UnknownPreset(String),

    /// A profile constant violates its precondition.
    #[error("invalid profile constant {field} = {value}: {reason}")]
    InvalidConstant {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Which precondition failed.
        reason: &'static str,
    },

    /// An angle-constraint mode name is not known.
    #[error("unknown angle mode: {0} (expected clamped or unclamped)")]
    UnknownAngleMode(String),

    /// A stabilization curve name is not known.
    #[error("unknown stabilization curve: {0} (expected linear or nonlinear)")]
    UnknownCurve(String),
}
