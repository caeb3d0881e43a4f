//! Flight recorder and HUD surface for Airblox.
//!
//! The [`ObservabilityChannel`] keeps a bounded ring buffer of structured
//! entries, gated three ways (feature flag, master logging toggle, category
//! filter), emits periodic full-state snapshots on an injected [`Clock`], and
//! holds the text shown on the debug HUD. A [`ChannelHandle`] shares one
//! channel between the flight model, telemetry and the session loop.

pub mod category;
pub mod channel;
pub mod clock;
pub mod error;
pub mod handle;
pub mod hud;

#[cfg(test)]
mod tests;

pub use category::{CategoryFilters, LogCategory, LogPreset};
pub use channel::{DEFAULT_EXPORT_FILE, LogEntry, ObservabilityChannel};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::DebugError;
pub use handle::ChannelHandle;
pub use hud::HudSurface;
