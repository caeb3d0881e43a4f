//! Configuration system for Airblox.
//!
//! Provides session settings that persist to disk as RON files.
//! Supports CLI overrides via clap, hot-reload detection, and forward/backward
//! compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE, Config, DebugConfig, FlightConfig, InputConfig, IslandConfig, SimConfig};
pub use error::ConfigError;
