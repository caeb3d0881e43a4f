//! Command-line argument parsing for Airblox.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Airblox command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "airblox", about = "Airblox arcade flight simulator")]
pub struct CliArgs {
    /// Aircraft preset (light-fighter, heavy-attacker, balanced, scout, trainer).
    #[arg(long)]
    pub aircraft: Option<String>,

    /// Angle constraint mode (clamped, unclamped).
    #[arg(long)]
    pub angle_mode: Option<String>,

    /// Stabilization curve (linear, nonlinear).
    #[arg(long)]
    pub stabilization: Option<String>,

    /// Number of ticks to simulate.
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Flight recorder category preset (minimal, control, diagnostics, full).
    #[arg(long)]
    pub log_preset: Option<String>,

    /// Turn the flight recorder's master logging toggle off.
    #[arg(long)]
    pub no_logging: bool,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref aircraft) = args.aircraft {
            self.flight.aircraft = aircraft.clone();
        }
        if let Some(ref mode) = args.angle_mode {
            self.flight.angle_mode = mode.clone();
        }
        if let Some(ref curve) = args.stabilization {
            self.flight.stabilization = curve.clone();
        }
        if let Some(ticks) = args.ticks {
            self.sim.ticks = ticks;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(ref preset) = args.log_preset {
            self.debug.preset = preset.clone();
        }
        if args.no_logging {
            self.debug.logging = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            aircraft: Some("scout".to_string()),
            ticks: Some(120),
            no_logging: true,
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.flight.aircraft, "scout");
        assert_eq!(config.sim.ticks, 120);
        assert!(!config.debug.logging);
        // Non-overridden fields retain defaults
        assert_eq!(config.flight.angle_mode, "unclamped");
        assert_eq!(config.debug.preset, "full");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "airblox",
            "--aircraft",
            "trainer",
            "--angle-mode",
            "clamped",
            "--log-preset",
            "minimal",
        ]);
        assert_eq!(args.aircraft.as_deref(), Some("trainer"));
        assert_eq!(args.angle_mode.as_deref(), Some("clamped"));
        assert_eq!(args.log_preset.as_deref(), Some("minimal"));
        assert!(!args.no_logging);
    }
}
