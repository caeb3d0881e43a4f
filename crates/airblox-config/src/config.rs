//! Session settings: the `config.ron` schema, its defaults, and persistence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest ring-buffer capacity the recorder accepts.
pub const MIN_LOG_CAPACITY: usize = 300;
/// Largest ring-buffer capacity the recorder accepts.
pub const MAX_LOG_CAPACITY: usize = 3000;

/// Top-level session configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Aircraft and flight-policy selection.
    pub flight: FlightConfig,
    /// Keyboard alias overrides.
    pub input: InputConfig,
    /// Flight recorder and diagnostics settings.
    pub debug: DebugConfig,
    /// Headless simulation loop settings.
    pub sim: SimConfig,
}

/// Flight configuration, bound once at session start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlightConfig {
    /// Aircraft preset name (e.g. "balanced", "light-fighter").
    pub aircraft: String,
    /// Angle constraint mode: "clamped" or "unclamped".
    pub angle_mode: String,
    /// Stabilization curve: "linear" or "nonlinear".
    pub stabilization: String,
}

/// Input configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Alias overrides (action name -> key names). Empty means built-in aliases.
    pub keybindings: HashMap<String, Vec<String>>,
}

/// Debug/flight-recorder configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Feature flag for every debug facility (recorder and HUD).
    pub enabled: bool,
    /// Master logging toggle, independent of category filters.
    pub logging: bool,
    /// Category preset name applied at startup.
    pub preset: String,
    /// Ring-buffer capacity in entries.
    pub log_capacity: usize,
    /// Interval between periodic state snapshots in milliseconds.
    pub snapshot_interval_ms: u64,
    /// How long stabilization may stay disabled before it is reported idle.
    pub idle_threshold_ms: u64,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

/// Headless simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed simulation rate in ticks per second.
    pub tick_rate_hz: u32,
    /// Number of ticks to run before exiting.
    pub ticks: u64,
    /// Height of the ocean plane used as the ground probe.
    pub ocean_height: f64,
    /// Chase camera offset from the aircraft in world space.
    pub camera_offset: [f64; 3],
    /// Chase camera lerp factor per tick (0 = frozen, 1 = rigid).
    pub camera_follow: f64,
    /// Box islands standing on the ocean, probed together with it.
    pub islands: Vec<IslandConfig>,
}

/// One box-shaped island, in world units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IslandConfig {
    pub center: [f64; 3],
    pub size: [f64; 3],
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            aircraft: "balanced".to_string(),
            angle_mode: "unclamped".to_string(),
            stabilization: "nonlinear".to_string(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            logging: true,
            preset: "full".to_string(),
            log_capacity: MIN_LOG_CAPACITY,
            snapshot_interval_ms: 200,
            idle_threshold_ms: 1000,
            log_level: "info".to_string(),
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            ticks: 600,
            ocean_height: -3.0,
            camera_offset: [0.0, 3.0, -8.0],
            camera_follow: 0.1,
            islands: Vec::new(),
        }
    }
}

impl DebugConfig {
    /// Ring-buffer capacity clamped into the supported range.
    #[must_use]
    pub fn effective_capacity(&self) -> usize {
        self.log_capacity.clamp(MIN_LOG_CAPACITY, MAX_LOG_CAPACITY)
    }
}

/// File name of the persisted configuration.
pub const CONFIG_FILE: &str = "config.ron";

impl Config {
    /// Returns the platform config directory for Airblox, if one exists.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("airblox"))
    }

    /// Load `config.ron` from `config_dir`, writing the defaults there first
    /// if it does not exist yet. The loaded config is validated.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        if !path.exists() {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Wrote default Airblox config to {}", path.display());
            return Ok(config);
        }

        let config = read_config(&path)?;
        config.validate()?;
        log::info!(
            "Loaded {} (aircraft {}, {} Hz)",
            path.display(),
            config.flight.aircraft,
            config.sim.tick_rate_hz
        );
        Ok(config)
    }

    /// Write the config to `config_dir/config.ron`, creating the directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        let write_err = |source| ConfigError::Write {
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(config_dir).map_err(write_err)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let text = ron::ser::to_string_pretty(self, pretty)?;
        std::fs::write(&path, text).map_err(write_err)
    }

    /// Re-read the file. `Some` only when it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = read_config(&config_dir.join(CONFIG_FILE))?;
        if fresh == *self {
            return Ok(None);
        }
        fresh.validate()?;
        log::info!("Config changed on disk; reloaded");
        Ok(Some(fresh))
    }

    /// Reject numeric settings the simulation cannot run with.
    ///
    /// Preset, policy and key names are checked where they are resolved.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });
        if self.sim.tick_rate_hz == 0 {
            return invalid("sim.tick_rate_hz", "must be at least 1");
        }
        if !(self.sim.camera_follow > 0.0 && self.sim.camera_follow <= 1.0) {
            return invalid("sim.camera_follow", "must be in (0, 1]");
        }
        if !self.sim.ocean_height.is_finite() || self.sim.camera_offset.iter().any(|v| !v.is_finite()) {
            return invalid("sim", "positions must be finite");
        }
        let island_ok = |island: &IslandConfig| {
            island.center.iter().all(|v| v.is_finite())
                && island.size.iter().all(|v| v.is_finite() && *v > 0.0)
        };
        if !self.sim.islands.iter().all(island_ok) {
            return invalid("sim.islands", "sizes must be positive and finite");
        }
        if self.debug.snapshot_interval_ms == 0 {
            return invalid("debug.snapshot_interval_ms", "must be at least 1");
        }
        Ok(())
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("aircraft: \"balanced\""));
        assert!(ron_str.contains("snapshot_interval_ms: 200"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config
            .input
            .keybindings
            .insert("PitchUp".to_string(), vec!["i".to_string()]);
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(flight: (aircraft: \"scout\"))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.flight.aircraft, "scout");
        assert_eq!(config.flight.angle_mode, "unclamped");
        assert_eq!(config.debug, DebugConfig::default());
        assert_eq!(config.sim, SimConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_capacity_clamped_into_range() {
        let mut debug = DebugConfig {
            log_capacity: 10,
            ..DebugConfig::default()
        };
        assert_eq!(debug.effective_capacity(), MIN_LOG_CAPACITY);
        debug.log_capacity = 1_000_000;
        assert_eq!(debug.effective_capacity(), MAX_LOG_CAPACITY);
        debug.log_capacity = 1200;
        assert_eq!(debug.effective_capacity(), 1200);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.flight.aircraft = "trainer".to_string();
        config.sim.ticks = 42;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.debug.preset = "minimal".to_string();
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().debug.preset, "minimal");
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_out_of_range_settings_rejected() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.sim.tick_rate_hz = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "sim.tick_rate_hz", .. })
        ));

        config.sim.tick_rate_hz = 30;
        config.sim.camera_follow = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "sim.camera_follow", .. })
        ));
    }

    #[test]
    fn test_islands_parse_and_validate() {
        let ron_str = "(sim: (islands: [(center: (10.0, -1.0, 40.0), size: (30.0, 4.0, 30.0))]))";
        let mut config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.sim.islands.len(), 1);
        assert_eq!(config.sim.islands[0].size, [30.0, 4.0, 30.0]);
        assert_eq!(config.sim.tick_rate_hz, 60);
        assert!(config.validate().is_ok());

        config.sim.islands[0].size[1] = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "sim.islands", .. })
        ));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "(sim: (tick_rate_hz: 0))",
        )
        .unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid setting `sim.tick_rate_hz`: must be at least 1"
        );
    }
}
