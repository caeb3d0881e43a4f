//! Bounded structured event log with three-level gating and periodic snapshots.

use crate::category::{CategoryFilters, LogCategory, LogPreset};
use crate::clock::Clock;
use crate::error::DebugError;
use crate::hud::HudSurface;
use airblox_config::DebugConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// File name used when the log is exported without an explicit path.
pub const DEFAULT_EXPORT_FILE: &str = "airblox-debug-log.json";

/// Default interval between periodic snapshots.
pub const DEFAULT_SNAPSHOT_INTERVAL: Duration = Duration::from_millis(200);

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Milliseconds since the channel clock's origin.
    pub time_ms: f64,
    /// Category tag.
    pub category: LogCategory,
    /// Event name, e.g. `zero_cross` or `snapshot`.
    pub event: String,
    /// Arbitrary key/value payload.
    pub payload: Value,
}

/// The flight recorder.
///
/// Entries pass three gates in order: the feature flag, the master logging
/// toggle, then the per-category filter. When the buffer is full the oldest
/// entry is evicted.
#[derive(Debug)]
pub struct ObservabilityChannel {
    feature_enabled: bool,
    logging_enabled: bool,
    filters: CategoryFilters,
    entries: VecDeque<LogEntry>,
    capacity: usize,
    evicted: u64,
    hud: HudSurface,
    clock: Arc<dyn Clock>,
    snapshot_interval: Duration,
    last_snapshot: Option<Duration>,
}

impl ObservabilityChannel {
    /// A channel with every category enabled and the default snapshot interval.
    ///
    /// A `capacity` of zero is treated as one.
    #[must_use]
    pub fn new(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        let capacity = capacity.max(1);
        Self {
            feature_enabled: true,
            logging_enabled: true,
            filters: LogPreset::Full.filters(),
            entries: VecDeque::with_capacity(capacity),
            capacity,
            evicted: 0,
            hud: HudSurface::default(),
            clock,
            snapshot_interval: DEFAULT_SNAPSHOT_INTERVAL,
            last_snapshot: None,
        }
    }

    /// Build a channel from the `debug` config section.
    ///
    /// # Errors
    /// Returns [`DebugError::UnknownPreset`] if the preset name is not known.
    pub fn from_config(config: &DebugConfig, clock: Arc<dyn Clock>) -> Result<Self, DebugError> {
        let preset: LogPreset = config.preset.parse()?;
        let mut channel = Self::new(config.effective_capacity(), clock);
        channel.feature_enabled = config.enabled;
        channel.logging_enabled = config.logging;
        channel.apply_preset(preset);
        channel.snapshot_interval = Duration::from_millis(config.snapshot_interval_ms);
        Ok(channel)
    }

    // --- Gating ---

    /// Whether the debug feature as a whole is on.
    #[must_use]
    pub fn is_feature_enabled(&self) -> bool {
        self.feature_enabled
    }

    /// Turn every debug facility on or off, including the HUD.
    pub fn set_feature_enabled(&mut self, enabled: bool) {
        self.feature_enabled = enabled;
    }

    /// Whether the master logging toggle is on.
    #[must_use]
    pub fn is_logging_enabled(&self) -> bool {
        self.logging_enabled
    }

    /// Master logging toggle. Filters are kept untouched.
    pub fn set_logging_enabled(&mut self, enabled: bool) {
        self.logging_enabled = enabled;
    }

    /// Enable or disable a single category.
    pub fn set_category(&mut self, category: LogCategory, enabled: bool) {
        self.filters.insert(category, enabled);
    }

    /// Whether `category` passes the filter map (ignoring the other gates).
    #[must_use]
    pub fn is_category_enabled(&self, category: LogCategory) -> bool {
        self.filters.get(&category).copied().unwrap_or(false)
    }

    /// The current filter map.
    #[must_use]
    pub fn filters(&self) -> &CategoryFilters {
        &self.filters
    }

    /// Replace the whole filter map.
    pub fn set_filters(&mut self, filters: CategoryFilters) {
        self.filters = filters;
    }

    /// Replace the whole filter map with a preset.
    pub fn apply_preset(&mut self, preset: LogPreset) {
        self.filters = preset.filters();
    }

    /// Whether an entry in `category` would be recorded right now.
    #[must_use]
    pub fn accepts(&self, category: LogCategory) -> bool {
        self.feature_enabled && self.logging_enabled && self.is_category_enabled(category)
    }

    // --- Recording ---

    /// Current clock reading.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Record an event. Returns whether it passed the gates.
    pub fn log(&mut self, category: LogCategory, event: &str, payload: Value) -> bool {
        if !self.accepts(category) {
            return false;
        }
        let entry = LogEntry {
            time_ms: self.clock.now().as_secs_f64() * 1000.0,
            category,
            event: event.to_string(),
            payload,
        };
        tracing::debug!(
            target: "airblox::recorder",
            category = category.as_str(),
            name = %entry.event,
            payload = %entry.payload,
            "[DBG]"
        );
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            self.evicted += 1;
        }
        self.entries.push_back(entry);
        true
    }

    /// Interval between periodic snapshots.
    #[must_use]
    pub fn snapshot_interval(&self) -> Duration {
        self.snapshot_interval
    }

    /// Change the snapshot interval.
    pub fn set_snapshot_interval(&mut self, interval: Duration) {
        self.snapshot_interval = interval;
    }

    /// Whether a periodic snapshot is due. The first call is always due.
    #[must_use]
    pub fn snapshot_due(&self) -> bool {
        match self.last_snapshot {
            None => true,
            Some(last) => self.clock.now().saturating_sub(last) >= self.snapshot_interval,
        }
    }

    /// Emit a periodic snapshot if one is due.
    ///
    /// `payload` is only evaluated when the snapshot will actually be stored.
    /// The interval timer restarts whenever a snapshot falls due, even if the
    /// snapshot category is filtered out. Returns whether an entry was stored.
    pub fn maybe_snapshot(&mut self, payload: impl FnOnce() -> Value) -> bool {
        if !self.snapshot_due() {
            return false;
        }
        self.last_snapshot = Some(self.clock.now());
        if !self.accepts(LogCategory::Snapshot) {
            return false;
        }
        self.log(LogCategory::Snapshot, "snapshot", payload())
    }

    // --- HUD ---

    /// Replace the HUD contents. Ignored while the feature flag is off.
    pub fn snapshot_hud<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        if self.feature_enabled {
            self.hud.replace(pairs);
        }
    }

    /// The HUD surface.
    #[must_use]
    pub fn hud(&self) -> &HudSurface {
        &self.hud
    }

    /// The HUD rendered as text.
    #[must_use]
    pub fn hud_text(&self) -> String {
        self.hud.render()
    }

    // --- Buffer access ---

    /// Entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Entries whose event name is `event`, oldest first.
    pub fn events_named<'a>(&'a self, event: &'a str) -> impl Iterator<Item = &'a LogEntry> + 'a {
        self.entries.iter().filter(move |e| e.event == event)
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of stored entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries dropped by eviction so far.
    #[must_use]
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    // --- Export ---

    /// The whole buffer as pretty-printed JSON (an array of entries).
    ///
    /// # Errors
    /// Returns an error if a payload cannot be serialized.
    pub fn export_json(&self) -> Result<String, DebugError> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// Write [`export_json`](Self::export_json) to `path`, creating parent
    /// directories as needed.
    ///
    /// # Errors
    /// Returns an error if serialization or the file write fails.
    pub fn export_to_file(&self, path: &Path) -> Result<(), DebugError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.export_json()?)?;
        tracing::info!(
            "Exported {} log entries to {}",
            self.entries.len(),
            path.display()
        );
        Ok(())
    }
}
