//! Unit tests for the flight recorder.

use crate::{
    ChannelHandle, DebugError, LogCategory, LogEntry, LogPreset, ManualClock, ObservabilityChannel,
};
use airblox_config::DebugConfig;
use serde_json::json;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn channel(capacity: usize) -> (ObservabilityChannel, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    (ObservabilityChannel::new(capacity, clock.clone()), clock)
}

#[test]
fn test_log_appends_entry_with_timestamp() {
    let (mut ch, clock) = channel(300);
    clock.advance(Duration::from_millis(1500));
    assert!(ch.log(LogCategory::Input, "intent", json!({ "pitch": 1 })));

    let entry = ch.entries().next().unwrap();
    assert_eq!(entry.category, LogCategory::Input);
    assert_eq!(entry.event, "intent");
    assert_eq!(entry.payload["pitch"], 1);
    assert!((entry.time_ms - 1500.0).abs() < 1e-9);
}

#[test]
fn test_ring_buffer_evicts_oldest() {
    let (mut ch, _) = channel(300);
    for i in 0..305 {
        ch.log(LogCategory::State, "tick", json!({ "i": i }));
    }
    assert_eq!(ch.len(), 300);
    assert_eq!(ch.evicted(), 5);
    assert_eq!(ch.entries().next().unwrap().payload["i"], 5);
    assert_eq!(ch.entries().last().unwrap().payload["i"], 304);
}

#[test]
fn test_zero_capacity_keeps_one_entry() {
    let (mut ch, _) = channel(0);
    ch.log(LogCategory::State, "a", json!({}));
    ch.log(LogCategory::State, "b", json!({}));
    assert_eq!(ch.capacity(), 1);
    assert_eq!(ch.entries().next().unwrap().event, "b");
}

#[test]
fn test_category_filter_blocks_entry() {
    let (mut ch, _) = channel(300);
    ch.set_category(LogCategory::Anomaly, false);
    assert!(!ch.log(LogCategory::Anomaly, "inverted", json!({})));
    assert!(ch.log(LogCategory::ZeroCross, "zero_cross", json!({})));
    assert_eq!(ch.len(), 1);
}

#[test]
fn test_logging_toggle_overrides_categories() {
    let (mut ch, _) = channel(300);
    ch.set_logging_enabled(false);
    assert!(!ch.accepts(LogCategory::Session));
    assert!(!ch.log(LogCategory::Session, "start", json!({})));
    // Filters survive the toggle.
    assert!(ch.is_category_enabled(LogCategory::Session));
    ch.set_logging_enabled(true);
    assert!(ch.log(LogCategory::Session, "start", json!({})));
}

#[test]
fn test_feature_flag_overrides_everything() {
    let (mut ch, _) = channel(300);
    ch.set_feature_enabled(false);
    assert!(!ch.log(LogCategory::Session, "start", json!({})));
    ch.snapshot_hud([("pitch", "1.0")]);
    assert_eq!(ch.hud_text(), "");
    assert!(!ch.maybe_snapshot(|| json!({})));
    assert!(ch.is_empty());
}

#[test]
fn test_preset_replaces_whole_map() {
    let (mut ch, _) = channel(300);
    ch.set_category(LogCategory::Input, false);
    ch.apply_preset(LogPreset::Minimal);
    assert!(ch.accepts(LogCategory::Altitude));
    assert!(ch.accepts(LogCategory::Snapshot));
    assert!(!ch.accepts(LogCategory::Input));
    assert!(!ch.accepts(LogCategory::ZeroCross));

    ch.apply_preset(LogPreset::Full);
    assert!(ch.accepts(LogCategory::Input));
}

#[test]
fn test_custom_filter_map_missing_categories_disabled() {
    let (mut ch, _) = channel(300);
    ch.set_filters([(LogCategory::Camera, true)].into_iter().collect());
    assert!(ch.accepts(LogCategory::Camera));
    assert!(!ch.accepts(LogCategory::Altitude));
}

#[test]
fn test_snapshot_interval() {
    let (mut ch, clock) = channel(300);
    assert!(ch.maybe_snapshot(|| json!({ "n": 0 })));
    clock.advance(Duration::from_millis(100));
    assert!(!ch.maybe_snapshot(|| json!({ "n": 1 })));
    clock.advance(Duration::from_millis(100));
    assert!(ch.maybe_snapshot(|| json!({ "n": 2 })));
    clock.advance(Duration::from_millis(199));
    assert!(!ch.maybe_snapshot(|| json!({ "n": 3 })));

    let ns: Vec<_> = ch.events_named("snapshot").map(|e| e.payload["n"].clone()).collect();
    assert_eq!(ns, vec![json!(0), json!(2)]);
}

#[test]
fn test_snapshot_payload_not_built_when_filtered() {
    let (mut ch, _) = channel(300);
    ch.set_category(LogCategory::Snapshot, false);
    let stored = ch.maybe_snapshot(|| panic!("payload should not be evaluated"));
    assert!(!stored);
    // The timer restarted anyway.
    assert!(!ch.snapshot_due());
}

#[test]
fn test_hud_snapshot() {
    let (mut ch, _) = channel(300);
    ch.snapshot_hud([("alt", "unknown"), ("speed", "0.36")]);
    assert_eq!(ch.hud_text(), "alt: unknown\nspeed: 0.36");
    assert_eq!(ch.hud().get("speed"), Some("0.36"));
}

#[test]
fn test_hud_unaffected_by_logging_toggle() {
    let (mut ch, _) = channel(300);
    ch.set_logging_enabled(false);
    ch.snapshot_hud([("alt", "12.0")]);
    assert_eq!(ch.hud_text(), "alt: 12.0");
}

#[test]
fn test_from_config() {
    let config = DebugConfig {
        preset: "minimal".to_string(),
        log_capacity: 5000,
        snapshot_interval_ms: 50,
        logging: false,
        ..DebugConfig::default()
    };
    let ch = ObservabilityChannel::from_config(&config, Arc::new(ManualClock::new())).unwrap();
    assert_eq!(ch.capacity(), 3000);
    assert_eq!(ch.snapshot_interval(), Duration::from_millis(50));
    assert!(!ch.is_logging_enabled());
    assert!(!ch.is_category_enabled(LogCategory::Input));
}

#[test]
fn test_from_config_unknown_preset() {
    let config = DebugConfig {
        preset: "everything".to_string(),
        ..DebugConfig::default()
    };
    let result = ObservabilityChannel::from_config(&config, Arc::new(ManualClock::new()));
    assert!(matches!(result, Err(DebugError::UnknownPreset(_))));
}

#[test]
fn test_export_json_parses_back() {
    let (mut ch, _) = channel(300);
    ch.log(LogCategory::ZeroCross, "zero_cross", json!({ "axis": "pitch" }));
    ch.log(LogCategory::Anomaly, "inverted_flight", json!({ "axis": "roll" }));

    let exported = ch.export_json().unwrap();
    let entries: Vec<LogEntry> = serde_json::from_str(&exported).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].category, LogCategory::Anomaly);

    let raw: serde_json::Value = serde_json::from_str(&exported).unwrap();
    assert_eq!(raw[0]["category"], "zero_cross");
}

#[test]
fn test_export_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join(crate::DEFAULT_EXPORT_FILE);
    let (mut ch, _) = channel(300);
    ch.log(LogCategory::Session, "start", json!({ "aircraft": "balanced" }));
    ch.export_to_file(&path).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("\"aircraft\": \"balanced\""));
}

#[test]
fn test_handle_shared_between_threads() {
    let handle = ChannelHandle::with_clock(3000, Arc::new(ManualClock::new()));
    let workers: Vec<_> = (0..4)
        .map(|t| {
            let h = handle.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    h.log(LogCategory::State, "tick", json!({ "t": t, "i": i }));
                }
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }
    assert_eq!(handle.lock().len(), 400);
}

#[test]
fn test_handle_clock_reading() {
    let clock = Arc::new(ManualClock::new());
    let handle = ChannelHandle::with_clock(300, clock.clone());
    clock.advance(Duration::from_secs(2));
    assert_eq!(handle.now(), Duration::from_secs(2));
}
