//! Shared, cloneable access to one [`ObservabilityChannel`].

use crate::category::LogCategory;
use crate::channel::ObservabilityChannel;
use crate::clock::Clock;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Handle passed to every producer of recorder events.
///
/// Append and eviction happen under one lock, so producers on different
/// threads cannot interleave them. All methods are fire-and-forget: a
/// poisoned lock is recovered rather than propagated, so logging never panics.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    inner: Arc<Mutex<ObservabilityChannel>>,
}

impl ChannelHandle {
    /// Wrap a channel.
    #[must_use]
    pub fn new(channel: ObservabilityChannel) -> Self {
        Self {
            inner: Arc::new(Mutex::new(channel)),
        }
    }

    /// A handle around a fresh channel, mostly useful in tests.
    #[must_use]
    pub fn with_clock(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self::new(ObservabilityChannel::new(capacity, clock))
    }

    /// Lock the channel for direct access.
    pub fn lock(&self) -> MutexGuard<'_, ObservabilityChannel> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// See [`ObservabilityChannel::log`].
    pub fn log(&self, category: LogCategory, event: &str, payload: Value) -> bool {
        self.lock().log(category, event, payload)
    }

    /// Whether `category` would currently be recorded, so producers can skip
    /// building payloads nobody will store.
    #[must_use]
    pub fn accepts(&self, category: LogCategory) -> bool {
        self.lock().accepts(category)
    }

    /// See [`ObservabilityChannel::snapshot_hud`].
    pub fn snapshot_hud<I, K, V>(&self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.lock().snapshot_hud(pairs);
    }

    /// See [`ObservabilityChannel::maybe_snapshot`].
    pub fn maybe_snapshot(&self, payload: impl FnOnce() -> Value) -> bool {
        self.lock().maybe_snapshot(payload)
    }

    /// Current reading of the channel clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.lock().now()
    }
}
