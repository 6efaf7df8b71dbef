//! Fallback utility bundle.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{error, info, warn};

use modfed_core::ports::{
    EventBusPort, EventHandler, KeyValueStoragePort, LogLevel, Subscription, UtilityBundle,
};

/// An event bus with nowhere to deliver.
///
/// Without the provider bus there are no cross-application subscribers:
/// publishes are dropped and subscriptions never fire. Callers keep their
/// code paths; the events simply stay local noise.
#[derive(Debug, Clone, Default)]
pub struct NoopEventBus;

impl NoopEventBus {
    /// Create a new no-op bus.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EventBusPort for NoopEventBus {
    fn publish(&self, _topic: &str, _payload: &Value) {
        // Intentionally do nothing
    }

    fn subscribe(&self, _topic: &str, _handler: EventHandler) -> Subscription {
        Subscription::inert()
    }
}

/// In-process key-value storage.
///
/// The pass-through target when no platform storage is wired in: values
/// live for the process lifetime only.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStoragePort for MemoryStorage {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.entries.lock().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) -> Option<Value> {
        self.entries.lock().remove(key)
    }
}

/// The fallback utility bundle.
///
/// Satisfies the provider bundle's call signatures with locally available
/// primitives: `format!` for currency, `chrono` for dates, `tracing` for
/// structured logs, [`NoopEventBus`], and [`MemoryStorage`].
pub struct FallbackUtils {
    events: Arc<NoopEventBus>,
    storage: Arc<MemoryStorage>,
}

impl FallbackUtils {
    /// Create a new bundle with empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(NoopEventBus::new()),
            storage: Arc::new(MemoryStorage::new()),
        }
    }
}

impl Default for FallbackUtils {
    fn default() -> Self {
        Self::new()
    }
}

impl UtilityBundle for FallbackUtils {
    fn format_currency(&self, amount: f64) -> String {
        let sign = if amount < 0.0 { "-" } else { "" };
        format!("{sign}${:.2}", amount.abs())
    }

    fn format_date(&self, when: DateTime<Utc>) -> String {
        when.format("%b %-d, %Y").to_string()
    }

    fn log(&self, level: LogLevel, message: &str, context: Option<&Value>) {
        let context = context.map(Value::to_string).unwrap_or_default();
        match level {
            LogLevel::Info => info!(target: "modfed::utils", context = %context, "{message}"),
            LogLevel::Warn => warn!(target: "modfed::utils", context = %context, "{message}"),
            LogLevel::Error => error!(target: "modfed::utils", context = %context, "{message}"),
        }
    }

    fn events(&self) -> Arc<dyn EventBusPort> {
        self.events.clone()
    }

    fn storage(&self) -> Arc<dyn KeyValueStoragePort> {
        self.storage.clone()
    }
}
