//! Utility bundle port definition.
//!
//! Providers export a bundle of low-risk helpers (formatting, logging, an
//! event bus, key-value persistence). The trait pins the call signatures so
//! consumers behave identically against the provider bundle and the local
//! fallback, modulo feature completeness.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::store::Subscription;

/// Severity for structured log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Informational.
    Info,
    /// Something degraded but recoverable.
    Warn,
    /// Something failed.
    Error,
}

impl LogLevel {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handler invoked with a topic and payload for each published event.
pub type EventHandler = Arc<dyn Fn(&str, &Value) + Send + Sync>;

/// Publish/subscribe bus shared between applications.
pub trait EventBusPort: Send + Sync {
    /// Publish an event to a topic.
    fn publish(&self, topic: &str, payload: &Value);

    /// Register a handler for a topic. The returned handle unsubscribes it.
    fn subscribe(&self, topic: &str, handler: EventHandler) -> Subscription;
}

/// String-key to JSON-value persistence helper.
///
/// No schema beyond "string key, JSON-serializable value"; implementations
/// pass through to whatever local storage primitive the host provides.
pub trait KeyValueStoragePort: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Option<Value>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: Value);

    /// Delete a value, returning it if it was present.
    fn remove(&self, key: &str) -> Option<Value>;
}

/// The shared utility bundle contract.
pub trait UtilityBundle: Send + Sync {
    /// Format an amount as a currency string, e.g. `$12.34`.
    fn format_currency(&self, amount: f64) -> String;

    /// Format a timestamp for display, e.g. `Aug 7, 2026`.
    fn format_date(&self, when: DateTime<Utc>) -> String;

    /// Emit a structured log entry.
    fn log(&self, level: LogLevel, message: &str, context: Option<&Value>);

    /// The bundle's event bus.
    fn events(&self) -> Arc<dyn EventBusPort>;

    /// The bundle's key-value persistence helper.
    fn storage(&self) -> Arc<dyn KeyValueStoragePort>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_strings() {
        assert_eq!(LogLevel::Info.as_str(), "info");
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(
            serde_json::to_string(&LogLevel::Error).unwrap(),
            "\"error\""
        );
    }
}
