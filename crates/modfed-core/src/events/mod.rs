//! Canonical event union for loader lifecycle events.
//!
//! This module is the single source of truth for the events the loader
//! reports while acquiring remote dependencies. Emitters and sinks on every
//! transport subscribe to these shapes.
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag for cross-application
//! compatibility:
//!
//! ```json
//! { "type": "attempt_failed", "dependency": "store", "attempt": 1, ... }
//! ```

use serde::{Deserialize, Serialize};

use crate::dependency::DependencyName;

/// Canonical loader event types.
///
/// This enum covers the acquisition lifecycle: failed attempts, ceiling
/// exhaustion, fallback activation, and final resolution. Each variant
/// includes all necessary context for the event to be self-describing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoaderEvent {
    /// A single acquisition attempt failed; the loader may retry.
    AttemptFailed {
        /// Dependency being acquired.
        dependency: DependencyName,
        /// Module specifier that failed to resolve.
        specifier: String,
        /// 1-based attempt number.
        attempt: u32,
        /// The configured retry ceiling.
        #[serde(rename = "maxAttempts")]
        max_attempts: u32,
        /// Failure description.
        error: String,
    },

    /// The retry ceiling was reached with no structurally valid result.
    AttemptsExhausted {
        /// Dependency being acquired.
        dependency: DependencyName,
        /// Number of attempts made.
        attempts: u32,
    },

    /// The local fallback was constructed and memoized.
    FallbackActivated {
        /// Dependency now served by its fallback.
        dependency: DependencyName,
    },

    /// Acquisition concluded and the dependency slot is resolved.
    DependencyResolved {
        /// Dependency that resolved.
        dependency: DependencyName,
        /// 1-based attempt the sequence ended on.
        attempt: u32,
        /// Whether the resolved value is the degraded substitute.
        #[serde(rename = "usingFallback")]
        using_fallback: bool,
    },
}

impl LoaderEvent {
    /// Create an attempt-failed event.
    pub fn attempt_failed(
        dependency: DependencyName,
        specifier: impl Into<String>,
        attempt: u32,
        max_attempts: u32,
        error: impl Into<String>,
    ) -> Self {
        Self::AttemptFailed {
            dependency,
            specifier: specifier.into(),
            attempt,
            max_attempts,
            error: error.into(),
        }
    }

    /// Create an exhaustion event.
    #[must_use]
    pub const fn attempts_exhausted(dependency: DependencyName, attempts: u32) -> Self {
        Self::AttemptsExhausted {
            dependency,
            attempts,
        }
    }

    /// Create a fallback-activated event.
    #[must_use]
    pub const fn fallback_activated(dependency: DependencyName) -> Self {
        Self::FallbackActivated { dependency }
    }

    /// Create a resolved event.
    #[must_use]
    pub const fn dependency_resolved(
        dependency: DependencyName,
        attempt: u32,
        using_fallback: bool,
    ) -> Self {
        Self::DependencyResolved {
            dependency,
            attempt,
            using_fallback,
        }
    }

    /// Get the event name for wire protocols.
    ///
    /// This provides consistent event naming across transports.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::AttemptFailed { .. } => "loader:attempt_failed",
            Self::AttemptsExhausted { .. } => "loader:exhausted",
            Self::FallbackActivated { .. } => "loader:fallback_activated",
            Self::DependencyResolved { .. } => "loader:resolved",
        }
    }
}
