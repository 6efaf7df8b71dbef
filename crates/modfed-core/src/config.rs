//! Loader configuration.
//!
//! These are pure configuration types with no infrastructure dependencies.
//! Defaults match the repository's fixed acquisition policy: three attempts
//! with a one-second fixed delay between them.

use std::time::Duration;

use crate::dependency::DependencyName;

/// Default retry ceiling for a single acquisition sequence.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default fixed delay between acquisition attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Default module specifier for the shared store.
pub const DEFAULT_STORE_SPECIFIER: &str = "provider/store";

/// Default module specifier for the shared utility bundle.
pub const DEFAULT_UTILS_SPECIFIER: &str = "provider/utils";

/// Configuration for a [`crate::ports::ModuleResolverPort`]-backed loader.
///
/// The retry ceiling and delay are deliberately plain inputs rather than
/// per-call parameters: one loader instance applies one policy to every
/// dependency it manages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Module specifier resolved for the shared store.
    pub store_specifier: String,
    /// Module specifier resolved for the shared utility bundle.
    pub utils_specifier: String,
    /// Maximum resolution attempts per acquisition sequence.
    pub max_attempts: u32,
    /// Fixed delay between attempts (no backoff, no jitter).
    pub retry_delay: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            store_specifier: DEFAULT_STORE_SPECIFIER.to_string(),
            utils_specifier: DEFAULT_UTILS_SPECIFIER.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl LoaderConfig {
    /// Create a config with the default policy and specifiers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the module specifier for the shared store.
    #[must_use]
    pub fn with_store_specifier(mut self, specifier: impl Into<String>) -> Self {
        self.store_specifier = specifier.into();
        self
    }

    /// Set the module specifier for the shared utility bundle.
    #[must_use]
    pub fn with_utils_specifier(mut self, specifier: impl Into<String>) -> Self {
        self.utils_specifier = specifier.into();
        self
    }

    /// Set the retry ceiling. A ceiling of zero is clamped to one attempt.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = if max_attempts == 0 { 1 } else { max_attempts };
        self
    }

    /// Set the fixed inter-attempt delay.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Get the module specifier for a dependency.
    #[must_use]
    pub fn specifier(&self, dependency: DependencyName) -> &str {
        match dependency {
            DependencyName::Store => &self.store_specifier,
            DependencyName::Utils => &self.utils_specifier,
        }
    }
}
