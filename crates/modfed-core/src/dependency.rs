//! Names of the shared dependencies the loader knows how to acquire.

use serde::{Deserialize, Serialize};

/// Identifies a shared dependency supplied by a remote provider.
///
/// Each name has its own module specifier, its own fallback construction,
/// and its own memoized slot in the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyName {
    /// The shared state store.
    Store,
    /// The shared utility bundle.
    Utils,
}

impl DependencyName {
    /// Stable string form used in logs and events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Store => "store",
            Self::Utils => "utils",
        }
    }
}

impl std::fmt::Display for DependencyName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_forms() {
        assert_eq!(DependencyName::Store.as_str(), "store");
        assert_eq!(DependencyName::Utils.to_string(), "utils");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&DependencyName::Store).unwrap();
        assert_eq!(json, "\"store\"");

        let parsed: DependencyName = serde_json::from_str("\"utils\"").unwrap();
        assert_eq!(parsed, DependencyName::Utils);
    }
}
