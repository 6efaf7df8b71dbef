//! Module resolver port definition.
//!
//! The resolver is the loader's only window onto the remote-container
//! mechanism: given a module specifier such as `provider/store`, it either
//! produces the provider's exports or fails. Everything else — retries,
//! structural validation, fallback — is loader policy layered on top.

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::store::SharedStore;
use super::utils::UtilityBundle;

/// Port for resolving a named remote module.
///
/// Implementations handle the container protocol (in-process registries,
/// federation runtimes, test doubles). One call is one attempt: the loader
/// owns retry and fallback policy, so implementations should fail fast
/// rather than retry internally.
#[async_trait]
pub trait ModuleResolverPort: Send + Sync {
    /// Resolve a module specifier to the provider's exports.
    async fn resolve(&self, specifier: &str) -> Result<RemoteModule, ResolveError>;
}

/// One export of a resolved module.
///
/// Exports are live objects, not serialized data: a provider hands over the
/// actual store it runs, so every consumer shares one state container.
#[derive(Clone)]
pub enum ModuleExport {
    /// A shared state store.
    Store(Arc<dyn SharedStore>),
    /// A shared utility bundle.
    Utils(Arc<dyn UtilityBundle>),
    /// Plain data the loader has no typed handle for.
    Value(Value),
}

impl ModuleExport {
    /// The store behind this export, if it is one.
    #[must_use]
    pub fn as_store(&self) -> Option<Arc<dyn SharedStore>> {
        match self {
            Self::Store(store) => Some(store.clone()),
            Self::Utils(_) | Self::Value(_) => None,
        }
    }

    /// The utility bundle behind this export, if it is one.
    #[must_use]
    pub fn as_utils(&self) -> Option<Arc<dyn UtilityBundle>> {
        match self {
            Self::Utils(utils) => Some(utils.clone()),
            Self::Store(_) | Self::Value(_) => None,
        }
    }

    /// Short label for logs and shape-mismatch messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Store(_) => "store",
            Self::Utils(_) => "utils",
            Self::Value(_) => "value",
        }
    }
}

impl std::fmt::Debug for ModuleExport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(_) => f.write_str("Store(..)"),
            Self::Utils(_) => f.write_str("Utils(..)"),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

/// A resolved module, prior to structural validation.
///
/// Mirrors a module record: an optional default export plus named exports in
/// declaration order. An empty module is representable on purpose — a
/// resolver can "succeed" with nothing usable in it, and the loader treats
/// that the same as a resolution failure.
#[derive(Debug, Clone, Default)]
pub struct RemoteModule {
    /// The provider's default export, if any.
    pub default_export: Option<ModuleExport>,
    /// Named exports keyed by symbol, in declaration order.
    pub named_exports: IndexMap<String, ModuleExport>,
}

impl RemoteModule {
    /// A module with no exports at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A module whose default export is a store.
    #[must_use]
    pub fn default_store(store: Arc<dyn SharedStore>) -> Self {
        Self {
            default_export: Some(ModuleExport::Store(store)),
            named_exports: IndexMap::new(),
        }
    }

    /// A module whose default export is a utility bundle.
    #[must_use]
    pub fn default_utils(utils: Arc<dyn UtilityBundle>) -> Self {
        Self {
            default_export: Some(ModuleExport::Utils(utils)),
            named_exports: IndexMap::new(),
        }
    }

    /// A module whose default export is plain data.
    #[must_use]
    pub fn default_value(value: Value) -> Self {
        Self {
            default_export: Some(ModuleExport::Value(value)),
            named_exports: IndexMap::new(),
        }
    }

    /// Add a named export.
    #[must_use]
    pub fn with_named(mut self, name: impl Into<String>, export: ModuleExport) -> Self {
        self.named_exports.insert(name.into(), export);
        self
    }

    /// Whether the module exports nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.default_export.is_none() && self.named_exports.is_empty()
    }
}

/// Error type for module resolution.
///
/// Designed to be serializable across process boundaries without depending
/// on non-serializable error types; container and transport errors are
/// captured as strings.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ResolveError {
    /// No provider exposes the requested module.
    #[error("Module not found: {specifier}")]
    NotFound {
        /// The specifier that failed to resolve.
        specifier: String,
    },

    /// The provider container failed to initialize.
    #[error("Container error: {message}")]
    Container {
        /// Detailed error message.
        message: String,
    },

    /// Network or bundle failure while loading the module.
    #[error("Load failed for {specifier}: {message}")]
    LoadFailed {
        /// The specifier being loaded.
        specifier: String,
        /// Detailed error message.
        message: String,
    },
}

impl ResolveError {
    /// Create a not found error.
    pub fn not_found(specifier: impl Into<String>) -> Self {
        Self::NotFound {
            specifier: specifier.into(),
        }
    }

    /// Create a container error.
    pub fn container(message: impl Into<String>) -> Self {
        Self::Container {
            message: message.into(),
        }
    }

    /// Create a load failure.
    pub fn load_failed(specifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LoadFailed {
            specifier: specifier.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_module() {
        let module = RemoteModule::empty();
        assert!(module.is_empty());
        assert!(module.default_export.is_none());
    }

    #[test]
    fn test_named_exports_keep_order() {
        let module = RemoteModule::empty()
            .with_named("formatCurrency", ModuleExport::Value(Value::Null))
            .with_named("formatDate", ModuleExport::Value(Value::Null));

        let names: Vec<_> = module.named_exports.keys().cloned().collect();
        assert_eq!(names, vec!["formatCurrency", "formatDate"]);
        assert!(!module.is_empty());
    }

    #[test]
    fn test_value_export_is_not_a_store() {
        let export = ModuleExport::Value(serde_json::json!({}));
        assert!(export.as_store().is_none());
        assert!(export.as_utils().is_none());
        assert_eq!(export.kind_name(), "value");
    }

    #[test]
    fn test_error_serialization() {
        let err = ResolveError::load_failed("provider/store", "connection refused");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("provider/store"));
        assert!(json.contains("connection refused"));

        let parsed: ResolveError = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, err);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ResolveError::not_found("provider/store").to_string(),
            "Module not found: provider/store"
        );
        assert_eq!(
            ResolveError::container("script error").to_string(),
            "Container error: script error"
        );
    }

    struct AlwaysMissing;

    #[async_trait]
    impl ModuleResolverPort for AlwaysMissing {
        async fn resolve(&self, specifier: &str) -> Result<RemoteModule, ResolveError> {
            Err(ResolveError::not_found(specifier))
        }
    }

    #[tokio::test]
    async fn test_port_is_object_safe() {
        let resolver: Arc<dyn ModuleResolverPort> = Arc::new(AlwaysMissing);
        let err = resolver.resolve("provider/store").await.unwrap_err();
        assert_eq!(err, ResolveError::not_found("provider/store"));
    }
}
