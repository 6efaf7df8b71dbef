//! In-process provider container resolution.
//!
//! This module resolves module specifiers against a registry populated by
//! provider code running in the same process, using the
//! [`ModuleResolverPort`] abstraction. It is the composition root's
//! resolver of choice for demos and for hosts that embed their providers;
//! remote-container transports implement the same port elsewhere.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;

use modfed_core::ports::{ModuleResolverPort, RemoteModule, ResolveError};

/// Resolver backed by an in-process module registry.
///
/// Providers call [`RegistryResolver::register`] with the specifiers they
/// export; unresolved specifiers fail with [`ResolveError::NotFound`]. An
/// optional warm-up failure count simulates a provider container that is
/// still starting, which exercises the loader's retry path end to end.
#[derive(Default)]
pub struct RegistryResolver {
    modules: RwLock<IndexMap<String, RemoteModule>>,
    warmup_failures: AtomicU32,
}

impl RegistryResolver {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first `count` resolve calls with a container error before
    /// the registry starts answering.
    #[must_use]
    pub fn with_warmup_failures(self, count: u32) -> Self {
        self.warmup_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Register (or replace) a module under a specifier.
    pub fn register(&self, specifier: impl Into<String>, module: RemoteModule) {
        self.modules.write().insert(specifier.into(), module);
    }

    /// Specifiers currently registered, in registration order.
    #[must_use]
    pub fn registered_specifiers(&self) -> Vec<String> {
        self.modules.read().keys().cloned().collect()
    }
}

#[async_trait]
impl ModuleResolverPort for RegistryResolver {
    async fn resolve(&self, specifier: &str) -> Result<RemoteModule, ResolveError> {
        let warming_up = self
            .warmup_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok();
        if warming_up {
            return Err(ResolveError::container(
                "provider container is still starting",
            ));
        }

        self.modules
            .read()
            .get(specifier)
            .cloned()
            .ok_or_else(|| ResolveError::not_found(specifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LocalStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_unregistered_specifier_is_not_found() {
        let resolver = RegistryResolver::new();
        let err = resolver.resolve("provider/store").await.unwrap_err();
        assert_eq!(err, ResolveError::not_found("provider/store"));
    }

    #[tokio::test]
    async fn test_registered_module_resolves() {
        let resolver = RegistryResolver::new();
        resolver.register(
            "provider/store",
            RemoteModule::default_store(Arc::new(LocalStore::new())),
        );

        let module = resolver.resolve("provider/store").await.unwrap();
        assert!(module.default_export.is_some());
        assert_eq!(resolver.registered_specifiers(), vec!["provider/store"]);
    }

    #[tokio::test]
    async fn test_warmup_failures_then_success() {
        let resolver = RegistryResolver::new().with_warmup_failures(2);
        resolver.register(
            "provider/store",
            RemoteModule::default_store(Arc::new(LocalStore::new())),
        );

        assert!(matches!(
            resolver.resolve("provider/store").await,
            Err(ResolveError::Container { .. })
        ));
        assert!(matches!(
            resolver.resolve("provider/store").await,
            Err(ResolveError::Container { .. })
        ));
        assert!(resolver.resolve("provider/store").await.is_ok());
    }
}
