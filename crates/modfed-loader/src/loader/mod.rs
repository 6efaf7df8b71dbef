//! Remote dependency loader.
//!
//! The loader acquires named shared dependencies from a remote provider
//! through the injected [`ModuleResolverPort`], with bounded retries, a
//! fixed inter-attempt delay, in-flight request coalescing, and a local
//! fallback once the retry ceiling is exhausted.
//!
//! # Degrade-not-fail
//!
//! No acquisition failure ever reaches a caller: `load_store` and
//! `load_utils` always fulfill. The only observable signals of a failed
//! acquisition are warning logs, emitted [`LoaderEvent`]s, and the
//! `using_fallback` flag on the returned handle — the consuming application
//! decides how (and whether) to present degraded mode.
//!
//! # Concurrency Model
//!
//! - One memoized slot per dependency, `Idle → InFlight → Resolved`
//! - Concurrent callers coalesce onto one attempt sequence per slot
//! - The sequence runs in a spawned task, so caller cancellation cannot
//!   abandon a half-run sequence or strand coalesced waiters
//! - Attempts within a sequence are strictly sequential

mod slot;

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, error, warn};

use modfed_core::ports::{
    LoaderEventEmitterPort, ModuleExport, ModuleResolverPort, NoopLoaderEmitter, RemoteModule,
    ResolveError, SharedStore, UtilityBundle,
};
use modfed_core::{DependencyName, LoaderConfig, LoaderEvent};

use crate::fallback::{fallback_store, fallback_utils};
use slot::{DependencySlot, SlotClaim};

/// A resolved dependency handle.
///
/// `value` is the provider's real implementation when acquisition
/// succeeded, or the local substitute when it did not; `using_fallback`
/// tells the consumer which, so it can render a degraded-mode notice.
#[derive(Clone)]
pub struct LoadedDependency<T> {
    /// The acquired object.
    pub value: T,
    /// True if `value` is the degraded substitute.
    pub using_fallback: bool,
}

impl<T> std::fmt::Debug for LoadedDependency<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedDependency")
            .field("using_fallback", &self.using_fallback)
            .finish_non_exhaustive()
    }
}

/// The shared store handle returned by [`RemoteLoader::load_store`].
pub type LoadedStore = LoadedDependency<Arc<dyn SharedStore>>;

/// The utility bundle handle returned by [`RemoteLoader::load_utils`].
pub type LoadedUtils = LoadedDependency<Arc<dyn UtilityBundle>>;

/// Internal outcome of one acquisition attempt.
///
/// The retry loop pattern-matches on this instead of unwinding, which keeps
/// the "never throw to the caller" contract visible at the one place
/// failures are handled.
#[derive(Debug, Clone, Error)]
enum AcquireError {
    /// The resolver failed outright.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The import resolved but the value lacks the expected shape.
    #[error("Shape mismatch for {specifier}: expected {expected}, found {found}")]
    ShapeMismatch {
        /// The specifier whose module failed validation.
        specifier: String,
        /// What the dependency requires.
        expected: &'static str,
        /// What the module actually carried.
        found: String,
    },
}

impl AcquireError {
    fn shape_mismatch(specifier: &str, expected: &'static str, found: String) -> Self {
        Self::ShapeMismatch {
            specifier: specifier.to_string(),
            expected,
            found,
        }
    }
}

/// Loader for shared dependencies supplied by a remote provider.
///
/// An explicit, constructible object: instantiate one per process (or one
/// per test) and share it by `Arc`. Both dependency slots are lazy — no
/// resolution happens until the first `load_*` call.
pub struct RemoteLoader {
    resolver: Arc<dyn ModuleResolverPort>,
    emitter: Arc<dyn LoaderEventEmitterPort>,
    config: LoaderConfig,
    store_slot: DependencySlot<LoadedStore>,
    utils_slot: DependencySlot<LoadedUtils>,
}

impl RemoteLoader {
    /// Create a loader with the given resolver and config, without event
    /// emission (tracing logs only).
    #[must_use]
    pub fn new(resolver: Arc<dyn ModuleResolverPort>, config: LoaderConfig) -> Self {
        Self::with_event_emitter(resolver, config, Arc::new(NoopLoaderEmitter::new()))
    }

    /// Create a loader that also reports lifecycle events through `emitter`.
    #[must_use]
    pub fn with_event_emitter(
        resolver: Arc<dyn ModuleResolverPort>,
        config: LoaderConfig,
        emitter: Arc<dyn LoaderEventEmitterPort>,
    ) -> Self {
        Self {
            resolver,
            emitter,
            config,
            store_slot: DependencySlot::new(),
            utils_slot: DependencySlot::new(),
        }
    }

    /// The loader's configuration.
    #[must_use]
    pub const fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Acquire the shared store.
    ///
    /// Always fulfills: with the provider's store when it resolves to a
    /// structurally valid module within the retry ceiling, with the local
    /// fallback store otherwise. Concurrent calls share one attempt
    /// sequence; later calls return the memoized handle immediately.
    pub async fn load_store(&self) -> LoadedStore {
        self.load(
            &self.store_slot,
            DependencyName::Store,
            validate_store,
            fallback_store,
        )
        .await
    }

    /// Acquire the shared utility bundle.
    ///
    /// Same contract shape as [`RemoteLoader::load_store`], with its own
    /// specifier, slot, and fallback.
    pub async fn load_utils(&self) -> LoadedUtils {
        self.load(
            &self.utils_slot,
            DependencyName::Utils,
            validate_utils,
            fallback_utils,
        )
        .await
    }

    /// The memoized store handle, or `None` before acquisition concludes.
    ///
    /// Never triggers acquisition.
    #[must_use]
    pub fn get_store(&self) -> Option<LoadedStore> {
        self.store_slot.get()
    }

    /// The memoized utils handle, or `None` before acquisition concludes.
    ///
    /// Never triggers acquisition.
    #[must_use]
    pub fn get_utils(&self) -> Option<LoadedUtils> {
        self.utils_slot.get()
    }

    /// Whether the store slot has resolved (successfully or via fallback).
    #[must_use]
    pub fn is_store_loaded(&self) -> bool {
        self.store_slot.is_resolved()
    }

    /// Whether the utils slot has resolved (successfully or via fallback).
    #[must_use]
    pub fn is_utils_loaded(&self) -> bool {
        self.utils_slot.is_resolved()
    }

    async fn load<T>(
        &self,
        slot: &DependencySlot<LoadedDependency<T>>,
        dependency: DependencyName,
        validate: fn(RemoteModule, &str) -> Result<T, AcquireError>,
        fallback: fn() -> T,
    ) -> LoadedDependency<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        match slot.claim() {
            SlotClaim::Resolved(loaded) => loaded,
            SlotClaim::Waiter(rx) => Self::await_outcome(rx, dependency, fallback).await,
            SlotClaim::Runner { completion, rx } => {
                let resolver = self.resolver.clone();
                let emitter = self.emitter.clone();
                let specifier = self.config.specifier(dependency).to_string();
                let max_attempts = self.config.max_attempts.max(1);
                let retry_delay = self.config.retry_delay;

                tokio::spawn(async move {
                    let outcome = run_sequence(
                        &*resolver,
                        &*emitter,
                        dependency,
                        &specifier,
                        max_attempts,
                        retry_delay,
                        validate,
                        fallback,
                    )
                    .await;
                    completion.complete(outcome);
                });

                Self::await_outcome(rx, dependency, fallback).await
            }
        }
    }

    async fn await_outcome<T: Clone>(
        mut rx: watch::Receiver<Option<LoadedDependency<T>>>,
        dependency: DependencyName,
        fallback: fn() -> T,
    ) -> LoadedDependency<T> {
        let published = match rx.wait_for(|outcome| outcome.is_some()).await {
            Ok(outcome) => (*outcome).clone(),
            Err(_) => None,
        };

        published.unwrap_or_else(|| {
            // Only reachable if the sequence task died (runtime shutdown).
            // Serve the substitute rather than hang the caller.
            error!(
                dependency = %dependency,
                "acquisition sequence ended without publishing an outcome"
            );
            LoadedDependency {
                value: fallback(),
                using_fallback: true,
            }
        })
    }
}

/// Run one full acquisition sequence: bounded attempts with a fixed delay,
/// then fallback construction on exhaustion.
#[allow(clippy::too_many_arguments)]
async fn run_sequence<T>(
    resolver: &dyn ModuleResolverPort,
    emitter: &dyn LoaderEventEmitterPort,
    dependency: DependencyName,
    specifier: &str,
    max_attempts: u32,
    retry_delay: std::time::Duration,
    validate: fn(RemoteModule, &str) -> Result<T, AcquireError>,
    fallback: fn() -> T,
) -> LoadedDependency<T> {
    for attempt in 1..=max_attempts {
        match attempt_once(resolver, specifier, validate).await {
            Ok(value) => {
                debug!(
                    dependency = %dependency,
                    specifier,
                    attempt,
                    "remote dependency resolved"
                );
                emitter.emit(LoaderEvent::dependency_resolved(dependency, attempt, false));
                return LoadedDependency {
                    value,
                    using_fallback: false,
                };
            }
            Err(err) => {
                warn!(
                    dependency = %dependency,
                    specifier,
                    attempt,
                    max_attempts,
                    error = %err,
                    "acquisition attempt failed"
                );
                emitter.emit(LoaderEvent::attempt_failed(
                    dependency,
                    specifier,
                    attempt,
                    max_attempts,
                    err.to_string(),
                ));
                if attempt < max_attempts {
                    sleep(retry_delay).await;
                }
            }
        }
    }

    warn!(
        dependency = %dependency,
        specifier,
        attempts = max_attempts,
        "acquisition attempts exhausted, switching to fallback"
    );
    emitter.emit(LoaderEvent::attempts_exhausted(dependency, max_attempts));
    emitter.emit(LoaderEvent::fallback_activated(dependency));

    let outcome = LoadedDependency {
        value: fallback(),
        using_fallback: true,
    };
    emitter.emit(LoaderEvent::dependency_resolved(
        dependency,
        max_attempts,
        true,
    ));
    outcome
}

/// One acquisition attempt: resolve, then structurally validate.
async fn attempt_once<T>(
    resolver: &dyn ModuleResolverPort,
    specifier: &str,
    validate: fn(RemoteModule, &str) -> Result<T, AcquireError>,
) -> Result<T, AcquireError> {
    let module = resolver.resolve(specifier).await?;
    validate(module, specifier)
}

/// The store dependency requires a default-exported store.
fn validate_store(module: RemoteModule, specifier: &str) -> Result<Arc<dyn SharedStore>, AcquireError> {
    module
        .default_export
        .as_ref()
        .and_then(ModuleExport::as_store)
        .ok_or_else(|| {
            AcquireError::shape_mismatch(
                specifier,
                "a default-exported store",
                describe_module(&module),
            )
        })
}

/// The utils dependency accepts a default-exported bundle or a named export
/// carrying one; an empty module is invalid.
fn validate_utils(
    module: RemoteModule,
    specifier: &str,
) -> Result<Arc<dyn UtilityBundle>, AcquireError> {
    module
        .default_export
        .as_ref()
        .and_then(ModuleExport::as_utils)
        .or_else(|| module.named_exports.values().find_map(ModuleExport::as_utils))
        .ok_or_else(|| {
            AcquireError::shape_mismatch(
                specifier,
                "a utility bundle export",
                describe_module(&module),
            )
        })
}

fn describe_module(module: &RemoteModule) -> String {
    match &module.default_export {
        Some(export) => format!(
            "a default export of kind `{}` and {} named exports",
            export.kind_name(),
            module.named_exports.len()
        ),
        None if module.named_exports.is_empty() => "an empty module".to_string(),
        None => format!(
            "{} named exports and no default export",
            module.named_exports.len()
        ),
    }
}
