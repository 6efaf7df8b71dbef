//! Core domain types and port definitions for modfed.
//!
//! This crate holds the vocabulary shared by every adapter: the shared-store
//! data model (actions, state snapshots), the cart/catalog domain types, the
//! port traits the loader depends on, the canonical loader event union, and
//! the loader configuration. It contains no acquisition policy and no
//! fallback implementations.

pub mod config;
pub mod dependency;
pub mod domain;
pub mod events;
pub mod ports;
pub mod store;

// Re-export commonly used types for convenience
pub use config::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, DEFAULT_STORE_SPECIFIER, DEFAULT_UTILS_SPECIFIER,
    LoaderConfig,
};
pub use dependency::DependencyName;
pub use domain::{CartItem, CartState, CatalogState, Product};
pub use events::LoaderEvent;
pub use ports::{
    EventBusPort, EventHandler, KeyValueStoragePort, Listener, LoaderEventEmitterPort, LogLevel,
    ModuleExport, ModuleResolverPort, NoopLoaderEmitter, Reducer, RemoteModule, ResolveError,
    SharedStore, Subscription, UtilityBundle,
};
pub use store::{Action, StateSnapshot, slices};
