//! Remote dependency acquisition for modfed.
//!
//! This crate implements the loader policy on top of the ports defined in
//! `modfed-core`:
//!
//! - `loader` - the retry/coalescing/fallback acquisition policy
//! - `store` - the in-process state container and default reducer
//! - `fallback` - local substitutes used when a provider cannot be acquired
//! - `resolver` - an in-process provider-container resolver adapter
//!
//! The loader never surfaces an acquisition failure to its caller: every
//! `load_*` call fulfills with either the provider's implementation or a
//! locally-constructed fallback, so a consuming application can always
//! render.

pub mod fallback;
pub mod loader;
pub mod resolver;
pub mod store;

pub use fallback::{FallbackUtils, MemoryStorage, NoopEventBus, fallback_store, fallback_utils};
pub use loader::{LoadedDependency, LoadedStore, LoadedUtils, RemoteLoader};
pub use resolver::RegistryResolver;
pub use store::{LocalStore, default_reducer, initial_state};
