//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the loader expects from its environment.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No transport or container mechanism in any signature
//! - The resolver port has exactly one method; the remote-container protocol
//!   behind it is swappable and mockable without touching retry policy
//! - Fallback implementations live in `modfed-loader`, not here

pub mod event_emitter;
pub mod resolver;
pub mod store;
pub mod utils;

pub use event_emitter::{LoaderEventEmitterPort, NoopLoaderEmitter};
pub use resolver::{ModuleExport, ModuleResolverPort, RemoteModule, ResolveError};
pub use store::{Listener, Reducer, SharedStore, Subscription};
pub use utils::{EventBusPort, EventHandler, KeyValueStoragePort, LogLevel, UtilityBundle};
