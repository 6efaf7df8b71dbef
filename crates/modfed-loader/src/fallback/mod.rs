//! Local substitutes for remote dependencies.
//!
//! Constructed when an acquisition sequence exhausts its retry ceiling.
//! Both factories use only locally available primitives — a degraded
//! process must never depend on the provider it just failed to reach.

mod utils;

use std::sync::Arc;

use modfed_core::ports::{SharedStore, UtilityBundle};

use crate::store::LocalStore;

pub use utils::{FallbackUtils, MemoryStorage, NoopEventBus};

/// Build the fallback store.
///
/// The store understands the same actions the provider store dispatches
/// (at minimum `cart/addItem`), so writes from a degraded consumer still
/// produce a locally-consistent snapshot — just not one shared across
/// applications.
#[must_use]
pub fn fallback_store() -> Arc<dyn SharedStore> {
    Arc::new(LocalStore::new())
}

/// Build the fallback utility bundle.
#[must_use]
pub fn fallback_utils() -> Arc<dyn UtilityBundle> {
    Arc::new(FallbackUtils::new())
}
