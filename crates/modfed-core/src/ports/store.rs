//! Shared store port definition.
//!
//! The shared store is the cross-application state container. Providers
//! export a live store object; consumers written against this trait behave
//! identically whether they hold the provider's store or the local fallback.

use std::sync::Arc;

use crate::store::{Action, StateSnapshot};

/// A change listener invoked after each dispatch with the committed state.
pub type Listener = Arc<dyn Fn(&StateSnapshot) + Send + Sync>;

/// A pure reducer: committed state plus action to next state.
pub type Reducer = Arc<dyn Fn(&StateSnapshot, &Action) -> StateSnapshot + Send + Sync>;

/// The shared state container contract.
///
/// Implementations must make `dispatch` synchronous: the reducer runs and
/// the new state commits before any listener is notified, and all
/// notifications complete before `dispatch` returns.
pub trait SharedStore: Send + Sync {
    /// Snapshot of the current state.
    fn get_state(&self) -> StateSnapshot;

    /// Reduce the action into a new state, notify subscribers, and hand the
    /// action back to the caller.
    fn dispatch(&self, action: Action) -> Action;

    /// Register a change listener. The returned handle unsubscribes it.
    fn subscribe(&self, listener: Listener) -> Subscription;

    /// Swap the reducer. Stores that do not support live replacement keep
    /// interface parity by making this a no-op.
    fn replace_reducer(&self, reducer: Reducer);
}

/// Handle for a registered listener.
///
/// Unsubscribing is explicit: dropping the handle without calling
/// [`Subscription::unsubscribe`] leaves the listener registered, matching an
/// unsubscribe-function contract where losing the function also leaks the
/// registration.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Create a subscription backed by a cancel action.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to cancel (no-op buses, tests).
    #[must_use]
    pub fn inert() -> Self {
        Self { cancel: None }
    }

    /// Remove the listener from its store or bus.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_unsubscribe_runs_cancel_once() {
        let count = Arc::new(AtomicU32::new(0));
        let cancelled = count.clone();

        let subscription = Subscription::new(move || {
            cancelled.fetch_add(1, Ordering::SeqCst);
        });
        subscription.unsubscribe();

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_does_not_cancel() {
        let count = Arc::new(AtomicU32::new(0));
        let cancelled = count.clone();

        drop(Subscription::new(move || {
            cancelled.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_inert_unsubscribe_is_harmless() {
        Subscription::inert().unsubscribe();
    }
}
