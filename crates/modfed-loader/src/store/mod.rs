//! In-process state container.
//!
//! [`LocalStore`] implements the [`SharedStore`] contract for a single
//! process: a snapshot, a pure reducer, and an ordered subscriber list.
//! It backs two roles — the loader's fallback store, and provider
//! applications embedded in the same process (the CLI demo's provider
//! registers one as its exported store).

mod reducer;

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use modfed_core::ports::{Listener, Reducer, SharedStore, Subscription};
use modfed_core::store::{Action, StateSnapshot};

pub use reducer::{default_reducer, initial_state};

struct SubscriberEntry {
    id: u64,
    listener: Listener,
}

struct StoreInner {
    state: StateSnapshot,
    reducer: Reducer,
    subscribers: Vec<SubscriberEntry>,
    next_subscriber_id: u64,
}

/// A synchronous, in-process shared store.
pub struct LocalStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl LocalStore {
    /// Create a store with the default cart/catalog reducer and its
    /// initial state.
    #[must_use]
    pub fn new() -> Self {
        Self::with_reducer(default_reducer())
    }

    /// Create a store with a custom reducer, starting from the default
    /// initial state.
    #[must_use]
    pub fn with_reducer(reducer: Reducer) -> Self {
        Self::with_state(reducer, initial_state())
    }

    /// Create a store with a custom reducer and starting state.
    #[must_use]
    pub fn with_state(reducer: Reducer, state: StateSnapshot) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                state,
                reducer,
                subscribers: Vec::new(),
                next_subscriber_id: 0,
            })),
        }
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedStore for LocalStore {
    fn get_state(&self) -> StateSnapshot {
        self.inner.lock().state.clone()
    }

    /// Reduce, commit, then notify.
    ///
    /// Notification uses last-observed-set semantics: the subscriber list
    /// is snapshotted when the cycle starts, so a listener subscribed
    /// during notification first runs on the next dispatch, and a listener
    /// unsubscribed during notification still runs once in this cycle.
    /// The lock is released before listeners run, so listeners may
    /// dispatch, subscribe, or unsubscribe freely.
    fn dispatch(&self, action: Action) -> Action {
        let (committed, listeners) = {
            let mut inner = self.inner.lock();
            let next = (*inner.reducer)(&inner.state, &action);
            inner.state = next;
            let listeners: Vec<Listener> = inner
                .subscribers
                .iter()
                .map(|entry| entry.listener.clone())
                .collect();
            (inner.state.clone(), listeners)
        };

        for listener in listeners {
            (*listener)(&committed);
        }
        action
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        let id = {
            let mut inner = self.inner.lock();
            let id = inner.next_subscriber_id;
            inner.next_subscriber_id += 1;
            inner.subscribers.push(SubscriberEntry { id, listener });
            id
        };

        // Weak so an outstanding subscription handle does not keep a dead
        // store alive.
        let inner: Weak<Mutex<StoreInner>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.lock().subscribers.retain(|entry| entry.id != id);
            }
        })
    }

    fn replace_reducer(&self, reducer: Reducer) {
        self.inner.lock().reducer = reducer;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modfed_core::domain::{CartState, Product};
    use modfed_core::store::slices;
    use parking_lot::Mutex as PlMutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn cart(store: &LocalStore) -> CartState {
        store
            .get_state()
            .slice_as(slices::CART)
            .expect("cart slice must decode")
    }

    #[test]
    fn test_add_item_then_increment_quantity() {
        let store = LocalStore::new();
        let product = Product::new(1, "X", 10.0);

        store.dispatch(Action::add_item(&product));
        let state = cart(&store);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].quantity, 1);

        store.dispatch(Action::add_item(&product));
        let state = cart(&store);
        assert_eq!(state.items.len(), 1, "same id must not duplicate the line");
        assert_eq!(state.items[0].quantity, 2);
    }

    #[test]
    fn test_remove_and_clear() {
        let store = LocalStore::new();
        store.dispatch(Action::add_item(&Product::new(1, "X", 10.0)));
        store.dispatch(Action::add_item(&Product::new(2, "Y", 5.0)));

        store.dispatch(Action::remove_item(1));
        let state = cart(&store);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].id, 2);

        store.dispatch(Action::clear_cart());
        assert!(cart(&store).items.is_empty());
    }

    #[test]
    fn test_set_products_replaces_catalog() {
        let store = LocalStore::new();
        let products = vec![Product::new(1, "X", 10.0), Product::new(2, "Y", 5.0)];

        store.dispatch(Action::set_products(&products));

        let catalog: modfed_core::domain::CatalogState =
            store.get_state().slice_as(slices::CATALOG).unwrap();
        assert_eq!(catalog.products, products);
    }

    #[test]
    fn test_unknown_action_keeps_state_but_notifies() {
        let store = LocalStore::new();
        let notified = Arc::new(AtomicU32::new(0));
        let counter = notified.clone();

        let _sub = store.subscribe(Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let before = store.get_state();
        store.dispatch(Action::new("checkout/submitOrder"));

        assert_eq!(store.get_state(), before);
        assert_eq!(notified.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatch_returns_the_action() {
        let store = LocalStore::new();
        let action = Action::clear_cart();
        let returned = store.dispatch(action.clone());
        assert_eq!(returned, action);
    }

    #[test]
    fn test_listener_called_exactly_once_across_unsubscribe() {
        let store = LocalStore::new();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let subscription = store.subscribe(Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        store.dispatch(Action::add_item(&Product::new(1, "X", 10.0)));
        subscription.unsubscribe();
        store.dispatch(Action::add_item(&Product::new(1, "X", 10.0)));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_subscribed_mid_cycle_waits_for_next_dispatch() {
        let store = Arc::new(LocalStore::new());
        let late_calls = Arc::new(AtomicU32::new(0));

        let subscriber_store = store.clone();
        let late = late_calls.clone();
        // Held by the outer listener so the late subscription outlives the cycle.
        let late_subscription: Arc<PlMutex<Option<Subscription>>> =
            Arc::new(PlMutex::new(None));
        let slot = late_subscription.clone();

        let _sub = store.subscribe(Arc::new(move |_| {
            let late = late.clone();
            let sub = subscriber_store.subscribe(Arc::new(move |_| {
                late.fetch_add(1, Ordering::SeqCst);
            }));
            slot.lock().get_or_insert(sub);
        }));

        store.dispatch(Action::clear_cart());
        assert_eq!(
            late_calls.load(Ordering::SeqCst),
            0,
            "a listener added during notification must wait for the next cycle"
        );

        store.dispatch(Action::clear_cart());
        assert!(late_calls.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn test_listener_unsubscribed_mid_cycle_still_runs_once() {
        let store = Arc::new(LocalStore::new());
        let victim_calls = Arc::new(AtomicU32::new(0));

        // The canceller subscribes first so it runs before the victim
        // within the same notification cycle.
        let victim_slot: Arc<PlMutex<Option<Subscription>>> = Arc::new(PlMutex::new(None));
        let slot = victim_slot.clone();
        let _canceller = store.subscribe(Arc::new(move |_| {
            if let Some(sub) = slot.lock().take() {
                sub.unsubscribe();
            }
        }));

        let victim_counter = victim_calls.clone();
        let victim_sub = store.subscribe(Arc::new(move |_| {
            victim_counter.fetch_add(1, Ordering::SeqCst);
        }));
        *victim_slot.lock() = Some(victim_sub);

        store.dispatch(Action::clear_cart());
        assert_eq!(
            victim_calls.load(Ordering::SeqCst),
            1,
            "a listener present at cycle start runs even if removed mid-cycle"
        );

        store.dispatch(Action::clear_cart());
        assert_eq!(victim_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_replace_reducer_takes_effect() {
        let store = LocalStore::new();
        store.replace_reducer(Arc::new(|state: &StateSnapshot, _action: &Action| {
            state
                .clone()
                .with_slice("replaced", serde_json::json!(true))
        }));

        store.dispatch(Action::clear_cart());
        assert_eq!(
            store.get_state().slice("replaced"),
            Some(&serde_json::json!(true))
        );
    }
}
