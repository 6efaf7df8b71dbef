//! Memoized dependency slots with in-flight coalescing.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

/// State of one dependency slot.
///
/// Transitions are one-way: `Idle` to `InFlight` when the first caller
/// claims the slot, `InFlight` to `Resolved` when the sequence task
/// completes. There is no transition back — a resolved slot never
/// re-resolves.
enum SlotState<T> {
    /// No acquisition has started.
    Idle,
    /// A sequence is running; waiters share this receiver.
    InFlight(watch::Receiver<Option<T>>),
    /// Acquisition concluded; the value is memoized for the slot's lifetime.
    Resolved(T),
}

/// A memoized slot for one named dependency.
///
/// The slot guarantees the two acquisition invariants: at most one attempt
/// sequence ever runs (callers arriving while one is in flight join it),
/// and once resolved the value is stable.
pub(crate) struct DependencySlot<T> {
    state: Arc<Mutex<SlotState<T>>>,
}

impl<T: Clone> DependencySlot<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SlotState::Idle)),
        }
    }

    /// The memoized value, if acquisition has concluded.
    pub(crate) fn get(&self) -> Option<T> {
        match &*self.state.lock() {
            SlotState::Resolved(value) => Some(value.clone()),
            SlotState::Idle | SlotState::InFlight(_) => None,
        }
    }

    /// Whether acquisition has concluded (successfully or via fallback).
    pub(crate) fn is_resolved(&self) -> bool {
        matches!(&*self.state.lock(), SlotState::Resolved(_))
    }

    /// Claim the slot: the caller learns whether it holds the resolved
    /// value, joins an in-flight sequence, or must run the sequence itself.
    pub(crate) fn claim(&self) -> SlotClaim<T> {
        let mut state = self.state.lock();
        match &*state {
            SlotState::Resolved(value) => SlotClaim::Resolved(value.clone()),
            SlotState::InFlight(rx) => SlotClaim::Waiter(rx.clone()),
            SlotState::Idle => {
                let (tx, rx) = watch::channel(None);
                *state = SlotState::InFlight(rx.clone());
                SlotClaim::Runner {
                    completion: SlotCompletion {
                        state: self.state.clone(),
                        tx,
                    },
                    rx,
                }
            }
        }
    }
}

/// Outcome of [`DependencySlot::claim`].
pub(crate) enum SlotClaim<T> {
    /// Already resolved; here is the memoized value.
    Resolved(T),
    /// A sequence is in flight; await its published outcome.
    Waiter(watch::Receiver<Option<T>>),
    /// This caller must start the sequence and complete the slot.
    Runner {
        /// Hand this to the sequence task; it must be completed exactly once.
        completion: SlotCompletion<T>,
        /// The caller awaits this like any other waiter.
        rx: watch::Receiver<Option<T>>,
    },
}

/// Completion handle held by the running sequence task.
pub(crate) struct SlotCompletion<T> {
    state: Arc<Mutex<SlotState<T>>>,
    tx: watch::Sender<Option<T>>,
}

impl<T: Clone> SlotCompletion<T> {
    /// Memoize the outcome and wake every coalesced waiter.
    ///
    /// The slot transitions to `Resolved` before the waiters observe the
    /// value, so a waiter that polls `get()` right after waking sees the
    /// same value it received.
    pub(crate) fn complete(self, value: T) {
        *self.state.lock() = SlotState::Resolved(value.clone());
        // Waiters hold receiver clones, so this only fails if every caller
        // vanished; the memoized state above still serves later callers.
        let _ = self.tx.send(Some(value));
    }
}
