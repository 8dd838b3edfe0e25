//! Change notification for selection state.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::models::{SelectionChange, SelectionState};

/// Receives every selection state update.
///
/// Callbacks run after the service lock is released, so they may read
/// the state or issue further calls. A panicking callback is logged and
/// skipped; other observers still run.
pub trait SelectionObserver: Send + Sync {
    fn on_selection_changed(&self, change: SelectionChange, state: &SelectionState);
}

impl<F> SelectionObserver for F
where
    F: Fn(SelectionChange, &SelectionState) + Send + Sync,
{
    fn on_selection_changed(&self, change: SelectionChange, state: &SelectionState) {
        self(change, state)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Ordered list of observers.
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_id: u64,
    observers: Vec<(SubscriptionId, Arc<dyn SelectionObserver>)>,
}

impl ObserverRegistry {
    pub(crate) fn add(&mut self, observer: Arc<dyn SelectionObserver>) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.observers.push((id, observer));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    /// Observers in subscription order, detached from the registry.
    pub(crate) fn snapshot(&self) -> Vec<Arc<dyn SelectionObserver>> {
        self.observers
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }
}

/// Notify `observers` in order. Returns how many of them panicked.
pub(crate) fn notify_all(
    observers: &[Arc<dyn SelectionObserver>],
    change: SelectionChange,
    state: &SelectionState,
) -> usize {
    let mut failed = 0;
    for observer in observers {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            observer.on_selection_changed(change, state)
        }));
        if outcome.is_err() {
            failed += 1;
            tracing::warn!(?change, "Selection observer panicked");
        }
    }
    failed
}
