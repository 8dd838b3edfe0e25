//! Lookup service: name search and same-formula comparison.
//!
//! Flow: search query → first name match → similar medicines by price → observers

mod observer;

pub use observer::{SelectionObserver, SubscriptionId};

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::catalog::Catalog;
use crate::config::{EmptyQueryPolicy, LookupConfig};
use crate::models::{MedicineRecord, SelectionChange, SelectionState};
use observer::{notify_all, ObserverRegistry};

/// Lookup errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// No catalog name contains the query
    #[error("Medicine not found")]
    NotFound(String),
}

pub type LookupResult<T> = Result<T, LookupError>;

/// State guarded by the service lock.
#[derive(Default)]
struct Inner {
    state: SelectionState,
    observers: ObserverRegistry,
}

/// One update waiting for delivery, with the observers subscribed when it
/// was published.
struct Notification {
    change: SelectionChange,
    state: SelectionState,
    observers: Vec<Arc<dyn SelectionObserver>>,
}

/// Updates in publish order. At most one caller delivers at a time.
#[derive(Default)]
struct Outbox {
    pending: VecDeque<Notification>,
    delivering: bool,
}

/// Holds the current selection and derives it from the catalog.
///
/// Calls from several threads are serialized; the state always reflects
/// the most recently completed call. Observers are called after the lock
/// is released, in publish order. A call made while another thread is
/// delivering may return before its own notifications go out.
pub struct LookupService {
    catalog: Catalog,
    config: LookupConfig,
    inner: Mutex<Inner>,
    outbox: Mutex<Outbox>,
}

impl Default for LookupService {
    fn default() -> Self {
        Self::new(Catalog::seed())
    }
}

impl LookupService {
    /// Create a service with the default configuration.
    pub fn new(catalog: Catalog) -> Self {
        Self::with_config(catalog, LookupConfig::default())
    }

    pub fn with_config(catalog: Catalog, config: LookupConfig) -> Self {
        Self {
            catalog,
            config,
            inner: Mutex::new(Inner::default()),
            outbox: Mutex::new(Outbox::default()),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Snapshot of the current selection state.
    pub fn state(&self) -> SelectionState {
        self.lock_inner().state.clone()
    }

    /// First record whose name contains `query`, ignoring case.
    pub fn find_by_name(&self, query: &str) -> LookupResult<&MedicineRecord> {
        self.catalog
            .find_first_by_name(query)
            .ok_or_else(|| LookupError::NotFound(query.to_string()))
    }

    /// Search by name and publish the match with its similar medicines.
    ///
    /// Observers see a `SearchStarted` update (loading, error cleared)
    /// followed by `SearchFinished`. A miss is reported through
    /// `error_message`, never as an error.
    pub fn search_by_name(&self, query: &str) {
        if query.is_empty() && self.config.empty_query == EmptyQueryPolicy::Ignore {
            tracing::debug!("Ignoring empty search query");
            return;
        }

        {
            let mut inner = self.lock_inner();
            let started = SelectionState {
                loading: true,
                error_message: String::new(),
                ..inner.state.clone()
            };
            let finished = self.run_search(query);

            // The scan cannot fail, so the finished state lands before any
            // observer runs and `loading` is never left set.
            inner.state = finished.clone();
            self.enqueue(
                &inner,
                [
                    (SelectionChange::SearchStarted, started),
                    (SelectionChange::SearchFinished, finished),
                ],
            );
        }
        self.deliver();
    }

    fn run_search(&self, query: &str) -> SelectionState {
        match self.find_by_name(query) {
            Ok(found) => {
                let similar_medicines = self.catalog.similar_to(found);
                tracing::debug!(
                    query,
                    name = %found.name,
                    similar = similar_medicines.len(),
                    "Search matched"
                );
                SelectionState {
                    current_medicine: Some(found.clone()),
                    similar_medicines,
                    loading: false,
                    error_message: String::new(),
                }
            }
            Err(err) => {
                tracing::info!(query, error = %err, "Search found no medicine");
                SelectionState {
                    current_medicine: None,
                    similar_medicines: Vec::new(),
                    loading: false,
                    error_message: self.config.not_found_message.clone(),
                }
            }
        }
    }

    /// Make `record` current and recompute its similar medicines.
    ///
    /// Leaves `loading` and `error_message` as they are.
    pub fn select_medicine(&self, record: &MedicineRecord) {
        let similar_medicines = self.catalog.similar_to(record);
        tracing::debug!(
            name = %record.name,
            similar = similar_medicines.len(),
            "Medicine selected"
        );

        {
            let mut inner = self.lock_inner();
            let selected = SelectionState {
                current_medicine: Some(record.clone()),
                similar_medicines,
                loading: inner.state.loading,
                error_message: inner.state.error_message.clone(),
            };
            inner.state = selected.clone();
            self.enqueue(&inner, [(SelectionChange::Selected, selected)]);
        }
        self.deliver();
    }

    /// "Did you mean" names for a query, best first. Does not touch state.
    pub fn suggest_names(&self, query: &str, limit: usize) -> Vec<String> {
        self.catalog
            .suggest_names(query, limit, self.config.suggestion_threshold)
    }

    /// Register an observer for every later state update.
    pub fn subscribe(&self, observer: Arc<dyn SelectionObserver>) -> SubscriptionId {
        self.lock_inner().observers.add(observer)
    }

    /// Returns false if the subscription was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock_inner().observers.remove(id)
    }

    pub fn observer_count(&self) -> usize {
        self.lock_inner().observers.len()
    }

    /// Queue updates while the state lock is held, so queue order matches
    /// state order.
    fn enqueue<I>(&self, inner: &Inner, updates: I)
    where
        I: IntoIterator<Item = (SelectionChange, SelectionState)>,
    {
        let observers = inner.observers.snapshot();
        let mut outbox = self.lock_outbox();
        for (change, state) in updates {
            outbox.pending.push_back(Notification {
                change,
                state,
                observers: observers.clone(),
            });
        }
    }

    /// Drain the outbox unless another caller is already draining it.
    ///
    /// No lock is held while observers run.
    fn deliver(&self) {
        {
            let mut outbox = self.lock_outbox();
            if outbox.delivering {
                return;
            }
            outbox.delivering = true;
        }

        loop {
            let next = {
                let mut outbox = self.lock_outbox();
                match outbox.pending.pop_front() {
                    Some(notification) => notification,
                    None => {
                        outbox.delivering = false;
                        return;
                    }
                }
            };
            notify_all(&next.observers, next.change, &next.state);
        }
    }

    // No caller code runs under either lock, and every write replaces the
    // state whole, so a poisoned guard still holds a consistent value.
    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_outbox(&self) -> MutexGuard<'_, Outbox> {
        self.outbox.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
