//! Med-Lookup Core Library
//!
//! Medicine search and same-formula price comparison for mobile frontends.
//!
//! # Architecture
//!
//! ```text
//! Search query ──► Catalog scan (first case-insensitive name match)
//!                          │
//!                          ▼
//!                  Formula index ──► similar medicines, cheapest first
//!                          │
//!                  ┌───────▼────────┐
//!                  │ SelectionState │  one atomic update per call
//!                  └───────┬────────┘
//!                          │
//!                          ▼
//!                  Observers (native UI)
//! ```
//!
//! # Modules
//!
//! - [`catalog`]: In-memory catalog, seed data and formula index
//! - [`models`]: Domain types (MedicineRecord, SelectionState)
//! - [`lookup`]: Lookup service and observer callbacks
//! - [`config`]: Service configuration
//! - [`logging`]: Subscriber setup for host applications

pub mod catalog;
pub mod config;
pub mod logging;
pub mod lookup;
pub mod models;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogError};
pub use config::{EmptyQueryPolicy, LookupConfig};
pub use lookup::{LookupError, LookupService, SelectionObserver, SubscriptionId};
pub use models::{MedicineRecord, SelectionChange, SelectionState};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MedLookupError {
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<CatalogError> for MedLookupError {
    fn from(e: CatalogError) -> Self {
        MedLookupError::InvalidCatalog(e.to_string())
    }
}

impl From<LookupError> for MedLookupError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::NotFound(query) => MedLookupError::NotFound(query),
        }
    }
}

impl From<serde_json::Error> for MedLookupError {
    fn from(e: serde_json::Error) -> Self {
        MedLookupError::SerializationError(e.to_string())
    }
}

impl From<tracing_subscriber::filter::ParseError> for MedLookupError {
    fn from(e: tracing_subscriber::filter::ParseError) -> Self {
        MedLookupError::InvalidInput(e.to_string())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Create a lookup over the built-in medicine dataset.
#[uniffi::export]
pub fn open_seed_lookup() -> Arc<MedicineLookup> {
    Arc::new(MedicineLookup {
        service: LookupService::default(),
    })
}

/// Create a lookup over a host-supplied JSON catalog.
///
/// `config_json` may omit any field; omitted fields take their defaults.
#[uniffi::export]
pub fn open_lookup_from_json(
    catalog_json: String,
    config_json: Option<String>,
) -> Result<Arc<MedicineLookup>, MedLookupError> {
    let catalog = Catalog::from_json(&catalog_json)?;
    let config = match config_json {
        Some(json) => LookupConfig::from_json(&json)?,
        None => LookupConfig::default(),
    };
    Ok(Arc::new(MedicineLookup {
        service: LookupService::with_config(catalog, config),
    }))
}

/// Route core logs to stderr, filtered by `directives` (e.g. "info").
///
/// Returns false if logging was already initialized.
#[uniffi::export]
pub fn init_logging(directives: String) -> Result<bool, MedLookupError> {
    Ok(logging::init(&directives)?)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe lookup handle for FFI.
#[derive(uniffi::Object)]
pub struct MedicineLookup {
    service: LookupService,
}

#[uniffi::export]
impl MedicineLookup {
    // =========================================================================
    // Lookup Operations
    // =========================================================================

    /// Search by name; the outcome lands in the selection state.
    pub fn search_by_name(&self, query: String) {
        self.service.search_by_name(&query);
    }

    /// Show a medicine and its cheaper or pricier equivalents.
    pub fn select_medicine(&self, medicine: FfiMedicine) {
        let record: MedicineRecord = medicine.into();
        self.service.select_medicine(&record);
    }

    /// Current selection state.
    pub fn selection_state(&self) -> FfiSelectionState {
        self.service.state().into()
    }

    /// Current selection state as pretty-printed JSON.
    pub fn selection_state_json(&self) -> Result<String, MedLookupError> {
        Ok(self.service.state().to_json()?)
    }

    /// First medicine whose name contains `query`, without touching state.
    pub fn find_medicine(&self, query: String) -> Result<FfiMedicine, MedLookupError> {
        let record = self.service.find_by_name(&query)?;
        Ok(record.clone().into())
    }

    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// Number of medicines in the catalog.
    pub fn catalog_size(&self) -> u32 {
        self.service.catalog().len() as u32
    }

    /// All medicines whose name contains `query`, in catalog order.
    pub fn list_medicines(&self, query: String, limit: u32) -> Vec<FfiMedicine> {
        self.service
            .catalog()
            .find_all_by_name(&query, limit as usize)
            .into_iter()
            .map(|r| r.clone().into())
            .collect()
    }

    /// Closest medicine names for a query that found nothing.
    pub fn suggest_names(&self, query: String, limit: u32) -> Vec<String> {
        self.service.suggest_names(&query, limit as usize)
    }

    // =========================================================================
    // Observer Operations
    // =========================================================================

    /// Register for state updates. Returns a subscription id.
    pub fn subscribe(&self, observer: Arc<dyn FfiSelectionObserver>) -> u64 {
        self.service
            .subscribe(Arc::new(ForeignObserver { inner: observer }))
            .0
    }

    /// Remove a subscription. Returns false if it was unknown.
    pub fn unsubscribe(&self, subscription_id: u64) -> bool {
        self.service.unsubscribe(SubscriptionId(subscription_id))
    }
}

// =========================================================================
// Foreign Observer
// =========================================================================

/// Observer implemented by the native frontend.
///
/// Called after the core has released its locks, so the callback may read
/// `selection_state()` or call `select_medicine`; updates issued from a
/// callback are delivered once it returns. A callback that throws is
/// logged and skipped.
#[uniffi::export(with_foreign)]
pub trait FfiSelectionObserver: Send + Sync {
    fn on_selection_changed(&self, change: FfiSelectionChange, state: FfiSelectionState);
}

/// Bridges a foreign observer to the core observer trait.
struct ForeignObserver {
    inner: Arc<dyn FfiSelectionObserver>,
}

impl SelectionObserver for ForeignObserver {
    fn on_selection_changed(&self, change: SelectionChange, state: &SelectionState) {
        self.inner
            .on_selection_changed(change.into(), state.clone().into());
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe medicine record.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiMedicine {
    pub name: String,
    pub chemical_formula: String,
    pub brand: String,
    pub category: String,
    pub generic_name: String,
    pub price: f64,
    /// Price formatted for display, e.g. "$8.00"
    pub display_price: String,
}

impl From<MedicineRecord> for FfiMedicine {
    fn from(record: MedicineRecord) -> Self {
        Self {
            display_price: record.display_price(),
            name: record.name,
            chemical_formula: record.chemical_formula,
            brand: record.brand,
            category: record.category,
            generic_name: record.generic_name,
            price: record.price,
        }
    }
}

impl From<FfiMedicine> for MedicineRecord {
    fn from(medicine: FfiMedicine) -> Self {
        MedicineRecord {
            name: medicine.name,
            chemical_formula: medicine.chemical_formula,
            brand: medicine.brand,
            category: medicine.category,
            generic_name: medicine.generic_name,
            price: medicine.price,
        }
    }
}

/// FFI-safe selection state.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiSelectionState {
    pub current_medicine: Option<FfiMedicine>,
    pub similar_medicines: Vec<FfiMedicine>,
    pub loading: bool,
    pub error_message: String,
    /// Cheapest similar medicine, shown as the recommended pick
    pub cheapest_alternative: Option<FfiMedicine>,
}

impl From<SelectionState> for FfiSelectionState {
    fn from(state: SelectionState) -> Self {
        Self {
            cheapest_alternative: state.cheapest_alternative().cloned().map(|m| m.into()),
            current_medicine: state.current_medicine.map(|m| m.into()),
            similar_medicines: state
                .similar_medicines
                .into_iter()
                .map(|m| m.into())
                .collect(),
            loading: state.loading,
            error_message: state.error_message,
        }
    }
}

/// FFI-safe change kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiSelectionChange {
    SearchStarted,
    SearchFinished,
    Selected,
}

impl From<SelectionChange> for FfiSelectionChange {
    fn from(change: SelectionChange) -> Self {
        match change {
            SelectionChange::SearchStarted => FfiSelectionChange::SearchStarted,
            SelectionChange::SearchFinished => FfiSelectionChange::SearchFinished,
            SelectionChange::Selected => FfiSelectionChange::Selected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingObserver {
        changes: Mutex<Vec<(FfiSelectionChange, FfiSelectionState)>>,
    }

    impl FfiSelectionObserver for RecordingObserver {
        fn on_selection_changed(&self, change: FfiSelectionChange, state: FfiSelectionState) {
            self.changes.lock().unwrap().push((change, state));
        }
    }

    #[test]
    fn test_seed_lookup_search() {
        let lookup = open_seed_lookup();
        assert_eq!(lookup.catalog_size(), 416);

        lookup.search_by_name("paracetamol".into());
        let state = lookup.selection_state();

        let current = state.current_medicine.unwrap();
        assert_eq!(current.name, "Paracetamol");
        assert_eq!(current.display_price, "$10.00");

        let prices: Vec<_> = state.similar_medicines.iter().map(|m| m.price).collect();
        assert_eq!(prices, vec![15.0, 18.0, 20.0]);

        let recommended = state.cheapest_alternative.unwrap();
        assert_eq!(recommended.name, "Acetaminophen");
        assert_eq!(recommended.display_price, "$15.00");
    }

    #[test]
    fn test_not_found_has_no_recommendation() {
        let lookup = open_seed_lookup();
        lookup.search_by_name("Nonexistent".into());
        assert!(lookup.selection_state().cheapest_alternative.is_none());
    }

    /// Reads the lookup back from inside its own callback.
    struct ReadBackObserver {
        lookup: std::sync::Weak<MedicineLookup>,
        seen: Mutex<Vec<FfiSelectionState>>,
    }

    impl FfiSelectionObserver for ReadBackObserver {
        fn on_selection_changed(&self, _change: FfiSelectionChange, _state: FfiSelectionState) {
            if let Some(lookup) = self.lookup.upgrade() {
                self.seen.lock().unwrap().push(lookup.selection_state());
            }
        }
    }

    #[test]
    fn test_foreign_observer_can_read_state_in_callback() {
        let lookup = open_seed_lookup();
        let observer = Arc::new(ReadBackObserver {
            lookup: Arc::downgrade(&lookup),
            seen: Mutex::new(Vec::new()),
        });
        lookup.subscribe(observer.clone());

        let (done_tx, done_rx) = std::sync::mpsc::channel();
        let worker = Arc::clone(&lookup);
        std::thread::spawn(move || {
            worker.select_medicine(worker.find_medicine("Motrin".into()).unwrap());
            done_tx.send(()).unwrap();
        });

        assert!(done_rx
            .recv_timeout(std::time::Duration::from_secs(3))
            .is_ok());
        let seen = observer.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].current_medicine.as_ref().unwrap().name, "Motrin");
    }

    #[test]
    fn test_select_round_trips_through_ffi_record() {
        let lookup = open_seed_lookup();
        let ibuprofen = lookup.find_medicine("ibuprofen".into()).unwrap();
        lookup.select_medicine(ibuprofen.clone());

        let state = lookup.selection_state();
        assert_eq!(state.current_medicine, Some(ibuprofen));
        let names: Vec<_> = state.similar_medicines.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Generic Ibuprofen", "Nurofen", "Motrin"]);
    }

    #[test]
    fn test_find_medicine_not_found() {
        let lookup = open_seed_lookup();
        let err = lookup.find_medicine("Nonexistent".into()).unwrap_err();
        assert!(matches!(err, MedLookupError::NotFound(q) if q == "Nonexistent"));
    }

    #[test]
    fn test_open_from_json_with_config() {
        let catalog = r#"[
            {"name": "Aspirin", "chemical_formula": "C9H8O4", "brand": "Bayer",
             "category": "Pain Reliever", "generic_name": "Acetylsalicylic Acid", "price": 10.0}
        ]"#;
        let lookup = open_lookup_from_json(
            catalog.into(),
            Some(r#"{"not_found_message": "Nothing here"}"#.into()),
        )
        .unwrap();

        lookup.search_by_name("ibuprofen".into());
        assert_eq!(lookup.selection_state().error_message, "Nothing here");
    }

    #[test]
    fn test_open_from_json_errors() {
        assert!(matches!(
            open_lookup_from_json("not json".into(), None),
            Err(MedLookupError::InvalidCatalog(_))
        ));
        assert!(matches!(
            open_lookup_from_json("[]".into(), Some("{\"bogus\": 1}".into())),
            Err(MedLookupError::SerializationError(_))
        ));
    }

    #[test]
    fn test_foreign_observer_receives_updates() {
        let lookup = open_seed_lookup();
        let observer = Arc::new(RecordingObserver {
            changes: Mutex::new(Vec::new()),
        });
        let id = lookup.subscribe(observer.clone());

        lookup.search_by_name("Nonexistent".into());
        assert!(lookup.unsubscribe(id));
        lookup.search_by_name("Aspirin".into());

        let changes = observer.changes.lock().unwrap();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].0, FfiSelectionChange::SearchStarted);
        assert_eq!(changes[1].0, FfiSelectionChange::SearchFinished);
        assert_eq!(changes[1].1.error_message, "Medicine not found");
    }

    #[test]
    fn test_list_and_suggest() {
        let lookup = open_seed_lookup();

        let listed = lookup.list_medicines("naprox".into(), 10);
        let names: Vec<_> = listed.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Naproxen", "Generic Naproxen", "Anaprox"]);

        let suggestions = lookup.suggest_names("Panadoll".into(), 1);
        assert_eq!(suggestions, vec!["Panadol".to_string()]);
    }

    #[test]
    fn test_selection_state_json() {
        let lookup = open_seed_lookup();
        lookup.search_by_name("Ecotrin".into());

        let json: serde_json::Value =
            serde_json::from_str(&lookup.selection_state_json().unwrap()).unwrap();
        assert_eq!(json["current_medicine"]["brand"], "Ecotrin");
        assert_eq!(json["similar_medicines"].as_array().unwrap().len(), 3);
    }
}
