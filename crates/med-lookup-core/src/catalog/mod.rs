//! In-memory medicine catalog.

mod index;
mod seed;

pub use index::*;
pub use seed::*;

use strsim::{jaro_winkler, normalized_levenshtein};
use thiserror::Error;

use crate::models::MedicineRecord;

/// Catalog construction errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid record at position {position}: {reason}")]
    InvalidRecord { position: usize, reason: String },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Immutable, ordered collection of medicine records.
///
/// Query results never depend on insertion order beyond first-match
/// tie-breaking and equal-price ordering.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<MedicineRecord>,
    index: FormulaIndex,
}

impl Catalog {
    /// Build the built-in dataset.
    pub fn seed() -> Self {
        Self::build(seed_records())
    }

    /// Build a catalog from host-supplied records.
    pub fn from_records(records: Vec<MedicineRecord>) -> CatalogResult<Self> {
        for (position, record) in records.iter().enumerate() {
            validate_record(record).map_err(|reason| CatalogError::InvalidRecord {
                position,
                reason,
            })?;
        }
        Ok(Self::build(records))
    }

    /// Build a catalog from a JSON array of records.
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let records: Vec<MedicineRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    fn build(records: Vec<MedicineRecord>) -> Self {
        let index = FormulaIndex::build(&records);
        tracing::info!(
            records = records.len(),
            formulas = index.formula_count(),
            "Built medicine catalog"
        );
        Self { records, index }
    }

    /// All records in catalog order.
    pub fn records(&self) -> &[MedicineRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record, in catalog order, whose name contains `query`
    /// (case-insensitive). An empty query matches the first record.
    pub fn find_first_by_name(&self, query: &str) -> Option<&MedicineRecord> {
        let query_lower = query.to_lowercase();
        self.records
            .iter()
            .find(|r| r.name_contains_lower(&query_lower))
    }

    /// Every matching record in catalog order, up to `limit`.
    pub fn find_all_by_name(&self, query: &str, limit: usize) -> Vec<&MedicineRecord> {
        let query_lower = query.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.name_contains_lower(&query_lower))
            .take(limit)
            .collect()
    }

    /// Records sharing `record`'s formula under a different name, cheapest first.
    pub fn similar_to(&self, record: &MedicineRecord) -> Vec<MedicineRecord> {
        self.index
            .positions(&record.chemical_formula)
            .iter()
            .map(|&pos| &self.records[pos])
            .filter(|candidate| record.is_similar_to(candidate))
            .cloned()
            .collect()
    }

    /// Closest distinct names to `query`, best first.
    ///
    /// Used to offer "did you mean" hints after a failed search.
    pub fn suggest_names(&self, query: &str, limit: usize, threshold: f64) -> Vec<String> {
        let query_lower = query.to_lowercase();
        if query_lower.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(f64, &str)> = self
            .records
            .iter()
            .map(|r| (fuzzy_match(&query_lower, &r.name.to_lowercase()), r.name.as_str()))
            .filter(|(score, _)| *score >= threshold)
            .collect();

        // Sort by similarity descending, catalog order on ties
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut names: Vec<String> = Vec::new();
        for (_, name) in scored {
            if names.len() == limit {
                break;
            }
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seed()
    }
}

fn validate_record(record: &MedicineRecord) -> Result<(), String> {
    if record.name.trim().is_empty() {
        return Err("name is empty".into());
    }
    if record.chemical_formula.trim().is_empty() {
        return Err(format!("chemical formula is empty for {}", record.name));
    }
    if !record.price.is_finite() || record.price < 0.0 {
        return Err(format!("price {} is not a non-negative amount", record.price));
    }
    Ok(())
}

/// Compute fuzzy string similarity using combined metrics.
fn fuzzy_match(a: &str, b: &str) -> f64 {
    // Jaro-Winkler favors shared prefixes; Levenshtein covers overall shape
    let jw = jaro_winkler(a, b);
    let lev = normalized_levenshtein(a, b);
    jw * 0.6 + lev * 0.4
}
