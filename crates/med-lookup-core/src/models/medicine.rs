//! Medicine record model.

use serde::{Deserialize, Serialize};

/// A single medicine in the lookup catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicineRecord {
    /// Display name, also the search key
    pub name: String,
    /// Chemical formula (e.g., "C9H8O4"), the grouping key for similar medicines
    pub chemical_formula: String,
    /// Manufacturer brand
    pub brand: String,
    /// Therapeutic category (e.g., "Pain Reliever", "NSAID")
    pub category: String,
    /// Generic (non-proprietary) name
    pub generic_name: String,
    /// Unit price in currency units
    pub price: f64,
}

impl MedicineRecord {
    /// Create a new medicine record.
    pub fn new(
        name: impl Into<String>,
        chemical_formula: impl Into<String>,
        brand: impl Into<String>,
        category: impl Into<String>,
        generic_name: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            name: name.into(),
            chemical_formula: chemical_formula.into(),
            brand: brand.into(),
            category: category.into(),
            generic_name: generic_name.into(),
            price,
        }
    }

    /// Case-insensitive substring match on the name.
    ///
    /// `query` must already be lowercased.
    pub fn name_contains_lower(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query)
    }

    /// Whether `other` belongs in this record's similar-medicine list.
    pub fn is_similar_to(&self, other: &MedicineRecord) -> bool {
        self.chemical_formula == other.chemical_formula && self.name != other.name
    }

    /// Price formatted with two decimals (e.g., "$8.00").
    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price)
    }
}
