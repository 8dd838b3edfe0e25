//! Chemical-formula index over the catalog.

use std::collections::HashMap;

use crate::models::MedicineRecord;

/// Maps each chemical formula to catalog positions, cheapest first.
///
/// Positions sharing a price keep catalog order.
#[derive(Debug, Clone, Default)]
pub struct FormulaIndex {
    groups: HashMap<String, Vec<usize>>,
}

impl FormulaIndex {
    /// Build the index for a slice of records.
    pub fn build(records: &[MedicineRecord]) -> Self {
        let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
        for (pos, record) in records.iter().enumerate() {
            groups
                .entry(record.chemical_formula.clone())
                .or_default()
                .push(pos);
        }

        // Stable sort: equal prices stay in catalog order
        for positions in groups.values_mut() {
            positions.sort_by(|&a, &b| {
                records[a]
                    .price
                    .partial_cmp(&records[b].price)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        Self { groups }
    }

    /// Catalog positions for a formula, cheapest first.
    pub fn positions(&self, chemical_formula: &str) -> &[usize] {
        self.groups
            .get(chemical_formula)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct formulas.
    pub fn formula_count(&self) -> usize {
        self.groups.len()
    }
}
