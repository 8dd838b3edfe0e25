//! Selection state published to the presentation layer.

use serde::{Deserialize, Serialize};

use super::MedicineRecord;

/// Result of the most recent search or select call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SelectionState {
    /// The medicine being shown, if any
    pub current_medicine: Option<MedicineRecord>,
    /// Same-formula medicines, cheapest first, excluding the current name
    pub similar_medicines: Vec<MedicineRecord>,
    /// True only while a search is in flight
    pub loading: bool,
    /// Empty when the last search succeeded
    pub error_message: String,
}

impl SelectionState {
    /// Whether the last search reported an error.
    pub fn has_error(&self) -> bool {
        !self.error_message.is_empty()
    }

    /// Names of the similar medicines, in display order.
    pub fn similar_names(&self) -> Vec<&str> {
        self.similar_medicines
            .iter()
            .map(|m| m.name.as_str())
            .collect()
    }

    /// Cheapest alternative to the current medicine.
    pub fn cheapest_alternative(&self) -> Option<&MedicineRecord> {
        self.similar_medicines.first()
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// What caused a selection state change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SelectionChange {
    /// A search began; only `loading` and `error_message` changed
    SearchStarted,
    /// A search completed, with or without a match
    SearchFinished,
    /// A medicine was picked directly
    Selected,
}
