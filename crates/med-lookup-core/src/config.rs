//! Lookup service configuration.

use serde::{Deserialize, Serialize};

/// Default message reported when a search finds nothing.
pub const NOT_FOUND_MESSAGE: &str = "Medicine not found";

/// Default minimum similarity for name suggestions.
pub const DEFAULT_SUGGESTION_THRESHOLD: f64 = 0.6;

/// How `search_by_name` treats an empty query.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmptyQueryPolicy {
    /// Scan as usual; the empty string matches the first catalog record
    #[default]
    MatchFirst,
    /// Leave the selection state untouched
    Ignore,
}

/// Tunables for the lookup service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LookupConfig {
    pub empty_query: EmptyQueryPolicy,
    /// Shown in `error_message` when nothing matches
    pub not_found_message: String,
    /// Minimum similarity (0.0 - 1.0) for "did you mean" suggestions
    pub suggestion_threshold: f64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            empty_query: EmptyQueryPolicy::default(),
            not_found_message: NOT_FOUND_MESSAGE.to_string(),
            suggestion_threshold: DEFAULT_SUGGESTION_THRESHOLD,
        }
    }
}

impl LookupConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
