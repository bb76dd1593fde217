use serde::{Deserialize, Serialize};

/// Number of leading characters compared when matching descriptions
pub const KEY_LENGTH: usize = 30;

/// Partitions consulted when looking for a duplicate submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateScope {
    /// Only tickets already promoted to the active queue
    ActiveOnly,
    /// Active tickets and submissions still awaiting promotion
    #[default]
    ActiveAndPending,
}

impl DuplicateScope {
    #[must_use]
    pub const fn includes_pending(&self) -> bool {
        matches!(self, Self::ActiveAndPending)
    }
}

/// Comparison key: trimmed, lowercased, first thirty characters
#[must_use]
pub fn description_key(description: &str) -> String {
    description
        .trim()
        .to_lowercase()
        .chars()
        .take(KEY_LENGTH)
        .collect()
}
