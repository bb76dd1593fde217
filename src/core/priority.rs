use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Admin-assigned urgency of an active ticket
///
/// Unset priorities are stored as `N/A` and modelled as `Option<Priority>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Placeholder written to the priority column while unset
    pub const UNSET: &'static str = "N/A";

    /// All priorities in ascending order
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Low, Self::Medium, Self::High, Self::Critical]
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    /// Renders an optional priority the way the partition files store it
    #[must_use]
    pub fn label(priority: Option<Self>) -> &'static str {
        priority.map_or(Self::UNSET, |p| p.as_str())
    }

    /// Parses a stored priority column; anything unrecognised reads as unset
    #[must_use]
    pub fn from_column(value: &str) -> Option<Self> {
        value.trim().parse().ok()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match against the fixed enum
impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Self::Low),
            "Medium" => Ok(Self::Medium),
            "High" => Ok(Self::High),
            "Critical" => Ok(Self::Critical),
            other => Err(format!("Invalid priority: {other}")),
        }
    }
}
