//! The two fixed detection rules. Both are pure functions over one source's
//! records for one operation date and return at most one aggregated incident.

pub mod duplicates;
pub mod empty_files;

use serde::{Deserialize, Serialize};

pub use duplicates::detect_duplicated_and_failed_files;
pub use empty_files::detect_unexpected_empty_files;

/// Thresholds for the unexpected-empty rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmptyFilePolicy {
    /// Empty files tolerated above the rounded weekday mean.
    pub tolerance: u64,
    /// Sources whose median row count exceeds this should never send empty files.
    pub median_rows_floor: u64,
}

impl Default for EmptyFilePolicy {
    fn default() -> Self {
        Self {
            tolerance: 1,
            median_rows_floor: 50,
        }
    }
}
