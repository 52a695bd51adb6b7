//! Search default configuration values.
//!
//! Responsibilities:
//! - Define default values for search parameters (earliest_time, latest_time, max_count).
//!
//! Does NOT handle:
//! - Loading or parsing configuration from files or environment variables.
//!
//! Invariants:
//! - Default values are: earliest_time="-24h", latest_time="now", max_count=50000.

use crate::constants::{DEFAULT_EARLIEST_TIME, DEFAULT_LATEST_TIME, DEFAULT_MAX_COUNT};

/// Search default configuration values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchDefaultConfig {
    /// Earliest time for searches (e.g., "-24h").
    pub earliest_time: String,
    /// Latest time for searches (e.g., "now").
    pub latest_time: String,
    /// Maximum number of results a search may return.
    pub max_count: u64,
}

impl Default for SearchDefaultConfig {
    fn default() -> Self {
        Self {
            earliest_time: DEFAULT_EARLIEST_TIME.to_string(),
            latest_time: DEFAULT_LATEST_TIME.to_string(),
            max_count: DEFAULT_MAX_COUNT,
        }
    }
}
