//! Centralized constants for the splunk-as workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default Splunk management port.
pub const DEFAULT_SPLUNK_PORT: u16 = 8089;

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default timeout for long-running search requests in seconds.
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 300;

/// Maximum allowed request timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Maximum allowed search timeout in seconds (24 hours).
pub const MAX_SEARCH_TIMEOUT_SECS: u64 = 86400;

// =============================================================================
// Retry Defaults
// =============================================================================

/// Default maximum number of retries for failed requests.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Upper bound accepted for `max_retries`.
pub const MAX_MAX_RETRIES: usize = 10;

/// Base delay for exponential backoff in milliseconds.
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1000;

/// Ceiling applied to any single backoff delay in seconds.
pub const DEFAULT_RETRY_MAX_DELAY_SECS: u64 = 30;

// =============================================================================
// Search & Polling Defaults
// =============================================================================

/// Default interval between job status polls in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;

/// Default earliest time modifier for searches.
pub const DEFAULT_EARLIEST_TIME: &str = "-24h";

/// Default latest time modifier for searches.
pub const DEFAULT_LATEST_TIME: &str = "now";

/// Default maximum number of results a search may return.
pub const DEFAULT_MAX_COUNT: u64 = 50000;

/// Default number of jobs returned by job listings.
pub const DEFAULT_JOB_LIST_COUNT: u64 = 50;

/// Default number of results per export batch.
pub const DEFAULT_EXPORT_CHUNK_SIZE: u64 = 50000;

/// Default app namespace for app-scoped endpoints.
pub const DEFAULT_APP: &str = "search";
