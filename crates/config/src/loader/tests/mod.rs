//! Tests for the configuration loader.
//!
//! Responsibilities:
//! - Test builder methods, profile loading, env overrides and auth resolution.
//! - Test `.env` loading and URL/timeout validation.
//!
//! Invariants:
//! - Tests use `serial_test` to prevent environment variable pollution.
//! - Tests use `global_test_lock()` for additional synchronization.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::sync::Mutex;

pub mod auth_tests;
pub mod basic_tests;
pub mod validation_tests;

/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// Every variable the loader reads, unset.
pub fn cleared_env() -> Vec<(&'static str, Option<&'static str>)> {
    [
        "SPLUNK_URL",
        "SPLUNK_PORT",
        "SPLUNK_TOKEN",
        "SPLUNK_USERNAME",
        "SPLUNK_PASSWORD",
        "SPLUNK_AUTH_METHOD",
        "SPLUNK_VERIFY_SSL",
        "SPLUNK_TIMEOUT",
        "SPLUNK_SEARCH_TIMEOUT",
        "SPLUNK_MAX_RETRIES",
        "SPLUNK_PROFILE",
        "SPLUNK_EARLIEST_TIME",
        "SPLUNK_LATEST_TIME",
        "SPLUNK_MAX_COUNT",
        "SPLUNK_AS_CONFIG_PATH",
    ]
    .into_iter()
    .map(|key| (key, None))
    .collect()
}
