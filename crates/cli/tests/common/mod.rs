//! Shared test utilities for splunk-as integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv and profile loading.
//! - Point the command at a mock server with token auth and no retries.
//!
//! Invariants / Assumptions:
//! - `SPLUNK_TOKEN` is set to "test-token" unless overridden.
//! - `SPLUNK_AS_CONFIG_PATH` points at a file that does not exist, so no host profile leaks in.

use assert_cmd::Command;

pub const TEST_TOKEN: &str = "test-token";

/// Returns a hermetic `splunk-as` command for integration testing.
pub fn splunk_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("splunk-as");

    cmd.env("DOTENV_DISABLED", "1")
        .env("SPLUNK_TOKEN", TEST_TOKEN)
        .env("SPLUNK_MAX_RETRIES", "0")
        .env(
            "SPLUNK_AS_CONFIG_PATH",
            std::env::temp_dir().join("splunk-as-tests-missing/config.json"),
        );

    for var in [
        "SPLUNK_URL",
        "SPLUNK_PORT",
        "SPLUNK_USERNAME",
        "SPLUNK_PASSWORD",
        "SPLUNK_AUTH_METHOD",
        "SPLUNK_VERIFY_SSL",
        "SPLUNK_TIMEOUT",
        "SPLUNK_SEARCH_TIMEOUT",
        "SPLUNK_PROFILE",
        "SPLUNK_EARLIEST_TIME",
        "SPLUNK_LATEST_TIME",
        "SPLUNK_MAX_COUNT",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }

    cmd
}

/// A hermetic command talking to `base_url`.
#[allow(dead_code)]
pub fn splunk_cmd_with_url(base_url: &str) -> Command {
    let mut cmd = splunk_cmd();
    cmd.env("SPLUNK_URL", base_url);
    cmd
}

/// Job detail response in Splunk's entry envelope.
#[allow(dead_code)]
pub fn job_entry(sid: &str, state: &str, result_count: u64) -> serde_json::Value {
    serde_json::json!({
        "entry": [{
            "name": sid,
            "content": {
                "sid": sid,
                "dispatchState": state,
                "doneProgress": if state == "DONE" { 1.0 } else { 0.4 },
                "eventCount": result_count,
                "resultCount": result_count,
                "scanCount": result_count,
                "runDuration": 1.25,
                "isDone": state == "DONE",
                "isFailed": state == "FAILED",
                "messages": if state == "FAILED" {
                    serde_json::json!([{"type": "FATAL", "text": "Error in 'search' command"}])
                } else {
                    serde_json::json!([])
                }
            }
        }]
    })
}
