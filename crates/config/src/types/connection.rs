//! Connection configuration types.
//!
//! Responsibilities:
//! - Define connection settings (URL, TLS verification, timeouts, retries).
//! - Define the main `Config` structure combining connection, auth and search defaults.
//!
//! Does NOT handle:
//! - Configuration loading from files/env (see `loader` module).
//! - Actual network connections (see client crate).
//!
//! Invariants:
//! - `base_url` is normalized: absolute http(s), host present, explicit port, no trailing slash.
//! - `Config` is immutable once built and passed by reference into the client.

use std::time::Duration;

use crate::loader::SearchDefaultConfig;
use crate::types::auth::AuthConfig;

/// Connection configuration for a Splunk management endpoint.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Base URL of the management endpoint (e.g. `https://splunk.example.com:8089`).
    pub base_url: String,
    /// Whether TLS certificates are verified.
    pub verify_ssl: bool,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Timeout for long-running search operations (streaming, job waits).
    pub search_timeout: Duration,
    /// Maximum number of retries for transient failures.
    pub max_retries: usize,
}

/// Resolved configuration for one CLI invocation.
#[derive(Debug, Clone)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub auth: AuthConfig,
    pub search_defaults: SearchDefaultConfig,
}
