//! Client builder for constructing [`SplunkClient`] instances.
//!
//! This module is responsible for:
//! - Providing a fluent builder API for client configuration
//! - Converting a resolved [`Config`] into client settings
//! - Normalizing the base URL (removing trailing slashes)
//! - Configuring the underlying HTTP client (timeouts, TLS verification)
//!
//! # What this module does NOT handle:
//! - Actual API calls (see [`SplunkClient`] methods in `mod.rs`)
//! - Choosing between token and basic credentials (settled by the config loader)
//!
//! # Invariants
//! - `base_url` and `auth_strategy` are required fields and must be provided before calling `build()`
//! - The base URL is always normalized to have no trailing slashes
//! - `skip_verify` only affects HTTPS connections; HTTP connections log a warning

use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::AuthStrategy;
use crate::client::SplunkClient;
use crate::clock::{Clock, TokioClock};
use crate::error::{ClientError, Result};
use crate::retry::RetryPolicy;
use splunk_as_config::{
    Config,
    constants::{DEFAULT_SEARCH_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS},
};

/// Builder for creating a new [`SplunkClient`].
pub struct SplunkClientBuilder {
    base_url: Option<String>,
    auth_strategy: Option<AuthStrategy>,
    skip_verify: bool,
    timeout: Duration,
    search_timeout: Duration,
    retry: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl Default for SplunkClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            auth_strategy: None,
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            search_timeout: Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
            clock: Arc::new(TokioClock),
        }
    }
}

impl SplunkClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL of the Splunk management endpoint, e.g. `https://localhost:8089`.
    pub fn base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Set the authentication strategy.
    pub fn auth_strategy(mut self, strategy: AuthStrategy) -> Self {
        self.auth_strategy = Some(strategy);
        self
    }

    /// Set whether to skip TLS certificate verification.
    ///
    /// # Security Warning
    /// Only use this in development or testing environments. Disabling TLS
    /// verification makes the connection vulnerable to man-in-the-middle attacks.
    pub fn skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = skip;
        self
    }

    /// Set the per-request timeout. Default is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the timeout for streaming and other long-running search calls.
    pub fn search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = timeout;
        self
    }

    /// Set the number of retries after the first attempt.
    pub fn max_retries(mut self, retries: usize) -> Self {
        self.retry.max_attempts = retries.saturating_add(1);
        self
    }

    /// Replace the whole retry policy.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Inject the clock used for backoff and poll sleeps.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Create a client builder from configuration.
    pub fn from_config(mut self, config: &Config) -> Self {
        self.base_url = Some(config.connection.base_url.clone());
        self.auth_strategy = Some(config.auth.strategy.clone());
        self.skip_verify = !config.connection.verify_ssl;
        self.timeout = config.connection.timeout;
        self.search_timeout = config.connection.search_timeout;
        self.retry = RetryPolicy::with_max_retries(config.connection.max_retries);
        self
    }

    /// Build the [`SplunkClient`] with the configured options.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `base_url` is missing or unparsable.
    /// Returns [`ClientError::Validation`] if `auth_strategy` was not provided.
    pub fn build(self) -> Result<SplunkClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::InvalidUrl("base_url is required".to_string()))?;
        let base_url = base_url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;

        let auth = self.auth_strategy.ok_or_else(|| {
            ClientError::validation("build client", "an authentication strategy is required")
        })?;

        let mut http_builder = reqwest::Client::builder().timeout(self.timeout);

        if self.skip_verify {
            if parsed.scheme() == "https" {
                tracing::warn!(
                    base_url = %base_url,
                    "TLS certificate verification is disabled"
                );
                http_builder = http_builder.danger_accept_invalid_certs(true);
            } else {
                tracing::warn!(
                    "verify_ssl=false has no effect on HTTP URLs. TLS verification only applies to HTTPS connections."
                );
            }
        }

        let http = http_builder
            .build()
            .map_err(|source| ClientError::Transport {
                operation: "build HTTP client".to_string(),
                source,
            })?;

        Ok(SplunkClient {
            http,
            base_url,
            auth,
            timeout: self.timeout,
            search_timeout: self.search_timeout,
            retry: self.retry,
            clock: self.clock,
        })
    }
}
