//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse environment variables for Splunk configuration.
//! - Apply environment variable values to a ConfigLoader instance.
//! - Provide helper functions for reading env vars with empty/whitespace filtering.
//!
//! Does NOT handle:
//! - Loading from the profile file (see profile.rs).
//! - Building the final Config (see builder.rs).
//! - .env file loading (handled by ConfigLoader::load_dotenv).
//!
//! Invariants:
//! - Environment variables take precedence over profile settings.
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Invalid values return ConfigError::InvalidValue naming the variable.

use secrecy::SecretString;
use std::str::FromStr;
use std::time::Duration;

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::types::AuthMethod;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parse an environment variable with `FromStr`, naming it in the error.
fn parse_env<T: FromStr>(key: &str, expected: &str) -> Result<Option<T>, ConfigError> {
    env_var_or_none(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|_| ConfigError::InvalidValue {
                var: key.to_string(),
                message: expected.to_string(),
            })
        })
        .transpose()
}

/// Apply environment variable configuration to the loader.
///
/// Environment variables take precedence over profile settings.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if let Some(url) = env_var_or_none("SPLUNK_URL") {
        loader.set_url(Some(url));
    }
    if let Some(port) = parse_env::<u16>("SPLUNK_PORT", "must be a port number")? {
        loader.set_port(Some(port));
    }
    if let Some(username) = env_var_or_none("SPLUNK_USERNAME") {
        loader.set_username(Some(username));
    }
    if let Some(password) = env_var_or_none("SPLUNK_PASSWORD") {
        loader.set_password(Some(SecretString::new(password.into())));
    }
    if let Some(token) = env_var_or_none("SPLUNK_TOKEN") {
        loader.set_api_token(Some(SecretString::new(token.into())));
    }
    if let Some(method) = env_var_or_none("SPLUNK_AUTH_METHOD") {
        let method = method
            .parse::<AuthMethod>()
            .map_err(|message| ConfigError::InvalidValue {
                var: "SPLUNK_AUTH_METHOD".to_string(),
                message,
            })?;
        loader.set_auth_method(Some(method));
    }
    if let Some(verify) = parse_env::<bool>("SPLUNK_VERIFY_SSL", "must be true or false")? {
        loader.set_verify_ssl(Some(verify));
    }
    if let Some(secs) = parse_env::<u64>("SPLUNK_TIMEOUT", "must be a number")? {
        loader.set_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(secs) = parse_env::<u64>("SPLUNK_SEARCH_TIMEOUT", "must be a number")? {
        loader.set_search_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(retries) =
        parse_env::<usize>("SPLUNK_MAX_RETRIES", "must be a non-negative integer")?
    {
        loader.set_max_retries(Some(retries));
    }

    // Search defaults
    if let Some(earliest) = env_var_or_none("SPLUNK_EARLIEST_TIME") {
        loader.set_earliest_time(Some(earliest));
    }
    if let Some(latest) = env_var_or_none("SPLUNK_LATEST_TIME") {
        loader.set_latest_time(Some(latest));
    }
    if let Some(max_count) = parse_env::<u64>("SPLUNK_MAX_COUNT", "must be a number")? {
        loader.set_max_count(Some(max_count));
    }
    Ok(())
}
