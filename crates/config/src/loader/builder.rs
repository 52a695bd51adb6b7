//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` for hierarchical configuration merging.
//! - Support loading from environment variables, the profile file, and direct builder methods.
//! - Resolve a single authentication strategy from whatever credentials were supplied.
//! - Build the final `Config` with validated connection settings.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//! - Profile file loading logic (delegated to profile.rs).
//!
//! Invariants / Assumptions:
//! - Environment variables take precedence over profile file values.
//! - Builder methods called after `from_env()` take precedence over environment variables.
//! - An explicit `auth_method` always wins; without one, an API token beats basic credentials.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.

use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;
use url::Position;

use super::defaults::SearchDefaultConfig;
use super::env::apply_env;
use super::error::ConfigError;
use super::profile::apply_profile;
use crate::constants::{
    DEFAULT_MAX_RETRIES, DEFAULT_SEARCH_TIMEOUT_SECS, DEFAULT_SPLUNK_PORT, DEFAULT_TIMEOUT_SECS,
    MAX_MAX_RETRIES, MAX_SEARCH_TIMEOUT_SECS, MAX_TIMEOUT_SECS,
};
use crate::types::{AuthConfig, AuthMethod, AuthStrategy, Config, ConnectionConfig};

/// Configuration loader that builds config from environment variables and profiles.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    url: Option<String>,
    port: Option<u16>,
    username: Option<String>,
    password: Option<SecretString>,
    api_token: Option<SecretString>,
    auth_method: Option<AuthMethod>,
    verify_ssl: Option<bool>,
    timeout: Option<Duration>,
    search_timeout: Option<Duration>,
    max_retries: Option<usize>,
    profile_name: Option<String>,
    profile_missing: Option<String>,
    config_path: Option<PathBuf>,
    earliest_time: Option<String>,
    latest_time: Option<String>,
    max_count: Option<u64>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` environment variable is set to "true" or "1",
    /// the .env file will not be loaded (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the `.env` file exists but has invalid syntax or
    /// cannot be read. Missing `.env` files are silently ignored.
    ///
    /// SAFETY: Error messages never include raw .env line contents to prevent secret leakage.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Set the active profile name to load from the config file.
    pub fn with_profile_name(mut self, name: String) -> Self {
        self.profile_name = Some(name);
        self
    }

    /// Override the config file path (primarily for testing).
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Read configuration from a profile in the config file.
    ///
    /// If an explicitly requested profile is not found, the name is recorded
    /// for later error handling in `build()`.
    pub fn from_profile(mut self) -> Result<Self, ConfigError> {
        apply_profile(&mut self)?;
        Ok(self)
    }

    /// Read configuration from environment variables.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    /// Set the Splunk URL (with or without a port).
    pub fn with_url(mut self, url: String) -> Self {
        self.url = Some(url);
        self
    }

    /// Set the management port used when the URL has none.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the username.
    pub fn with_username(mut self, username: String) -> Self {
        self.username = Some(username);
        self
    }

    /// Set the password.
    pub fn with_password(mut self, password: String) -> Self {
        self.password = Some(SecretString::new(password.into()));
        self
    }

    /// Set the API token.
    pub fn with_api_token(mut self, token: String) -> Self {
        self.api_token = Some(SecretString::new(token.into()));
        self
    }

    /// Force a specific authentication method.
    pub fn with_auth_method(mut self, method: AuthMethod) -> Self {
        self.auth_method = Some(method);
        self
    }

    /// Set whether TLS certificates are verified.
    pub fn with_verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = Some(verify);
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the search timeout.
    pub fn with_search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = Some(timeout);
        self
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Check if we have a complete configuration (url + auth).
    fn has_complete_config(&self) -> bool {
        let has_complete_auth =
            self.api_token.is_some() || (self.username.is_some() && self.password.is_some());
        self.url.is_some() && has_complete_auth
    }

    /// Build the final configuration.
    pub fn build(self) -> Result<Config, ConfigError> {
        if let Some(ref profile_name) = self.profile_missing {
            // Only suppress ProfileNotFound if we have a complete config from env/CLI
            if !self.has_complete_config() {
                return Err(ConfigError::ProfileNotFound(profile_name.clone()));
            }
        }

        let base_url = match self.url.as_deref() {
            Some(raw) => {
                validate_and_normalize_base_url(raw, self.port.unwrap_or(DEFAULT_SPLUNK_PORT))?
            }
            None => return Err(ConfigError::MissingBaseUrl),
        };

        let strategy = resolve_auth_strategy(
            self.auth_method,
            self.api_token,
            self.username,
            self.password,
        )?;

        let connection = ConnectionConfig {
            base_url,
            verify_ssl: self.verify_ssl.unwrap_or(true),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            search_timeout: self
                .search_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS)),
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
        };
        validate_connection(&connection)?;

        let defaults = SearchDefaultConfig::default();
        let search_defaults = SearchDefaultConfig {
            earliest_time: self.earliest_time.unwrap_or(defaults.earliest_time),
            latest_time: self.latest_time.unwrap_or(defaults.latest_time),
            max_count: self.max_count.unwrap_or(defaults.max_count),
        };

        Ok(Config {
            connection,
            auth: AuthConfig { strategy },
            search_defaults,
        })
    }

    // Internal accessor methods for use by other loader modules

    pub(crate) fn profile_name(&self) -> Option<&String> {
        self.profile_name.as_ref()
    }

    pub(crate) fn config_path(&self) -> Option<&PathBuf> {
        self.config_path.as_ref()
    }

    pub(crate) fn set_profile_name(&mut self, name: Option<String>) {
        self.profile_name = name;
    }

    pub(crate) fn set_profile_missing(&mut self, name: Option<String>) {
        self.profile_missing = name;
    }

    pub(crate) fn set_url(&mut self, url: Option<String>) {
        self.url = url;
    }

    pub(crate) fn set_port(&mut self, port: Option<u16>) {
        self.port = port;
    }

    pub(crate) fn set_username(&mut self, username: Option<String>) {
        self.username = username;
    }

    pub(crate) fn set_password(&mut self, password: Option<SecretString>) {
        self.password = password;
    }

    pub(crate) fn set_api_token(&mut self, token: Option<SecretString>) {
        self.api_token = token;
    }

    pub(crate) fn set_auth_method(&mut self, method: Option<AuthMethod>) {
        self.auth_method = method;
    }

    pub(crate) fn set_verify_ssl(&mut self, verify: Option<bool>) {
        self.verify_ssl = verify;
    }

    pub(crate) fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub(crate) fn set_search_timeout(&mut self, timeout: Option<Duration>) {
        self.search_timeout = timeout;
    }

    pub(crate) fn set_max_retries(&mut self, retries: Option<usize>) {
        self.max_retries = retries;
    }

    pub(crate) fn set_earliest_time(&mut self, earliest: Option<String>) {
        self.earliest_time = earliest;
    }

    pub(crate) fn set_latest_time(&mut self, latest: Option<String>) {
        self.latest_time = latest;
    }

    pub(crate) fn set_max_count(&mut self, max_count: Option<u64>) {
        self.max_count = max_count;
    }
}

/// Pick exactly one authentication strategy.
///
/// An explicit `auth_method` selects the strategy and requires its
/// credentials. Without one, an API token is preferred over basic
/// credentials and the ignored username is logged.
fn resolve_auth_strategy(
    method: Option<AuthMethod>,
    token: Option<SecretString>,
    username: Option<String>,
    password: Option<SecretString>,
) -> Result<AuthStrategy, ConfigError> {
    match method {
        Some(AuthMethod::Bearer) => token
            .map(|token| AuthStrategy::ApiToken { token })
            .ok_or(ConfigError::IncompleteAuth {
                method: AuthMethod::Bearer,
                missing: "token",
            }),
        Some(AuthMethod::Basic) => match (username, password) {
            (Some(username), Some(password)) => Ok(AuthStrategy::Basic { username, password }),
            (None, _) => Err(ConfigError::IncompleteAuth {
                method: AuthMethod::Basic,
                missing: "username",
            }),
            (Some(_), None) => Err(ConfigError::IncompleteAuth {
                method: AuthMethod::Basic,
                missing: "password",
            }),
        },
        None => match (token, username, password) {
            (Some(token), username, password) => {
                if username.is_some() || password.is_some() {
                    tracing::warn!(
                        username = username.as_deref().unwrap_or(""),
                        "Both an API token and basic credentials are configured; using the API token. \
                         Set auth_method to choose explicitly."
                    );
                }
                Ok(AuthStrategy::ApiToken { token })
            }
            (None, Some(username), Some(password)) => {
                Ok(AuthStrategy::Basic { username, password })
            }
            _ => Err(ConfigError::MissingAuth),
        },
    }
}

fn validate_connection(connection: &ConnectionConfig) -> Result<(), ConfigError> {
    let timeout_secs = connection.timeout.as_secs();
    if timeout_secs == 0 {
        return Err(ConfigError::InvalidTimeout {
            message: "timeout must be greater than 0 seconds".to_string(),
        });
    }
    if timeout_secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::InvalidTimeout {
            message: format!(
                "timeout exceeds maximum allowed value of {} seconds",
                MAX_TIMEOUT_SECS
            ),
        });
    }

    let search_secs = connection.search_timeout.as_secs();
    if search_secs == 0 || search_secs > MAX_SEARCH_TIMEOUT_SECS {
        return Err(ConfigError::InvalidTimeout {
            message: format!(
                "search_timeout must be between 1 and {} seconds (got {})",
                MAX_SEARCH_TIMEOUT_SECS, search_secs
            ),
        });
    }

    if connection.max_retries > MAX_MAX_RETRIES {
        return Err(ConfigError::InvalidMaxRetries {
            message: format!(
                "must be between 0 and {} (got {})",
                MAX_MAX_RETRIES, connection.max_retries
            ),
        });
    }

    Ok(())
}

/// Validates and normalizes a Splunk URL.
///
/// Validation rules:
/// - Trim surrounding whitespace; blank is treated as missing
/// - Parse as an absolute URL with an http or https scheme and a host
/// - Apply `default_port` when the URL carries no explicit port
/// - Strip any trailing slash
pub(crate) fn validate_and_normalize_base_url(
    raw: &str,
    default_port: u16,
) -> Result<String, ConfigError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ConfigError::MissingBaseUrl);
    }

    let mut parsed = url::Url::parse(trimmed).map_err(|e| ConfigError::InvalidValue {
        var: "url".into(),
        message: format!(
            "must be an absolute http(s) URL with a host (e.g. https://localhost:8089): {e}"
        ),
    })?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ConfigError::InvalidValue {
            var: "url".into(),
            message: format!(
                "scheme must be http or https (e.g. https://localhost:8089), got: {scheme}"
            ),
        });
    }

    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidValue {
            var: "url".into(),
            message: "host is required (e.g. https://localhost:8089)".into(),
        });
    }

    if parsed.port().is_some() {
        return Ok(parsed.as_str().trim_end_matches('/').to_string());
    }

    // `Url` hides a port equal to the scheme default, so an explicit
    // `:443` or `:80` has to be read from the raw authority.
    let port = if has_explicit_port(trimmed) {
        parsed.port_or_known_default().unwrap_or(default_port)
    } else {
        default_port
    };
    parsed
        .set_port(Some(port))
        .map_err(|_| ConfigError::InvalidValue {
            var: "port".into(),
            message: format!("cannot apply port {port} to {trimmed}"),
        })?;

    let host = parsed.host_str().unwrap_or_default();
    let userinfo = &parsed[Position::BeforeUsername..Position::AfterPassword];
    let at = if userinfo.is_empty() { "" } else { "@" };
    let tail = &parsed[Position::BeforePath..];
    let normalized = format!("{}://{userinfo}{at}{host}:{port}{tail}", parsed.scheme());
    Ok(normalized.trim_end_matches('/').to_string())
}

/// Whether the authority of `raw` spells out a port, default or not.
fn has_explicit_port(raw: &str) -> bool {
    let after_scheme = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let authority = after_scheme.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    let port_part = match host_port.strip_prefix('[') {
        Some(v6) => v6.split_once(']').map_or("", |(_, rest)| rest),
        None => host_port,
    };
    port_part
        .rsplit_once(':')
        .is_some_and(|(_, port)| !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()))
}
