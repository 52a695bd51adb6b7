//! Error types for configuration loading.
//!
//! Responsibilities:
//! - Define error variants for all configuration loading failures.
//!
//! Does NOT handle:
//! - Errors raised while talking to Splunk (see client crate).
//!
//! Invariants:
//! - All error variants include context for debugging (variable names, paths, etc.).
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

use crate::types::AuthMethod;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Splunk URL is required. Set SPLUNK_URL or configure a profile.")]
    MissingBaseUrl,

    #[error("Authentication configuration is required (either SPLUNK_TOKEN or SPLUNK_USERNAME/SPLUNK_PASSWORD)")]
    MissingAuth,

    #[error("auth_method is '{method}' but {missing} is not configured")]
    IncompleteAuth {
        method: AuthMethod,
        missing: &'static str,
    },

    #[error("Unable to determine config directory")]
    ConfigDirUnavailable,

    #[error("Failed to read config file at {path}")]
    ConfigFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}")]
    ConfigFileParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Profile '{0}' not found in config file")]
    ProfileNotFound(String),

    #[error("invalid timeout: {message}")]
    InvalidTimeout { message: String },

    #[error("invalid max_retries: {message}")]
    InvalidMaxRetries { message: String },

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}
