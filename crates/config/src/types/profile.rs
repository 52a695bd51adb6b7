//! On-disk profile file types.
//!
//! Responsibilities:
//! - Define `ConfigFile`, the JSON document holding named profiles and shared settings.
//! - Deserialize secrets directly into `SecretString`.
//!
//! Does NOT handle:
//! - Resolving which profile is active (see `loader::profile`).
//!
//! Invariants:
//! - Every field is optional so partial files are accepted.
//! - Unknown keys are ignored.

use secrecy::SecretString;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::types::auth::AuthMethod;

/// Deserialize an optional string straight into a `SecretString`.
mod optional_secret {
    use secrecy::SecretString;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.map(|s| SecretString::new(s.into())))
    }
}

/// The complete profile file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Profile used when none is requested explicitly.
    pub default_profile: Option<String>,
    /// Named connection profiles.
    pub profiles: BTreeMap<String, ProfileConfig>,
    /// Request settings shared by all profiles.
    pub api: ApiSettings,
    /// Search defaults shared by all profiles.
    pub search_defaults: SearchDefaultsFile,
}

/// One named connection profile.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Host URL, with or without a port.
    pub url: Option<String>,
    /// Management port applied when `url` has none.
    pub port: Option<u16>,
    #[serde(deserialize_with = "optional_secret::deserialize")]
    pub token: Option<SecretString>,
    pub username: Option<String>,
    #[serde(deserialize_with = "optional_secret::deserialize")]
    pub password: Option<SecretString>,
    pub auth_method: Option<AuthMethod>,
    pub verify_ssl: Option<bool>,
    /// Per-profile overrides of the shared `api` block.
    pub timeout: Option<u64>,
    pub search_timeout: Option<u64>,
    pub max_retries: Option<usize>,
}

/// Request settings block (`api`).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub timeout: Option<u64>,
    pub search_timeout: Option<u64>,
    pub max_retries: Option<usize>,
}

/// Search defaults block (`search_defaults`).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchDefaultsFile {
    pub earliest_time: Option<String>,
    pub latest_time: Option<String>,
    pub max_count: Option<u64>,
}
