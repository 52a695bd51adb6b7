//! Profile file loading for configuration.
//!
//! Responsibilities:
//! - Locate and parse the JSON profile file.
//! - Select the active profile (explicit name, `SPLUNK_PROFILE`, or `default_profile`).
//! - Apply profile and shared `api`/`search_defaults` settings to a ConfigLoader.
//!
//! Does NOT handle:
//! - Environment variable parsing for connection settings (see env.rs).
//! - Building the final Config (see builder.rs).
//!
//! Invariants:
//! - Profile settings are applied before environment variables (env vars take precedence).
//! - A missing file is not an error unless a profile was explicitly requested.
//! - Profile-level request settings override the shared `api` block.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::builder::ConfigLoader;
use super::env::env_var_or_none;
use super::error::ConfigError;
use crate::types::{ConfigFile, ProfileConfig};

/// Returns the default path to the profile file.
///
/// `SPLUNK_AS_CONFIG_PATH` overrides the platform location:
/// - Linux/macOS: `~/.config/splunk-as/config.json`
/// - Windows: `%AppData%\splunk-as\config.json`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = env_var_or_none("SPLUNK_AS_CONFIG_PATH") {
        return Ok(PathBuf::from(path));
    }
    let proj_dirs = directories::ProjectDirs::from("", "", "splunk-as")
        .ok_or(ConfigError::ConfigDirUnavailable)?;
    Ok(proj_dirs.config_dir().join("config.json"))
}

/// Read and parse the profile file.
pub(crate) fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::ConfigFileParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Apply profile configuration from the profile file to the loader.
///
/// If an explicitly requested profile is not found, this records the
/// missing profile name for later error handling in `build()`.
pub fn apply_profile(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if loader.profile_name().is_none() {
        loader.set_profile_name(env_var_or_none("SPLUNK_PROFILE"));
    }

    let config_path = match loader.config_path() {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };

    if !config_path.exists() {
        if let Some(name) = loader.profile_name().cloned() {
            loader.set_profile_missing(Some(name));
        }
        return Ok(());
    }

    let file = read_config_file(&config_path)?;
    tracing::debug!(path = %config_path.display(), "Loaded profile file");

    apply_shared_settings(loader, &file);

    let profile_name = match loader
        .profile_name()
        .cloned()
        .or_else(|| file.default_profile.clone())
    {
        Some(name) => name,
        None => return Ok(()),
    };

    match file.profiles.get(&profile_name) {
        Some(profile) => apply_profile_config(loader, profile),
        None => loader.set_profile_missing(Some(profile_name)),
    }
    Ok(())
}

fn apply_shared_settings(loader: &mut ConfigLoader, file: &ConfigFile) {
    if let Some(secs) = file.api.timeout {
        loader.set_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(secs) = file.api.search_timeout {
        loader.set_search_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(retries) = file.api.max_retries {
        loader.set_max_retries(Some(retries));
    }
    if let Some(earliest) = &file.search_defaults.earliest_time {
        loader.set_earliest_time(Some(earliest.clone()));
    }
    if let Some(latest) = &file.search_defaults.latest_time {
        loader.set_latest_time(Some(latest.clone()));
    }
    if let Some(max_count) = file.search_defaults.max_count {
        loader.set_max_count(Some(max_count));
    }
}

/// Apply profile configuration values to the loader.
fn apply_profile_config(loader: &mut ConfigLoader, profile: &ProfileConfig) {
    if let Some(url) = &profile.url {
        loader.set_url(Some(url.clone()));
    }
    if let Some(port) = profile.port {
        loader.set_port(Some(port));
    }
    if let Some(username) = &profile.username {
        loader.set_username(Some(username.clone()));
    }
    if let Some(password) = &profile.password {
        loader.set_password(Some(password.clone()));
    }
    if let Some(token) = &profile.token {
        loader.set_api_token(Some(token.clone()));
    }
    if let Some(method) = profile.auth_method {
        loader.set_auth_method(Some(method));
    }
    if let Some(verify) = profile.verify_ssl {
        loader.set_verify_ssl(Some(verify));
    }
    if let Some(secs) = profile.timeout {
        loader.set_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(secs) = profile.search_timeout {
        loader.set_search_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(retries) = profile.max_retries {
        loader.set_max_retries(Some(retries));
    }
}
