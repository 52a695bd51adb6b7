//! Configuration management for the Splunk Assistant Skills CLI.
//!
//! This crate provides types and loaders for resolving a Splunk connection
//! from a JSON profile file, environment variables, and explicit overrides.
//! The result is a single immutable [`Config`] value built once at startup.

pub mod constants;
mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, SearchDefaultConfig, default_config_path, env_var_or_none};
pub use types::{
    ApiSettings, AuthConfig, AuthMethod, AuthStrategy, Config, ConfigFile, ConnectionConfig,
    ProfileConfig, SearchDefaultsFile,
};

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{Mutex, OnceLock};

    pub fn global_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }
}
