//! Configuration context for command execution.
//!
//! Responsibilities:
//! - Resolve the connection configuration from profile, environment and CLI flags.
//! - Distinguish at the type level between commands that connect and those that don't.
//!
//! Does NOT handle:
//! - Loading `.env` (done in `main()` before argument parsing).
//!
//! Invariants:
//! - A placeholder context can never be turned into a client.

use splunk_as_config::{Config, ConfigError, ConfigLoader};

use crate::args::Cli;

/// Configuration handed to the dispatcher.
pub(crate) enum ConfigCommandContext {
    /// A validated config; every connected command needs one.
    Real(Box<Config>),
    /// Offline commands (`search validate`) run without connection details.
    Placeholder,
}

impl ConfigCommandContext {
    /// Extract the real config, failing if this is a placeholder.
    pub(crate) fn into_real_config(self) -> anyhow::Result<Config> {
        match self {
            ConfigCommandContext::Real(config) => Ok(*config),
            ConfigCommandContext::Placeholder => anyhow::bail!(
                "Internal error: attempted to use placeholder config for an operation requiring connection details"
            ),
        }
    }
}

/// Merge profile file, environment and CLI flags, lowest to highest precedence.
pub(crate) fn load_config(cli: &Cli) -> Result<Config, ConfigError> {
    let mut loader = ConfigLoader::new();

    // Blank values fall back to SPLUNK_AS_CONFIG_PATH / SPLUNK_PROFILE.
    if let Some(path) = cli
        .config_path
        .as_ref()
        .filter(|p| !p.as_os_str().to_string_lossy().trim().is_empty())
    {
        loader = loader.with_config_path(path.clone());
    }
    if let Some(profile) = cli.profile.as_ref().filter(|p| !p.trim().is_empty()) {
        loader = loader.with_profile_name(profile.clone());
    }

    loader = loader.from_profile()?.from_env()?;

    if let Some(url) = &cli.base_url {
        loader = loader.with_url(url.clone());
    }

    loader.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_cannot_connect() {
        let err = ConfigCommandContext::Placeholder
            .into_real_config()
            .unwrap_err();
        assert!(err.to_string().contains("placeholder"));
    }
}
