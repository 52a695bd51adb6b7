//! Integration tests for configuration loading through the public API.
//!
//! These tests drive the `ConfigLoader` builder chain the way the CLI does:
//! profile file first, then environment, then explicit overrides.

use secrecy::ExposeSecret;
use serial_test::serial;
use splunk_as_config::{AuthStrategy, ConfigError, ConfigLoader, SearchDefaultConfig};
use std::time::Duration;
use tempfile::TempDir;

const SPLUNK_VARS: &[&str] = &[
    "SPLUNK_URL",
    "SPLUNK_PORT",
    "SPLUNK_USERNAME",
    "SPLUNK_PASSWORD",
    "SPLUNK_TOKEN",
    "SPLUNK_AUTH_METHOD",
    "SPLUNK_VERIFY_SSL",
    "SPLUNK_TIMEOUT",
    "SPLUNK_SEARCH_TIMEOUT",
    "SPLUNK_MAX_RETRIES",
    "SPLUNK_PROFILE",
    "SPLUNK_EARLIEST_TIME",
    "SPLUNK_LATEST_TIME",
    "SPLUNK_MAX_COUNT",
    "SPLUNK_AS_CONFIG_PATH",
];

fn cleared() -> Vec<(&'static str, Option<&'static str>)> {
    SPLUNK_VARS.iter().map(|k| (*k, None)).collect()
}

fn write_config(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("config.json");
    let doc = serde_json::json!({
        "default_profile": "lab",
        "profiles": {
            "lab": {
                "url": "https://splunk.lab.example",
                "token": "lab-token",
                "verify_ssl": false
            }
        },
        "api": {"timeout": 20}
    });
    std::fs::write(&path, doc.to_string()).unwrap();
    path
}

#[test]
#[serial]
fn test_explicit_overrides_build_a_config() {
    temp_env::with_vars(cleared(), || {
        let config = ConfigLoader::new()
            .with_url("https://cli-override.example:8089".to_string())
            .with_api_token("cli-token".to_string())
            .build()
            .expect("should build with explicit overrides");

        assert_eq!(
            config.connection.base_url,
            "https://cli-override.example:8089"
        );
        assert!(matches!(
            config.auth.strategy,
            AuthStrategy::ApiToken { .. }
        ));
        assert_eq!(config.search_defaults, SearchDefaultConfig::default());
    });
}

#[test]
#[serial]
fn test_profile_then_env_precedence() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir);

    let mut vars = cleared();
    vars.retain(|(k, _)| *k != "SPLUNK_TOKEN");
    vars.push(("SPLUNK_TOKEN", Some("env-token")));

    temp_env::with_vars(vars, || {
        let config = ConfigLoader::new()
            .with_config_path(path.clone())
            .from_profile()
            .unwrap()
            .from_env()
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.connection.base_url, "https://splunk.lab.example:8089");
        assert!(!config.connection.verify_ssl);
        assert_eq!(config.connection.timeout, Duration::from_secs(20));
        match config.auth.strategy {
            AuthStrategy::ApiToken { token } => assert_eq!(token.expose_secret(), "env-token"),
            other => panic!("expected token auth, got {other:?}"),
        }
    });
}

#[test]
#[serial]
fn test_missing_credentials_is_an_error() {
    temp_env::with_vars(cleared(), || {
        let err = ConfigLoader::new()
            .with_url("https://localhost".to_string())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingAuth));
    });
}

#[test]
#[serial]
fn test_unknown_profile_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir);

    temp_env::with_vars(cleared(), || {
        let err = ConfigLoader::new()
            .with_profile_name("staging".to_string())
            .with_config_path(path.clone())
            .from_profile()
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ProfileNotFound(name) if name == "staging"));
    });
}
