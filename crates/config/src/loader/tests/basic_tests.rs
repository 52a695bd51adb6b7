//! Basic builder tests for the configuration loader.

use std::time::Duration;

use crate::constants::{DEFAULT_MAX_RETRIES, DEFAULT_SEARCH_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};
use crate::loader::builder::ConfigLoader;
use crate::types::AuthStrategy;

#[test]
fn test_builder_defaults() {
    let config = ConfigLoader::new()
        .with_url("https://localhost".to_string())
        .with_api_token("token".to_string())
        .build()
        .unwrap();

    assert_eq!(config.connection.base_url, "https://localhost:8089");
    assert!(config.connection.verify_ssl);
    assert_eq!(
        config.connection.timeout,
        Duration::from_secs(DEFAULT_TIMEOUT_SECS)
    );
    assert_eq!(
        config.connection.search_timeout,
        Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS)
    );
    assert_eq!(config.connection.max_retries, DEFAULT_MAX_RETRIES);
    assert_eq!(config.search_defaults.earliest_time, "-24h");
    assert_eq!(config.search_defaults.latest_time, "now");
    assert_eq!(config.search_defaults.max_count, 50000);
}

#[test]
fn test_builder_overrides() {
    let config = ConfigLoader::new()
        .with_url("http://splunk.local".to_string())
        .with_port(9089)
        .with_username("admin".to_string())
        .with_password("changeme".to_string())
        .with_verify_ssl(false)
        .with_timeout(Duration::from_secs(10))
        .with_search_timeout(Duration::from_secs(60))
        .with_max_retries(0)
        .build()
        .unwrap();

    assert_eq!(config.connection.base_url, "http://splunk.local:9089");
    assert!(!config.connection.verify_ssl);
    assert_eq!(config.connection.timeout, Duration::from_secs(10));
    assert_eq!(config.connection.search_timeout, Duration::from_secs(60));
    assert_eq!(config.connection.max_retries, 0);
    assert!(matches!(
        config.auth.strategy,
        AuthStrategy::Basic { ref username, .. } if username == "admin"
    ));
}
