//! URL, timeout and retry validation tests.

use std::time::Duration;

use crate::loader::builder::{ConfigLoader, validate_and_normalize_base_url};
use crate::loader::error::ConfigError;

#[test]
fn test_url_keeps_explicit_port() {
    assert_eq!(
        validate_and_normalize_base_url("https://splunk.example.com:9000/", 8089).unwrap(),
        "https://splunk.example.com:9000"
    );
}

#[test]
fn test_url_gets_default_port() {
    assert_eq!(
        validate_and_normalize_base_url("  https://splunk.example.com ", 8089).unwrap(),
        "https://splunk.example.com:8089"
    );
}

#[test]
fn test_url_rejects_bad_scheme() {
    let err = validate_and_normalize_base_url("ftp://splunk.example.com", 8089).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref var, .. } if var == "url"));
}

#[test]
fn test_url_rejects_relative() {
    assert!(validate_and_normalize_base_url("splunk.example.com", 8089).is_err());
}

#[test]
fn test_blank_url_is_missing() {
    assert!(matches!(
        validate_and_normalize_base_url("   ", 8089),
        Err(ConfigError::MissingBaseUrl)
    ));
}

#[test]
fn test_missing_url_fails_build() {
    let err = ConfigLoader::new()
        .with_api_token("tok".to_string())
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::MissingBaseUrl));
}

#[test]
fn test_zero_timeout_rejected() {
    let err = ConfigLoader::new()
        .with_url("https://localhost".to_string())
        .with_api_token("tok".to_string())
        .with_timeout(Duration::from_secs(0))
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidTimeout { .. }));
}

#[test]
fn test_excessive_retries_rejected() {
    let err = ConfigLoader::new()
        .with_url("https://localhost".to_string())
        .with_api_token("tok".to_string())
        .with_max_retries(50)
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidMaxRetries { .. }));
}

#[test]
fn test_url_keeps_explicit_scheme_default_port() {
    assert_eq!(
        validate_and_normalize_base_url("https://splunk.example.com:443", 8089).unwrap(),
        "https://splunk.example.com:443"
    );
    assert_eq!(
        validate_and_normalize_base_url("http://splunk.example.com:80/", 8089).unwrap(),
        "http://splunk.example.com:80"
    );
}

#[test]
fn test_url_default_port_with_path_and_ipv6() {
    assert_eq!(
        validate_and_normalize_base_url("https://splunk.example.com/proxy/", 8089).unwrap(),
        "https://splunk.example.com:8089/proxy"
    );
    assert_eq!(
        validate_and_normalize_base_url("https://[::1]", 8089).unwrap(),
        "https://[::1]:8089"
    );
    assert_eq!(
        validate_and_normalize_base_url("https://[::1]:443", 8089).unwrap(),
        "https://[::1]:443"
    );
}
