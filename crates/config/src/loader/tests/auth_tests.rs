//! Authentication resolution tests.
//!
//! Responsibilities:
//! - Verify a single strategy is chosen when both credential kinds are present.
//! - Verify an explicit auth method requires its own credentials.

use secrecy::ExposeSecret;

use crate::loader::builder::ConfigLoader;
use crate::loader::error::ConfigError;
use crate::types::{AuthMethod, AuthStrategy};

fn base() -> ConfigLoader {
    ConfigLoader::new().with_url("https://splunk.example.com".to_string())
}

#[test]
fn test_token_only_uses_bearer() {
    let config = base().with_api_token("tok".to_string()).build().unwrap();
    match config.auth.strategy {
        AuthStrategy::ApiToken { token } => assert_eq!(token.expose_secret(), "tok"),
        other => panic!("expected API token, got {other:?}"),
    }
}

#[test]
fn test_both_credentials_without_method_prefers_token() {
    let config = base()
        .with_api_token("tok".to_string())
        .with_username("admin".to_string())
        .with_password("pw".to_string())
        .build()
        .unwrap();
    assert_eq!(config.auth.strategy.method(), AuthMethod::Bearer);
}

#[test]
fn test_explicit_basic_method_overrides_token_preference() {
    let config = base()
        .with_api_token("tok".to_string())
        .with_username("admin".to_string())
        .with_password("pw".to_string())
        .with_auth_method(AuthMethod::Basic)
        .build()
        .unwrap();
    assert!(matches!(
        config.auth.strategy,
        AuthStrategy::Basic { ref username, .. } if username == "admin"
    ));
}

#[test]
fn test_explicit_bearer_without_token_is_rejected() {
    let err = base()
        .with_username("admin".to_string())
        .with_password("pw".to_string())
        .with_auth_method(AuthMethod::Bearer)
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::IncompleteAuth {
            method: AuthMethod::Bearer,
            missing: "token"
        }
    ));
}

#[test]
fn test_explicit_basic_without_password_is_rejected() {
    let err = base()
        .with_username("admin".to_string())
        .with_auth_method(AuthMethod::Basic)
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::IncompleteAuth {
            missing: "password",
            ..
        }
    ));
}

#[test]
fn test_username_without_password_is_missing_auth() {
    let err = base()
        .with_username("admin".to_string())
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::MissingAuth));
}
