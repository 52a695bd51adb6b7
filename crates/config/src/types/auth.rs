//! Authentication types for Splunk connection configuration.
//!
//! Responsibilities:
//! - Define the authentication strategies (API token, basic auth).
//! - Parse the `auth_method` selector used by profiles and env vars.
//!
//! Does NOT handle:
//! - Signing requests (see client crate `auth` module).
//! - Choosing between strategies when both are configured (see loader builder).
//!
//! Invariants:
//! - Secrets are `SecretString`; `Debug` output never includes them.
//! - `AuthStrategy` is a sum type, so a token and a password can never both be active.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy for authenticating with Splunk.
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// API token sent as `Authorization: Bearer <token>`.
    ApiToken { token: SecretString },
    /// Username and password sent as HTTP basic auth.
    Basic {
        username: String,
        password: SecretString,
    },
}

impl AuthStrategy {
    /// The method this strategy implements.
    pub fn method(&self) -> AuthMethod {
        match self {
            Self::ApiToken { .. } => AuthMethod::Bearer,
            Self::Basic { .. } => AuthMethod::Basic,
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// The authentication strategy to use.
    pub strategy: AuthStrategy,
}

/// Explicit authentication method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    #[serde(alias = "token")]
    Bearer,
    Basic,
}

impl FromStr for AuthMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bearer" | "token" => Ok(Self::Bearer),
            "basic" => Ok(Self::Basic),
            other => Err(format!("expected 'bearer' or 'basic', got '{other}'")),
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer => write!(f, "bearer"),
            Self::Basic => write!(f, "basic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_method_parsing() {
        assert_eq!("bearer".parse::<AuthMethod>().unwrap(), AuthMethod::Bearer);
        assert_eq!("Token".parse::<AuthMethod>().unwrap(), AuthMethod::Bearer);
        assert_eq!(" basic ".parse::<AuthMethod>().unwrap(), AuthMethod::Basic);
        assert!("kerberos".parse::<AuthMethod>().is_err());
    }

    #[test]
    fn test_strategy_debug_redacts_secrets() {
        let strategy = AuthStrategy::Basic {
            username: "admin".to_string(),
            password: SecretString::new("hunter2".to_string().into()),
        };
        let debug = format!("{strategy:?}");
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));

        let strategy = AuthStrategy::ApiToken {
            token: SecretString::new("secret-token".to_string().into()),
        };
        assert!(!format!("{strategy:?}").contains("secret-token"));
        assert_eq!(strategy.method(), AuthMethod::Bearer);
    }
}
