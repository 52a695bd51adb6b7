//! Users, roles, the current auth context and auth tokens.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A Splunk user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub realname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "type", default)]
    pub user_type: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_helpers::strings_from_one_or_many")]
    pub roles: Vec<String>,
    #[serde(rename = "defaultApp", default)]
    pub default_app: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_helpers::strings_from_one_or_many")]
    pub capabilities: Vec<String>,
}

/// `/services/authentication/current-context` content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub realname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_helpers::strings_from_one_or_many")]
    pub roles: Vec<String>,
    #[serde(default, deserialize_with = "crate::serde_helpers::strings_from_one_or_many")]
    pub capabilities: Vec<String>,
    #[serde(rename = "defaultApp", default)]
    pub default_app: Option<String>,
}

/// A role definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "crate::serde_helpers::strings_from_one_or_many")]
    pub capabilities: Vec<String>,
    #[serde(default, deserialize_with = "crate::serde_helpers::strings_from_one_or_many")]
    pub imported_roles: Vec<String>,
    #[serde(rename = "srchFilter", default)]
    pub search_filter: Option<String>,
    #[serde(rename = "srchIndexesAllowed", default, deserialize_with = "crate::serde_helpers::strings_from_one_or_many")]
    pub search_indexes_allowed: Vec<String>,
}

/// Capabilities granted to a user, via roles.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CapabilityReport {
    pub username: String,
    pub roles: Vec<String>,
    pub capabilities: Vec<String>,
}

/// Whether a user holds one capability.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CapabilityCheck {
    pub username: String,
    pub capability: String,
    pub granted: bool,
}

/// Fields for creating an auth token.
#[derive(Debug, Clone, Default)]
pub struct CreateTokenParams {
    /// User the token authenticates as.
    pub username: String,
    pub audience: Option<String>,
    /// Absolute epoch or relative (`+30d`) expiry.
    pub expires_on: Option<String>,
    pub not_before: Option<String>,
}

/// Claims embedded in an auth token entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default, deserialize_with = "crate::serde_helpers::opt_u64_from_string_or_number")]
    pub iat: Option<u64>,
    #[serde(default, deserialize_with = "crate::serde_helpers::opt_u64_from_string_or_number")]
    pub exp: Option<u64>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub aud: Option<String>,
}

/// An auth token from `/services/authorization/tokens`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub claims: TokenClaims,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<Value>,
}
