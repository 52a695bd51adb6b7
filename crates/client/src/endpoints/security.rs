//! Users, roles, capabilities and auth tokens.

use std::collections::BTreeSet;

use crate::client::{RequestBody, SplunkClient};
use crate::endpoints::encode_path_segment;
use crate::error::{ClientError, Result};
use crate::models::{
    Acl, CapabilityCheck, CapabilityReport, CreateTokenParams, CurrentUser, Role, TokenInfo, User,
};
use crate::retry::Idempotency;

/// The identity behind the client's credentials.
pub async fn current_user(client: &SplunkClient) -> Result<CurrentUser> {
    const OPERATION: &str = "get current user";

    client
        .get("/services/authentication/current-context", &[], None, OPERATION)
        .await?
        .into_first_entry(OPERATION)?
        .into_model(OPERATION)
}

pub async fn list_users(client: &SplunkClient, count: u64) -> Result<Vec<User>> {
    const OPERATION: &str = "list users";

    client
        .get(
            "/services/authentication/users",
            &[("count", count.to_string())],
            None,
            OPERATION,
        )
        .await?
        .into_entries(OPERATION)?
        .entry
        .into_iter()
        .map(|entry| entry.into_model(OPERATION))
        .collect()
}

pub async fn get_user(client: &SplunkClient, username: &str) -> Result<User> {
    const OPERATION: &str = "get user";

    if username.trim().is_empty() {
        return Err(ClientError::validation(OPERATION, "username cannot be empty"));
    }
    client
        .get(
            &format!("/services/authentication/users/{}", encode_path_segment(username)),
            &[],
            None,
            OPERATION,
        )
        .await?
        .into_first_entry(OPERATION)?
        .into_model(OPERATION)
}

pub async fn list_roles(client: &SplunkClient, count: u64) -> Result<Vec<Role>> {
    const OPERATION: &str = "list roles";

    client
        .get(
            "/services/authorization/roles",
            &[("count", count.to_string())],
            None,
            OPERATION,
        )
        .await?
        .into_entries(OPERATION)?
        .entry
        .into_iter()
        .map(|entry| entry.into_model(OPERATION))
        .collect()
}

/// Capabilities of `username`, or of the current user when `None`.
///
/// Capabilities are sorted and deduplicated.
pub async fn capabilities(client: &SplunkClient, username: Option<&str>) -> Result<CapabilityReport> {
    let (username, roles, capabilities) = match username {
        Some(name) => {
            let user = get_user(client, name).await?;
            (user.name, user.roles, user.capabilities)
        }
        None => {
            let user = current_user(client).await?;
            (user.username, user.roles, user.capabilities)
        }
    };

    let capabilities: BTreeSet<String> = capabilities.into_iter().collect();
    Ok(CapabilityReport {
        username,
        roles,
        capabilities: capabilities.into_iter().collect(),
    })
}

/// List auth tokens. Token secrets are never returned by this endpoint.
pub async fn list_tokens(client: &SplunkClient, count: u64) -> Result<Vec<TokenInfo>> {
    const OPERATION: &str = "list auth tokens";

    client
        .get(
            "/services/authorization/tokens",
            &[("count", count.to_string())],
            None,
            OPERATION,
        )
        .await?
        .into_entries(OPERATION)?
        .entry
        .into_iter()
        .map(|entry| entry.into_model(OPERATION))
        .collect()
}

/// Create an auth token. The returned entry carries the token secret, which
/// Splunk shows only once.
pub async fn create_token(client: &SplunkClient, params: &CreateTokenParams) -> Result<TokenInfo> {
    const OPERATION: &str = "create auth token";

    let username = params.username.trim();
    if username.is_empty() {
        return Err(ClientError::validation(OPERATION, "token user cannot be empty"));
    }
    let mut form = vec![("name".to_string(), username.to_string())];
    let optional = [
        ("audience", &params.audience),
        ("expires_on", &params.expires_on),
        ("not_before", &params.not_before),
    ];
    for (name, value) in optional {
        if let Some(value) = value {
            form.push((name.to_string(), value.clone()));
        }
    }

    client
        .post(
            "/services/authorization/tokens",
            RequestBody::Form(form),
            Idempotency::NonIdempotent,
            None,
            OPERATION,
        )
        .await?
        .into_first_entry(OPERATION)?
        .into_model(OPERATION)
}

pub async fn delete_token(client: &SplunkClient, token_id: &str) -> Result<()> {
    const OPERATION: &str = "delete auth token";

    let token_id = token_id.trim();
    if token_id.is_empty() {
        return Err(ClientError::validation(OPERATION, "token id cannot be empty"));
    }
    client
        .delete(
            &format!("/services/authorization/tokens/{}", encode_path_segment(token_id)),
            &[],
            OPERATION,
        )
        .await?;
    Ok(())
}

/// The `/acl` path for a REST object such as `saved/searches/My Search`.
///
/// Objects may be given relative to `/services` or as a full `/services` or
/// `/servicesNS` path. Each segment is encoded.
pub fn acl_path(object: &str) -> Result<String> {
    const OPERATION: &str = "get ACL";

    let segments: Vec<&str> = object
        .trim()
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    let segments = match segments.split_last() {
        Some((&"acl", rest)) => rest,
        _ => &segments[..],
    };
    if segments.is_empty() {
        return Err(ClientError::validation(OPERATION, "object path cannot be empty"));
    }
    if segments.iter().any(|s| *s == "." || *s == "..") {
        return Err(ClientError::validation(
            OPERATION,
            format!("object path '{object}' cannot contain '.' or '..' segments"),
        ));
    }

    let encoded: Vec<String> = segments.iter().map(|s| encode_path_segment(s)).collect();
    let joined = encoded.join("/");
    Ok(match segments[0] {
        "services" | "servicesNS" => format!("/{joined}/acl"),
        _ => format!("/services/{joined}/acl"),
    })
}

/// Ownership and permissions of a REST object.
pub async fn get_acl(client: &SplunkClient, object: &str) -> Result<Acl> {
    const OPERATION: &str = "get ACL";

    let entry = client
        .get(&acl_path(object)?, &[], None, OPERATION)
        .await?
        .into_first_entry(OPERATION)?;
    match entry.acl.clone() {
        Some(acl) => Ok(acl),
        None => entry.into_model(OPERATION),
    }
}

/// Whether the current user holds `capability`.
pub async fn check_capability(client: &SplunkClient, capability: &str) -> Result<CapabilityCheck> {
    let capability = capability.trim();
    if capability.is_empty() {
        return Err(ClientError::validation("check capability", "capability cannot be empty"));
    }
    let report = capabilities(client, None).await?;
    Ok(CapabilityCheck {
        granted: report.capabilities.iter().any(|c| c == capability),
        username: report.username,
        capability: capability.to_string(),
    })
}
