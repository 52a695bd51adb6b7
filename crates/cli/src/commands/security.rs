//! Security command implementation: identity, users, roles, capabilities, tokens and ACLs.

use anyhow::Result;
use clap::Subcommand;
use serde_json::json;
use splunk_as_client::ClientError;
use splunk_as_client::endpoints::security;
use splunk_as_client::models::CreateTokenParams;

use crate::commands::Session;

#[derive(Subcommand)]
pub enum SecurityCommand {
    /// Show the authenticated user
    Whoami,
    /// List authentication tokens
    ListTokens {
        #[arg(short, long, default_value_t = 0)]
        count: u64,
    },
    /// List roles
    ListRoles {
        #[arg(short, long, default_value_t = 0)]
        count: u64,
    },
    /// List users, or show one user
    ListUsers {
        /// Show only this user
        username: Option<String>,
        #[arg(short, long, default_value_t = 0)]
        count: u64,
    },
    /// Show effective capabilities (default: the authenticated user)
    Capabilities {
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Create an auth token; the token is shown only once
    CreateToken {
        /// User the token authenticates as
        #[arg(short, long)]
        name: String,
        #[arg(long)]
        audience: Option<String>,
        /// Lifetime in seconds
        #[arg(long)]
        expires: Option<u64>,
        /// Earliest use, as epoch or relative time (e.g. +1h)
        #[arg(long, allow_hyphen_values = true)]
        not_before: Option<String>,
    },
    /// Delete an auth token
    DeleteToken {
        token_id: String,
        /// Required; deleted tokens stop working immediately
        #[arg(long)]
        force: bool,
    },
    /// Show the ACL of a REST object (e.g. saved/searches/MySearch)
    Acl { path: String },
    /// Check whether the authenticated user holds a capability
    Check { capability: String },
}

pub(crate) async fn run(session: &Session, command: SecurityCommand) -> Result<()> {
    let client = &session.client;

    match command {
        SecurityCommand::Whoami => {
            let user = session.cancel.run(security::current_user(client)).await?;
            session.output.record(&user)
        }
        SecurityCommand::ListTokens { count } => {
            let tokens = session.cancel.run(security::list_tokens(client, count)).await?;
            session.output.rows(
                &tokens,
                &["name", "owner", "status", "audience", "claims.exp"],
            )
        }
        SecurityCommand::ListRoles { count } => {
            let roles = session.cancel.run(security::list_roles(client, count)).await?;
            session
                .output
                .rows(&roles, &["name", "imported_roles", "srchIndexesAllowed"])
        }
        SecurityCommand::ListUsers {
            username: Some(username),
            ..
        } => {
            let user = session
                .cancel
                .run(security::get_user(client, &username))
                .await?;
            session.output.record(&user)
        }
        SecurityCommand::ListUsers {
            username: None,
            count,
        } => {
            let users = session.cancel.run(security::list_users(client, count)).await?;
            session
                .output
                .rows(&users, &["name", "realname", "email", "roles", "defaultApp"])
        }
        SecurityCommand::Capabilities { user } => {
            let report = session
                .cancel
                .run(security::capabilities(client, user.as_deref()))
                .await?;
            session.output.record(&report)
        }
        SecurityCommand::CreateToken {
            name,
            audience,
            expires,
            not_before,
        } => {
            let params = CreateTokenParams {
                username: name,
                audience,
                expires_on: expires.map(|secs| format!("+{secs}s")),
                not_before,
            };
            let token = session.cancel.run(security::create_token(client, &params)).await?;
            let secret = token
                .token
                .as_ref()
                .and_then(|t| t.as_str())
                .unwrap_or_default();
            session.output.status(
                &format!(
                    "Token created for {} (id {})\nToken: {secret}",
                    params.username,
                    token.id.as_deref().unwrap_or("unknown"),
                ),
                json!({
                    "id": token.id,
                    "user": params.username,
                    "audience": token.audience.clone().or(params.audience.clone()),
                    "expires": token.claims.exp,
                    "token": token.token,
                }),
            )
        }
        SecurityCommand::DeleteToken { token_id, force } => {
            if !force {
                return Err(ClientError::validation(
                    "delete auth token",
                    format!("refusing to delete token '{token_id}' without --force"),
                )
                .into());
            }
            session.cancel.run(security::delete_token(client, &token_id)).await?;
            session.output.status(
                &format!("Token deleted: {token_id}"),
                json!({ "id": token_id, "status": "deleted" }),
            )
        }
        SecurityCommand::Acl { path } => {
            let acl = session.cancel.run(security::get_acl(client, &path)).await?;
            session.output.record(&acl)
        }
        SecurityCommand::Check { capability } => {
            let check = session
                .cancel
                .run(security::check_capability(client, &capability))
                .await?;
            let verdict = if check.granted { "has" } else { "does not have" };
            session.output.status(
                &format!("{} {verdict} capability '{}'", check.username, check.capability),
                serde_json::to_value(&check)?,
            )
        }
    }
}
