//! Admin command implementation: server info, health and raw REST calls.

use anyhow::{Result, bail};
use clap::Subcommand;
use splunk_as_client::Idempotency;
use splunk_as_client::endpoints::server;

use crate::commands::Session;

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Show server name, version and roles
    Info,
    /// Show splunkd health and any unhealthy features
    Health,
    /// GET any REST path, e.g. /services/server/settings
    RestGet {
        path: String,
        /// Query parameter as key=value (repeatable)
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
    /// POST a form to any REST path
    RestPost {
        path: String,
        /// Form field as key=value (repeatable)
        #[arg(short, long = "data", value_name = "KEY=VALUE")]
        data: Vec<String>,
        /// Allow the request to be retried on server errors and timeouts
        #[arg(long)]
        idempotent: bool,
    },
}

pub(crate) async fn run(session: &Session, command: AdminCommand) -> Result<()> {
    let client = &session.client;

    match command {
        AdminCommand::Info => {
            let info = session.cancel.run(server::get_server_info(client)).await?;
            session.output.record(&info)
        }
        AdminCommand::Health => {
            let health = session.cancel.run(server::get_health(client)).await?;
            for feature in health.unhealthy_features() {
                eprintln!("Unhealthy: {feature}");
            }
            session.output.record(&health)
        }
        AdminCommand::RestGet { path, params } => {
            let params = parse_pairs(&params)?;
            let borrowed: Vec<(&str, String)> = params
                .iter()
                .map(|(key, value)| (key.as_str(), value.clone()))
                .collect();
            let body = session
                .cancel
                .run(server::rest_get(client, &path, &borrowed))
                .await?;
            session.output.record(&body.to_value())
        }
        AdminCommand::RestPost {
            path,
            data,
            idempotent,
        } => {
            let form = parse_pairs(&data)?;
            let idempotency = if idempotent {
                Idempotency::Idempotent
            } else {
                Idempotency::NonIdempotent
            };
            let body = session
                .cancel
                .run(server::rest_post(client, &path, form, idempotency))
                .await?;
            session.output.record(&body.to_value())
        }
    }
}

/// Split `key=value` arguments; the value may itself contain `=`.
fn parse_pairs(raw: &[String]) -> Result<Vec<(String, String)>> {
    raw.iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => bail!("expected KEY=VALUE, got '{pair}'"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs_keeps_equals_in_value() {
        let pairs = parse_pairs(&["search=index=main".to_string(), "count=0".to_string()]).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("search".to_string(), "index=main".to_string()),
                ("count".to_string(), "0".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_pairs_rejects_missing_key() {
        assert!(parse_pairs(&["=value".to_string()]).is_err());
        assert!(parse_pairs(&["novalue".to_string()]).is_err());
    }
}
