//! Alert command implementation.
//!
//! Responsibilities:
//! - List alert definitions and triggered (fired) alerts with client-side filters.
//! - Acknowledge fired alert groups.
//! - Create alerts as scheduled saved searches.

use anyhow::Result;
use clap::Subcommand;
use serde_json::json;
use splunk_as_client::endpoints::alerts;
use splunk_as_client::models::{AlertSeverity, CreateAlertParams, FiredAlertFilter};
use splunk_as_config::constants::{DEFAULT_APP, DEFAULT_JOB_LIST_COUNT};

use crate::commands::{Session, TimeRange};

fn parse_severity(raw: &str) -> Result<AlertSeverity, String> {
    let level: u8 = raw
        .parse()
        .map_err(|_| format!("severity must be a number 1-6, got '{raw}'"))?;
    AlertSeverity::try_from(level)
}

#[derive(Subcommand)]
pub enum AlertCommand {
    /// List saved searches that are configured as alerts
    List {
        #[arg(short, long)]
        app: Option<String>,
        #[arg(short, long, default_value_t = DEFAULT_JOB_LIST_COUNT)]
        count: u64,
    },
    /// List triggered alerts
    Triggered {
        /// Only this alert group
        name: Option<String>,
        /// Only this severity (1=debug .. 6=fatal)
        #[arg(long, value_parser = parse_severity)]
        severity: Option<AlertSeverity>,
        /// Case-insensitive substring of the saved search name
        #[arg(long)]
        savedsearch: Option<String>,
        #[arg(short, long)]
        app: Option<String>,
        #[arg(short, long, default_value_t = DEFAULT_JOB_LIST_COUNT)]
        count: u64,
    },
    /// Acknowledge (remove) a triggered alert group
    Acknowledge { name: String },
    /// Create an alert
    Create {
        name: String,
        /// SPL the alert evaluates
        #[arg(short, long)]
        search: String,
        #[command(flatten)]
        time: TimeRange,
        #[arg(short, long, default_value = DEFAULT_APP)]
        app: String,
        #[arg(long)]
        description: Option<String>,
        /// Cron schedule (default: every five minutes)
        #[arg(long)]
        cron: Option<String>,
        /// Trigger condition: always, number of events, number of hosts, number of sources, custom
        #[arg(long, default_value = "number of events")]
        alert_type: String,
        /// Comparator such as "greater than"
        #[arg(long)]
        comparator: Option<String>,
        #[arg(long)]
        threshold: Option<String>,
        #[arg(long, value_parser = parse_severity, default_value = "3")]
        severity: AlertSeverity,
        /// Comma-separated actions (email, webhook, ...)
        #[arg(long)]
        actions: Option<String>,
        #[arg(long)]
        email_to: Option<String>,
        /// Send one notification per run instead of per result
        #[arg(long)]
        digest: bool,
        /// Suppression period such as 60s or 1h
        #[arg(long)]
        throttle: Option<String>,
    },
}

pub(crate) async fn run(session: &Session, command: AlertCommand) -> Result<()> {
    let client = &session.client;

    match command {
        AlertCommand::List { app, count } => {
            let alerts = session
                .cancel
                .run(alerts::list_alerts(client, app.as_deref(), count))
                .await?;
            session.output.rows(
                &alerts,
                &["name", "app", "alert_type", "cron_schedule", "disabled"],
            )
        }
        AlertCommand::Triggered {
            name,
            severity,
            savedsearch,
            app,
            count,
        } => {
            let filter = FiredAlertFilter {
                severity,
                savedsearch,
                app,
            };
            let fired = session
                .cancel
                .run(alerts::list_fired_alerts(
                    client,
                    name.as_deref(),
                    count,
                    &filter,
                ))
                .await?;
            session.output.rows(
                &fired,
                &[
                    "name",
                    "savedsearch_name",
                    "severity",
                    "trigger_time",
                    "triggered_alert_count",
                    "app",
                ],
            )
        }
        AlertCommand::Acknowledge { name } => {
            session
                .cancel
                .run(alerts::acknowledge_alert(client, &name))
                .await?;
            session.output.status(
                &format!("Alert acknowledged: {name}"),
                json!({ "name": name, "status": "acknowledged" }),
            )
        }
        AlertCommand::Create {
            name,
            search,
            time,
            app,
            description,
            cron,
            alert_type,
            comparator,
            threshold,
            severity,
            actions,
            email_to,
            digest,
            throttle,
        } => {
            let (earliest_time, latest_time) = time.resolve(&session.defaults);
            let params = CreateAlertParams {
                name: name.clone(),
                search,
                description,
                earliest_time,
                latest_time,
                cron_schedule: cron,
                alert_type,
                alert_comparator: comparator,
                alert_threshold: threshold,
                severity,
                actions,
                email_to,
                digest_mode: digest,
                throttle,
            };
            session
                .cancel
                .run(alerts::create_alert(client, &app, &params))
                .await?;
            session.output.status(
                &format!("Alert created: {app}/{name} (severity {})", severity.label()),
                json!({ "name": name, "app": app, "severity": severity, "status": "created" }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_severity() {
        assert_eq!(parse_severity("4"), Ok(AlertSeverity::Error));
        assert!(parse_severity("9").is_err());
        assert!(parse_severity("high").is_err());
    }
}
