//! App command implementation.

use anyhow::Result;
use clap::Subcommand;
use serde_json::json;
use splunk_as_client::endpoints::apps;

use crate::commands::Session;

#[derive(Subcommand)]
pub enum AppCommand {
    /// List installed apps
    List {
        #[arg(short, long, default_value_t = 0)]
        count: u64,
    },
    /// Show one app
    Get { name: String },
    /// Enable an app
    Enable { name: String },
    /// Disable an app
    Disable { name: String },
    /// Remove an app from the server
    Uninstall {
        name: String,
        /// Required; uninstalling cannot be undone
        #[arg(long)]
        force: bool,
    },
}

pub(crate) async fn run(session: &Session, command: AppCommand) -> Result<()> {
    let client = &session.client;

    match command {
        AppCommand::List { count } => {
            let apps = session.cancel.run(apps::list_apps(client, count)).await?;
            session
                .output
                .rows(&apps, &["name", "label", "version", "disabled", "visible"])
        }
        AppCommand::Get { name } => {
            let app = session.cancel.run(apps::get_app(client, &name)).await?;
            session.output.record(&app)
        }
        AppCommand::Enable { name } => {
            session
                .cancel
                .run(apps::set_app_disabled(client, &name, false))
                .await?;
            session.output.status(
                &format!("App enabled: {name}"),
                json!({ "name": name, "status": "enabled" }),
            )
        }
        AppCommand::Disable { name } => {
            session
                .cancel
                .run(apps::set_app_disabled(client, &name, true))
                .await?;
            session.output.status(
                &format!("App disabled: {name}"),
                json!({ "name": name, "status": "disabled" }),
            )
        }
        AppCommand::Uninstall { name, force } => {
            if !force {
                return Err(splunk_as_client::ClientError::validation(
                    "uninstall app",
                    format!("refusing to uninstall '{name}' without --force"),
                )
                .into());
            }
            session.cancel.run(apps::uninstall_app(client, &name)).await?;
            session.output.status(
                &format!("App uninstalled: {name}"),
                json!({ "name": name, "status": "uninstalled" }),
            )
        }
    }
}
