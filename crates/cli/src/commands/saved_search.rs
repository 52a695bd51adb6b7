//! Saved search command implementation.

use anyhow::Result;
use clap::Subcommand;
use serde_json::json;
use splunk_as_client::endpoints::saved_searches;
use splunk_as_client::models::SavedSearchParams;
use splunk_as_config::constants::DEFAULT_JOB_LIST_COUNT;

use crate::commands::Session;

#[derive(Subcommand)]
pub enum SavedSearchCommand {
    /// List saved searches
    List {
        #[arg(short, long)]
        app: Option<String>,
        /// Server-side search filter, e.g. 'is_scheduled=1'
        #[arg(long)]
        filter: Option<String>,
        #[arg(short, long, default_value_t = DEFAULT_JOB_LIST_COUNT)]
        count: u64,
    },
    /// Show one saved search
    Get {
        name: String,
        #[arg(short, long)]
        app: Option<String>,
    },
    /// Create a saved search
    Create {
        name: String,
        #[arg(short, long)]
        search: String,
        #[arg(short, long)]
        app: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Dispatch earliest time
        #[arg(short, long, allow_hyphen_values = true)]
        earliest: Option<String>,
        /// Dispatch latest time
        #[arg(short, long, allow_hyphen_values = true)]
        latest: Option<String>,
        /// Cron schedule; setting one also schedules the search
        #[arg(long)]
        cron: Option<String>,
    },
    /// Change the search string, description, time range or schedule
    Update {
        name: String,
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long)]
        app: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(short, long, allow_hyphen_values = true)]
        earliest: Option<String>,
        #[arg(short, long, allow_hyphen_values = true)]
        latest: Option<String>,
        #[arg(long)]
        cron: Option<String>,
    },
    /// Delete a saved search
    Delete {
        name: String,
        #[arg(short, long)]
        app: Option<String>,
    },
    /// Dispatch a saved search now and print the sid
    Run {
        name: String,
        #[arg(short, long)]
        app: Option<String>,
        /// Fire the search's alert actions
        #[arg(long)]
        trigger_actions: bool,
    },
    /// Enable a saved search
    Enable {
        name: String,
        #[arg(short, long)]
        app: Option<String>,
    },
    /// Disable a saved search
    Disable {
        name: String,
        #[arg(short, long)]
        app: Option<String>,
    },
}

pub(crate) async fn run(session: &Session, command: SavedSearchCommand) -> Result<()> {
    let client = &session.client;

    match command {
        SavedSearchCommand::List { app, filter, count } => {
            let searches = session
                .cancel
                .run(saved_searches::list_saved_searches(
                    client,
                    app.as_deref(),
                    filter.as_deref(),
                    count,
                ))
                .await?;
            session.output.rows(
                &searches,
                &["name", "app", "is_scheduled", "cron_schedule", "disabled"],
            )
        }
        SavedSearchCommand::Get { name, app } => {
            let search = session
                .cancel
                .run(saved_searches::get_saved_search(client, app.as_deref(), &name))
                .await?;
            session.output.record(&search)
        }
        SavedSearchCommand::Create {
            name,
            search,
            app,
            description,
            earliest,
            latest,
            cron,
        } => {
            let params = SavedSearchParams {
                search: Some(search),
                description,
                earliest_time: earliest,
                latest_time: latest,
                cron_schedule: cron,
                ..SavedSearchParams::default()
            };
            session
                .cancel
                .run(saved_searches::create_saved_search(
                    client,
                    app.as_deref(),
                    &name,
                    &params,
                ))
                .await?;
            session.output.status(
                &format!("Saved search created: {name}"),
                json!({ "name": name, "status": "created" }),
            )
        }
        SavedSearchCommand::Update {
            name,
            search,
            app,
            description,
            earliest,
            latest,
            cron,
        } => {
            let params = SavedSearchParams {
                search,
                description,
                earliest_time: earliest,
                latest_time: latest,
                cron_schedule: cron,
                ..SavedSearchParams::default()
            };
            session
                .cancel
                .run(saved_searches::update_saved_search(
                    client,
                    app.as_deref(),
                    &name,
                    &params,
                ))
                .await?;
            session.output.status(
                &format!("Saved search updated: {name}"),
                json!({ "name": name, "status": "updated" }),
            )
        }
        SavedSearchCommand::Delete { name, app } => {
            session
                .cancel
                .run(saved_searches::delete_saved_search(client, app.as_deref(), &name))
                .await?;
            session.output.status(
                &format!("Saved search deleted: {name}"),
                json!({ "name": name, "status": "deleted" }),
            )
        }
        SavedSearchCommand::Run {
            name,
            app,
            trigger_actions,
        } => {
            let sid = session
                .cancel
                .run(saved_searches::dispatch_saved_search(
                    client,
                    app.as_deref(),
                    &name,
                    trigger_actions,
                ))
                .await?;
            session.output.status(
                &format!("Dispatched {name}: {sid}"),
                json!({ "name": name, "sid": sid }),
            )
        }
        SavedSearchCommand::Enable { name, app } => set_disabled(session, app, name, false).await,
        SavedSearchCommand::Disable { name, app } => set_disabled(session, app, name, true).await,
    }
}

async fn set_disabled(
    session: &Session,
    app: Option<String>,
    name: String,
    disabled: bool,
) -> Result<()> {
    session
        .cancel
        .run(saved_searches::set_saved_search_disabled(
            &session.client,
            app.as_deref(),
            &name,
            disabled,
        ))
        .await?;
    let state = if disabled { "disabled" } else { "enabled" };
    session.output.status(
        &format!("Saved search {state}: {name}"),
        json!({ "name": name, "status": state }),
    )
}
