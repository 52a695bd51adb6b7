//! Field/value tag management and searching by tag.

use anyhow::Result;
use clap::Subcommand;
use serde_json::json;
use splunk_as_client::endpoints::tags::{self, TagSearch};

use crate::commands::search::print_results;
use crate::commands::{Session, TimeRange};

/// App that owns new tags unless `--app` says otherwise.
const DEFAULT_TAG_APP: &str = "search";

#[derive(Subcommand)]
pub enum TagCommand {
    /// List tag assignments
    List {
        /// Only tags on this field
        #[arg(short, long)]
        field: Option<String>,
        /// Only tags on this field value
        #[arg(long)]
        value: Option<String>,
        /// App namespace (default: all apps)
        #[arg(short, long)]
        app: Option<String>,
    },
    /// Tag a field value
    Add {
        tag: String,
        field: String,
        value: String,
        #[arg(short, long, default_value = DEFAULT_TAG_APP)]
        app: String,
    },
    /// Remove a tag from a field value
    Remove {
        tag: String,
        field: String,
        value: String,
        #[arg(short, long, default_value = DEFAULT_TAG_APP)]
        app: String,
    },
    /// Search events carrying a tag
    Search {
        tag: String,
        /// Only match the tag on this field
        #[arg(short, long)]
        field: Option<String>,
        #[arg(short, long)]
        index: Option<String>,
        #[arg(short, long, default_value_t = 100)]
        count: u64,
        #[command(flatten)]
        time: TimeRange,
    },
}

pub(crate) async fn run(session: &Session, command: TagCommand) -> Result<()> {
    let client = &session.client;

    match command {
        TagCommand::List { field, value, app } => {
            let mut assignments = session
                .cancel
                .run(tags::list_tags(client, app.as_deref(), field.as_deref()))
                .await?;
            if let Some(value) = &value {
                assignments.retain(|a| &a.value == value);
            }
            session
                .output
                .rows(&assignments, &["field", "value", "tag", "app", "owner"])
        }
        TagCommand::Add {
            tag,
            field,
            value,
            app,
        } => {
            let now = session
                .cancel
                .run(tags::add_tags(client, Some(&app), &field, &value, &[tag.clone()]))
                .await?;
            session.output.status(
                &format!("Tagged {field}={value} with '{tag}'"),
                json!({ "field": field, "value": value, "app": app, "tags": now }),
            )
        }
        TagCommand::Remove {
            tag,
            field,
            value,
            app,
        } => {
            let remaining = session
                .cancel
                .run(tags::remove_tags(client, Some(&app), &field, &value, &[tag.clone()]))
                .await?;
            session.output.status(
                &format!("Removed tag '{tag}' from {field}={value}"),
                json!({ "field": field, "value": value, "app": app, "tags": remaining }),
            )
        }
        TagCommand::Search {
            tag,
            field,
            index,
            count,
            time,
        } => {
            let search = TagSearch { tag, field, index };
            let (earliest, latest) = time.resolve(&session.defaults);
            let results = session
                .cancel
                .run(tags::search_by_tag(
                    client,
                    &search,
                    Some(earliest),
                    Some(latest),
                    count,
                ))
                .await?;
            print_results(&session.output, &results)
        }
    }
}
