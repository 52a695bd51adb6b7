//! Lookup file command implementation.
//!
//! Downloads stream straight to disk; uploads read the whole CSV into memory.

use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::json;
use splunk_as_client::endpoints::lookups;
use splunk_as_config::constants::DEFAULT_APP;
use std::path::PathBuf;

use crate::commands::Session;
use crate::progress::Spinner;

#[derive(Subcommand)]
pub enum LookupCommand {
    /// List lookup table files
    List {
        #[arg(short, long)]
        app: Option<String>,
        #[arg(short, long, default_value_t = 0)]
        count: u64,
    },
    /// Upload a CSV file as a lookup table
    Upload {
        /// Local CSV file
        file: PathBuf,
        /// Lookup name (default: the file name)
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long, default_value = DEFAULT_APP)]
        app: String,
    },
    /// Download a lookup table as CSV to --output-file, or stdout
    Download { name: String },
    /// Delete a lookup table file
    Delete {
        name: String,
        #[arg(short, long, default_value = DEFAULT_APP)]
        app: String,
    },
}

pub(crate) async fn run(session: &Session, command: LookupCommand) -> Result<()> {
    let client = &session.client;

    match command {
        LookupCommand::List { app, count } => {
            let files = session
                .cancel
                .run(lookups::list_lookups(client, app.as_deref(), count))
                .await?;
            session.output.rows(&files, &["name", "app", "owner"])
        }
        LookupCommand::Upload { file, name, app } => {
            let name = match name {
                Some(name) => name,
                None => file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .context("Cannot derive a lookup name from the file path; pass --name")?,
            };
            let content = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let size = content.len();

            let spinner = Spinner::new(session.progress, format!("Uploading {name}"));
            session
                .cancel
                .run(lookups::upload_lookup(client, &app, &name, content))
                .await?;
            spinner.finish();

            session.output.status(
                &format!("Lookup uploaded: {app}/{name} ({size} bytes)"),
                json!({ "app": app, "name": name, "bytes": size, "status": "uploaded" }),
            )
        }
        LookupCommand::Download { name } => {
            let stream = session
                .cancel
                .run(lookups::download_lookup(client, &name))
                .await?;

            match &session.output.file {
                Some(path) => {
                    let mut file = tokio::fs::File::create(path)
                        .await
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    let bytes = session.cancel.run(stream.copy_to(&mut file)).await?;
                    eprintln!("Lookup {name} written to {} ({bytes} bytes)", path.display());
                }
                None => {
                    let mut stdout = tokio::io::stdout();
                    session.cancel.run(stream.copy_to(&mut stdout)).await?;
                }
            }
            Ok(())
        }
        LookupCommand::Delete { name, app } => {
            session
                .cancel
                .run(lookups::delete_lookup(client, &app, &name))
                .await?;
            session.output.status(
                &format!("Lookup deleted: {app}/{name}"),
                json!({ "app": app, "name": name, "status": "deleted" }),
            )
        }
    }
}
