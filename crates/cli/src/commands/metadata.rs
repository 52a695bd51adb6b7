//! Metadata discovery: indexes, sourcetypes, sources and hosts.

use anyhow::Result;
use clap::Subcommand;
use splunk_as_client::endpoints::metadata;
use splunk_as_client::models::MetadataKind;

use crate::commands::Session;

#[derive(Subcommand)]
pub enum MetadataCommand {
    /// List indexes with event counts and sizes
    Indexes {
        #[arg(short, long, default_value_t = 0)]
        count: u64,
    },
    /// List sourcetypes seen in an index
    Sourcetypes {
        /// Index to inspect (default: all readable indexes)
        #[arg(short, long)]
        index: Option<String>,
        /// Only values seen since this time
        #[arg(short, long, allow_hyphen_values = true)]
        earliest: Option<String>,
    },
    /// List sources seen in an index
    Sources {
        #[arg(short, long)]
        index: Option<String>,
        #[arg(short, long, allow_hyphen_values = true)]
        earliest: Option<String>,
    },
    /// List hosts seen in an index
    Hosts {
        #[arg(short, long)]
        index: Option<String>,
        #[arg(short, long, allow_hyphen_values = true)]
        earliest: Option<String>,
    },
}

const VALUE_COLUMNS: &[&str] = &["value", "total_count", "first_time", "last_time"];

pub(crate) async fn run(session: &Session, command: MetadataCommand) -> Result<()> {
    let (kind, index, earliest) = match command {
        MetadataCommand::Indexes { count } => {
            let indexes = session
                .cancel
                .run(metadata::list_indexes(&session.client, count))
                .await?;
            return session.output.rows(
                &indexes,
                &[
                    "name",
                    "datatype",
                    "totalEventCount",
                    "currentDBSizeMB",
                    "disabled",
                ],
            );
        }
        MetadataCommand::Sourcetypes { index, earliest } => {
            (MetadataKind::Sourcetypes, index, earliest)
        }
        MetadataCommand::Sources { index, earliest } => (MetadataKind::Sources, index, earliest),
        MetadataCommand::Hosts { index, earliest } => (MetadataKind::Hosts, index, earliest),
    };

    let values = session
        .cancel
        .run(metadata::list_metadata(
            &session.client,
            kind,
            index.as_deref(),
            earliest,
        ))
        .await?;
    session.output.rows(&values, VALUE_COLUMNS)
}
