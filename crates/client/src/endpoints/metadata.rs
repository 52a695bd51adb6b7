//! Index listing and host/source/sourcetype discovery.

use serde_json::Value;

use crate::client::SplunkClient;
use crate::endpoints::search::{SearchRequest, oneshot};
use crate::error::Result;
use crate::models::{Index, MetadataKind};

/// One row of a `| metadata` search.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MetadataValue {
    pub value: String,
    pub total_count: u64,
    pub first_time: Option<String>,
    pub last_time: Option<String>,
}

impl MetadataValue {
    fn from_row(kind: MetadataKind, row: &Value) -> Option<Self> {
        let text = |key: &str| match row.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        };
        Some(Self {
            value: text(kind.field())?,
            total_count: text("totalCount")
                .and_then(|c| c.parse().ok())
                .unwrap_or_default(),
            first_time: text("firstTime"),
            last_time: text("lastTime"),
        })
    }
}

/// List indexes, including internal ones.
pub async fn list_indexes(client: &SplunkClient, count: u64) -> Result<Vec<Index>> {
    const OPERATION: &str = "list indexes";

    let collection = client
        .get(
            "/data/indexes",
            &[("count", count.to_string())],
            None,
            OPERATION,
        )
        .await?
        .into_entries(OPERATION)?;

    collection
        .entry
        .into_iter()
        .map(|entry| entry.into_model(OPERATION))
        .collect()
}

/// Discover hosts, sources or sourcetypes seen in an index.
///
/// Runs `| metadata type=<kind> index=<index>` as a oneshot search; `None`
/// searches every index the caller can read.
pub async fn list_metadata(
    client: &SplunkClient,
    kind: MetadataKind,
    index: Option<&str>,
    earliest_time: Option<String>,
) -> Result<Vec<MetadataValue>> {
    let spl = format!(
        "| metadata type={} index={}",
        kind.as_str(),
        index.unwrap_or("*")
    );
    let request = SearchRequest::new(spl)
        .time_range(earliest_time, None)
        .count(0);
    let results = oneshot(client, &request).await?;

    Ok(results
        .results
        .iter()
        .filter_map(|row| MetadataValue::from_row(kind, row))
        .collect())
}
