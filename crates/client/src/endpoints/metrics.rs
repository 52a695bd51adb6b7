//! Metric indexes, metric catalog lookups and `mstats` aggregation.
//!
//! Catalog and aggregation queries are generated SPL run as oneshot searches.
//! Every name placed into the query is validated first.

use std::fmt;
use std::str::FromStr;

use crate::client::SplunkClient;
use crate::endpoints::search::{SearchRequest, oneshot};
use crate::error::{ClientError, Result};
use crate::models::{Index, ResultsResponse};
use crate::validators::{validate_field_name, validate_index_name, validate_metric_name};

/// Index used when none is named.
pub const DEFAULT_METRICS_INDEX: &str = "metrics";

/// Aggregation applied by `mstats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricAggregation {
    #[default]
    Avg,
    Sum,
    Min,
    Max,
    Count,
}

impl MetricAggregation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Avg => "avg",
            Self::Sum => "sum",
            Self::Min => "min",
            Self::Max => "max",
            Self::Count => "count",
        }
    }
}

impl fmt::Display for MetricAggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricAggregation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "avg" => Ok(Self::Avg),
            "sum" => Ok(Self::Sum),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            "count" => Ok(Self::Count),
            other => Err(format!(
                "unknown aggregation '{other}' (expected avg, sum, min, max or count)"
            )),
        }
    }
}

/// An `mstats` aggregation over one metric.
#[derive(Debug, Clone)]
pub struct MstatsQuery {
    pub metric: String,
    pub aggregation: MetricAggregation,
    pub index: String,
    /// Extra `WHERE` terms, e.g. `host=web01`.
    pub filter: Option<String>,
    /// Dimensions to split by.
    pub by: Vec<String>,
    /// Time bucket such as `5m` or `1h`.
    pub span: Option<String>,
    pub limit: Option<u64>,
}

impl MstatsQuery {
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            aggregation: MetricAggregation::default(),
            index: DEFAULT_METRICS_INDEX.to_string(),
            filter: None,
            by: Vec::new(),
            span: None,
            limit: None,
        }
    }

    pub fn to_spl(&self) -> Result<String> {
        let metric = validate_metric_name(&self.metric)?;
        let index = validate_index_name(&self.index)?;
        let mut spl = format!(
            "| mstats {}({metric}) WHERE index={index}",
            self.aggregation.as_str()
        );
        if let Some(filter) = self.filter.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
            spl.push(' ');
            spl.push_str(validate_filter(filter)?);
        }
        if !self.by.is_empty() {
            let by = self
                .by
                .iter()
                .map(|f| validate_field_name(f))
                .collect::<Result<Vec<_>>>()?;
            spl.push_str(" BY ");
            spl.push_str(&by.join(" "));
        }
        if let Some(span) = &self.span {
            spl.push_str(" span=");
            spl.push_str(validate_span(span)?);
        }
        if let Some(limit) = self.limit {
            spl.push_str(&format!(" | head {limit}"));
        }
        Ok(spl)
    }
}

/// A `mcatalog` lookup of metric names or their dimensions.
#[derive(Debug, Clone)]
pub struct McatalogQuery {
    pub index: String,
    /// Restrict to one metric (wildcards allowed).
    pub metric: Option<String>,
    /// Only list metric names; otherwise list dimensions per metric.
    pub names_only: bool,
    pub limit: Option<u64>,
}

impl McatalogQuery {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            metric: None,
            names_only: false,
            limit: None,
        }
    }

    pub fn to_spl(&self) -> Result<String> {
        let index = validate_index_name(&self.index)?;
        let mut spl = if self.names_only {
            format!("| mcatalog values(metric_name) AS metric_name WHERE index={index}")
        } else {
            format!("| mcatalog values(_dims) AS dimensions WHERE index={index}")
        };
        if let Some(metric) = &self.metric {
            spl.push_str(" metric_name=");
            spl.push_str(validate_metric_name(metric)?);
        }
        if !self.names_only {
            spl.push_str(" BY metric_name");
        }
        if let Some(limit) = self.limit {
            spl.push_str(&format!(" | head {limit}"));
        }
        Ok(spl)
    }
}

/// Reject filters that would end the `WHERE` clause early.
fn validate_filter(filter: &str) -> Result<&str> {
    if filter.contains('|') || filter.contains('[') {
        return Err(ClientError::validation(
            "validate mstats filter",
            format!("filter '{filter}' cannot contain '|' or '['"),
        ));
    }
    Ok(filter)
}

/// `<digits><unit>`, e.g. `30s`, `5m`, `1h`.
fn validate_span(span: &str) -> Result<&str> {
    let span = span.trim();
    let digits = span.chars().take_while(char::is_ascii_digit).count();
    let unit = &span[digits..];
    if digits == 0 || unit.is_empty() || !unit.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ClientError::validation(
            "validate span",
            format!("invalid span '{span}' (expected e.g. 30s, 5m, 1h)"),
        ));
    }
    Ok(span)
}

/// Indexes whose data type is `metric`.
pub async fn list_metric_indexes(client: &SplunkClient, count: u64) -> Result<Vec<Index>> {
    const OPERATION: &str = "list metric indexes";

    let collection = client
        .get(
            "/data/indexes",
            &[("count", count.to_string()), ("datatype", "metric".to_string())],
            None,
            OPERATION,
        )
        .await?
        .into_entries(OPERATION)?;

    let indexes = collection
        .entry
        .into_iter()
        .map(|entry| entry.into_model::<Index>(OPERATION))
        .collect::<Result<Vec<_>>>()?;
    Ok(indexes
        .into_iter()
        .filter(|index| index.data_type.as_deref() == Some("metric"))
        .collect())
}

/// Distinct metric names, sorted, at most `count` of them.
///
/// `index` of `None` searches every metric index.
pub async fn list_metric_names(
    client: &SplunkClient,
    index: Option<&str>,
    filter: Option<&str>,
    count: u64,
) -> Result<Vec<String>> {
    let index = index.map(validate_index_name).transpose()?.unwrap_or("*");
    let mut spl = format!("| mcatalog values(metric_name) AS metric_name WHERE index={index}");
    if let Some(metric) = filter {
        spl.push_str(" metric_name=");
        spl.push_str(validate_metric_name(metric)?);
    }
    spl.push_str(&format!(
        " | mvexpand metric_name | dedup metric_name | sort metric_name | head {count}"
    ));

    let results = oneshot(client, &SearchRequest::new(spl).count(0)).await?;
    Ok(results
        .results
        .iter()
        .filter_map(|row| row.get("metric_name")?.as_str().map(String::from))
        .collect())
}

pub async fn mcatalog(
    client: &SplunkClient,
    query: &McatalogQuery,
    earliest_time: Option<String>,
    latest_time: Option<String>,
) -> Result<ResultsResponse> {
    let request = SearchRequest::new(query.to_spl()?)
        .time_range(earliest_time, latest_time)
        .count(0);
    oneshot(client, &request).await
}

pub async fn mstats(
    client: &SplunkClient,
    query: &MstatsQuery,
    earliest_time: Option<String>,
    latest_time: Option<String>,
) -> Result<ResultsResponse> {
    let request = SearchRequest::new(query.to_spl()?)
        .time_range(earliest_time, latest_time)
        .count(0);
    oneshot(client, &request).await
}
