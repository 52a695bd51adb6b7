//! Metric indexes, metric names and `mstats`/`mcatalog` queries.

use anyhow::Result;
use clap::Subcommand;
use splunk_as_client::endpoints::metrics::{
    self, DEFAULT_METRICS_INDEX, McatalogQuery, MetricAggregation, MstatsQuery,
};

use crate::commands::search::print_results;
use crate::commands::{Session, TimeRange, split_fields};

#[derive(Subcommand)]
pub enum MetricsCommand {
    /// List metric names
    List {
        /// Metric index (default: all metric indexes)
        #[arg(short, long)]
        index: Option<String>,
        /// Only names matching this pattern (e.g. cpu.*)
        #[arg(short, long)]
        metric: Option<String>,
        #[arg(short, long, default_value_t = 100)]
        count: u64,
    },
    /// List metric indexes
    Indexes {
        #[arg(short, long, default_value_t = 0)]
        count: u64,
    },
    /// Aggregate a metric with mstats
    Mstats {
        /// Metric name (e.g. cpu.percent)
        metric: String,
        #[arg(long, default_value_t = MetricAggregation::Avg)]
        agg: MetricAggregation,
        #[arg(short, long, default_value = DEFAULT_METRICS_INDEX)]
        index: String,
        /// Time bucket (e.g. 5m, 1h)
        #[arg(long, default_value = "1h")]
        span: String,
        /// Comma-separated dimensions to split by
        #[arg(long)]
        by: Option<String>,
        /// Extra WHERE terms (e.g. host=web01)
        #[arg(long = "where")]
        filter: Option<String>,
        /// Maximum rows returned
        #[arg(short, long)]
        count: Option<u64>,
        #[command(flatten)]
        time: TimeRange,
    },
    /// Show dimensions per metric from the metric catalog
    Mcatalog {
        #[arg(short, long, default_value = DEFAULT_METRICS_INDEX)]
        index: String,
        #[arg(short, long)]
        metric: Option<String>,
        /// Only list metric names
        #[arg(long)]
        names_only: bool,
        #[arg(short, long)]
        count: Option<u64>,
        #[command(flatten)]
        time: TimeRange,
    },
}

pub(crate) async fn run(session: &Session, command: MetricsCommand) -> Result<()> {
    let client = &session.client;

    match command {
        MetricsCommand::List {
            index,
            metric,
            count,
        } => {
            let names = session
                .cancel
                .run(metrics::list_metric_names(
                    client,
                    index.as_deref(),
                    metric.as_deref(),
                    count,
                ))
                .await?;
            let rows: Vec<_> = names
                .into_iter()
                .map(|name| serde_json::json!({ "metric_name": name }))
                .collect();
            session.output.values(&rows, &["metric_name"])
        }
        MetricsCommand::Indexes { count } => {
            let indexes = session
                .cancel
                .run(metrics::list_metric_indexes(client, count))
                .await?;
            session.output.rows(
                &indexes,
                &["name", "totalEventCount", "currentDBSizeMB", "disabled"],
            )
        }
        MetricsCommand::Mstats {
            metric,
            agg,
            index,
            span,
            by,
            filter,
            count,
            time,
        } => {
            let query = MstatsQuery {
                metric,
                aggregation: agg,
                index,
                filter,
                by: split_fields(by.as_deref()),
                span: Some(span),
                limit: count,
            };
            let (earliest, latest) = time.resolve(&session.defaults);
            let results = session
                .cancel
                .run(metrics::mstats(client, &query, Some(earliest), Some(latest)))
                .await?;
            print_results(&session.output, &results)
        }
        MetricsCommand::Mcatalog {
            index,
            metric,
            names_only,
            count,
            time,
        } => {
            let query = McatalogQuery {
                index,
                metric,
                names_only,
                limit: count,
            };
            let (earliest, latest) = time.resolve(&session.defaults);
            let results = session
                .cancel
                .run(metrics::mcatalog(client, &query, Some(earliest), Some(latest)))
                .await?;
            print_results(&session.output, &results)
        }
    }
}
