//! CLI command implementations.
//!
//! Every connected command receives a [`Session`]: the one client built
//! from the resolved configuration, the search defaults, the output
//! settings and the cancellation token.

pub mod admin;
pub mod alert;
pub mod app;
pub mod export;
pub mod job;
pub mod kvstore;
pub mod lookup;
pub mod metadata;
pub mod metrics;
pub mod saved_search;
pub mod search;
pub mod security;
pub mod tag;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use splunk_as_client::{ClientError, SplunkClient};
use splunk_as_config::{Config, SearchDefaultConfig};
use std::path::PathBuf;

use crate::cancellation::CancellationToken;
use crate::formatters::{OutputFormat, get_formatter, output_result};

/// Everything a connected command needs.
pub(crate) struct Session {
    pub client: SplunkClient,
    pub defaults: SearchDefaultConfig,
    pub output: Output,
    /// Whether progress bars and spinners are drawn (`!--quiet`).
    pub progress: bool,
    pub cancel: CancellationToken,
}

impl Session {
    pub(crate) fn connect(
        config: &Config,
        output: Output,
        progress: bool,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let client = SplunkClient::builder()
            .from_config(config)
            .build()
            .context("Failed to build Splunk client")?;
        tracing::debug!(base_url = client.base_url(), "Client ready");

        Ok(Self {
            client,
            defaults: config.search_defaults.clone(),
            output,
            progress,
            cancel,
        })
    }
}

/// Where and how command output is written.
#[derive(Debug, Clone)]
pub(crate) struct Output {
    pub format: OutputFormat,
    pub file: Option<PathBuf>,
}

impl Output {
    /// Print a list of serializable items.
    pub(crate) fn rows<T: Serialize>(&self, items: &[T], columns: &[&str]) -> Result<()> {
        let rows = items
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        self.values(&rows, columns)
    }

    /// Print a list of raw JSON rows.
    pub(crate) fn values(&self, rows: &[Value], columns: &[&str]) -> Result<()> {
        let text = get_formatter(self.format).format_rows(rows, columns)?;
        output_result(&text, self.format, self.file.as_deref())
    }

    /// Print one serializable item.
    pub(crate) fn record<T: Serialize>(&self, item: &T) -> Result<()> {
        let value = serde_json::to_value(item)?;
        let text = get_formatter(self.format).format_record(&value)?;
        output_result(&text, self.format, self.file.as_deref())
    }

    /// Report the outcome of an action.
    ///
    /// Text output gets the human sentence; JSON and CSV get `details`.
    pub(crate) fn status(&self, message: &str, details: Value) -> Result<()> {
        match self.format {
            OutputFormat::Text => output_result(&format!("{message}\n"), self.format, self.file.as_deref()),
            _ => self.record(&details),
        }
    }
}

/// Time bounds shared by every search-like command.
#[derive(Args, Debug, Clone, Default)]
pub struct TimeRange {
    /// Earliest time (e.g., -24h, -7d@d, 0, 01/15/2024:00:00:00)
    #[arg(short, long, allow_hyphen_values = true)]
    pub earliest: Option<String>,

    /// Latest time (e.g., now, -1h)
    #[arg(short, long, allow_hyphen_values = true)]
    pub latest: Option<String>,
}

impl TimeRange {
    /// Fill unset bounds from the configured search defaults.
    pub(crate) fn resolve(&self, defaults: &SearchDefaultConfig) -> (String, String) {
        (
            self.earliest
                .clone()
                .unwrap_or_else(|| defaults.earliest_time.clone()),
            self.latest
                .clone()
                .unwrap_or_else(|| defaults.latest_time.clone()),
        )
    }
}

/// Split a comma-separated `--fields` value.
pub(crate) fn split_fields(fields: Option<&str>) -> Vec<String> {
    fields
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Parse a JSON argument, naming the flag in the error.
pub(crate) fn parse_json_arg(flag: &str, raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|e| {
        ClientError::validation("parse arguments", format!("{flag} must be valid JSON: {e}")).into()
    })
}
