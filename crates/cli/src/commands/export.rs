//! Export command implementation.
//!
//! Responsibilities:
//! - Stream a finished job's results to a file in batches, recording a
//!   checkpoint after every batch so an interrupted export resumes where it stopped.
//! - Estimate how many results a search would export.
//!
//! Does NOT handle:
//! - Rendering results (bytes are written exactly as Splunk sends them).
//!
//! Invariants:
//! - The checkpoint offset never exceeds the number of result rows already in the file.
//! - On resume the file is cut back to the checkpoint's byte length, so a
//!   batch interrupted mid-stream is rewritten rather than duplicated.
//! - CSV pages after the first have their header line dropped.

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use splunk_as_client::endpoints::jobs;
use splunk_as_client::endpoints::search::{SearchRequest, oneshot};
use splunk_as_client::validators::{validate_spl, validate_time_modifier};
use splunk_as_client::{ClientError, ResultStream, get_dispatch_state};
use splunk_as_config::constants::DEFAULT_EXPORT_CHUNK_SIZE;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::commands::{Output, Session, TimeRange, split_fields};
use crate::formatters::write_to_file;
use crate::progress::Spinner;

/// Format Splunk renders the exported rows in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    Xml,
}

impl ExportFormat {
    fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

#[derive(Subcommand)]
pub enum ExportCommand {
    /// Export a finished job's results to the file given by --output-file
    Results {
        sid: String,
        /// Format Splunk renders the rows in
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// Rows fetched per request and per checkpoint
        #[arg(long, default_value_t = DEFAULT_EXPORT_CHUNK_SIZE)]
        chunk_size: u64,
        /// Checkpoint file (default: <output-file>.checkpoint)
        #[arg(long, value_name = "FILE")]
        checkpoint: Option<PathBuf>,
        /// Comma-separated fields to export (default: all)
        #[arg(long)]
        fields: Option<String>,
    },
    /// Estimate the number of results a search would export
    Estimate {
        query: String,
        #[command(flatten)]
        time: TimeRange,
    },
}

/// Progress of an export, persisted after every batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Checkpoint {
    pub sid: String,
    pub offset: u64,
    pub total_results: u64,
    pub output_file: PathBuf,
    pub format: ExportFormat,
    pub chunk_size: u64,
    /// Length of the output file when `offset` was recorded.
    pub bytes_written: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

impl Checkpoint {
    fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read checkpoint {}", path.display()))?;
        let checkpoint = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid checkpoint {}", path.display()))?;
        Ok(Some(checkpoint))
    }

    fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        write_to_file(&raw, path)
            .with_context(|| format!("Failed to write checkpoint {}", path.display()))
    }

    fn is_complete(&self) -> bool {
        self.offset >= self.total_results
    }

    /// Rows requested by the next batch.
    fn next_count(&self) -> u64 {
        self.chunk_size.min(self.total_results.saturating_sub(self.offset))
    }
}

/// The checkpoint to continue from, if `existing` belongs to this export.
fn resumable(existing: Option<Checkpoint>, sid: &str, output_file: &Path) -> Option<Checkpoint> {
    existing.filter(|c| c.sid == sid && c.output_file == output_file && !c.is_complete())
}

fn default_checkpoint_path(output_file: &Path) -> PathBuf {
    let mut name = output_file.as_os_str().to_owned();
    name.push(".checkpoint");
    PathBuf::from(name)
}

/// Drops everything up to and including the first newline of a stream.
#[derive(Debug)]
struct HeaderSkipper {
    done: bool,
}

impl HeaderSkipper {
    fn new(skip: bool) -> Self {
        Self { done: !skip }
    }

    fn feed<'a>(&mut self, chunk: &'a [u8]) -> &'a [u8] {
        if self.done {
            return chunk;
        }
        match chunk.iter().position(|b| *b == b'\n') {
            Some(pos) => {
                self.done = true;
                &chunk[pos + 1..]
            }
            None => &[],
        }
    }
}

pub(crate) async fn run(session: &Session, command: ExportCommand) -> Result<()> {
    match command {
        ExportCommand::Results {
            sid,
            format,
            chunk_size,
            checkpoint,
            fields,
        } => {
            let output_file = session.output.file.clone().ok_or_else(|| {
                ClientError::validation("export results", "--output-file is required")
            })?;
            if chunk_size == 0 {
                return Err(
                    ClientError::validation("export results", "--chunk-size must be positive").into(),
                );
            }
            let checkpoint_path = checkpoint.unwrap_or_else(|| default_checkpoint_path(&output_file));
            let job = ExportJob {
                sid,
                output_file,
                format,
                chunk_size,
                fields: split_fields(fields.as_deref()),
            };
            export_results(session, job, &checkpoint_path).await
        }
        ExportCommand::Estimate { query, time } => estimate(session, &query, &time).await,
    }
}

/// What the user asked to export.
struct ExportJob {
    sid: String,
    output_file: PathBuf,
    format: ExportFormat,
    chunk_size: u64,
    fields: Vec<String>,
}

async fn export_results(session: &Session, job: ExportJob, checkpoint_path: &Path) -> Result<()> {
    let ExportJob {
        sid,
        output_file,
        format,
        chunk_size,
        fields,
    } = job;
    let sid = sid.as_str();

    let mut state = match resumable(Checkpoint::load(checkpoint_path)?, sid, &output_file) {
        Some(existing) => {
            eprintln!(
                "Resuming export of {} at offset {} of {}",
                existing.sid, existing.offset, existing.total_results
            );
            existing
        }
        None => {
            let progress = session
                .cancel
                .run(get_dispatch_state(&session.client, sid))
                .await?;
            if !progress.is_done() {
                return Err(ClientError::validation(
                    "export results",
                    format!("job {sid} is {}, wait for it to finish first", progress.state),
                )
                .into());
            }
            if let Some(parent) = output_file.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::File::create(&output_file)
                .await
                .with_context(|| format!("Failed to create {}", output_file.display()))?;

            Checkpoint {
                sid: sid.to_string(),
                offset: 0,
                total_results: progress.result_count,
                output_file: output_file.clone(),
                format,
                chunk_size,
                bytes_written: 0,
                fields,
            }
        }
    };
    state.save(checkpoint_path)?;

    let mut file = open_at_checkpoint(&state.output_file, state.bytes_written).await?;

    let spinner = Spinner::new(session.progress, format!("Exporting {}", state.sid));

    while !state.is_complete() {
        let count = state.next_count();
        spinner.set_message(format!(
            "Exporting rows {}-{} of {}",
            state.offset,
            state.offset + count,
            state.total_results
        ));

        let stream = session
            .cancel
            .run(jobs::stream_results_page(
                &session.client,
                &state.sid,
                state.offset,
                count,
                state.format.as_str(),
                &state.fields,
            ))
            .await?;
        let skip_header = state.format == ExportFormat::Csv && state.offset > 0;
        state.bytes_written += session
            .cancel
            .run(append_page(stream, &mut file, skip_header))
            .await?;

        state.offset += count;
        state.save(checkpoint_path)?;
        debug!(offset = state.offset, total = state.total_results, "Export batch written");
    }
    spinner.finish();

    std::fs::remove_file(checkpoint_path)
        .with_context(|| format!("Failed to remove checkpoint {}", checkpoint_path.display()))?;
    info!(sid = %state.sid, bytes = state.bytes_written, "Export complete");

    Output {
        format: session.output.format,
        file: None,
    }
    .status(
        &format!(
            "Exported {} results to {}",
            state.total_results,
            state.output_file.display()
        ),
        json!({
            "sid": state.sid,
            "total_results": state.total_results,
            "output_file": state.output_file,
            "bytes_written": state.bytes_written,
        }),
    )
}

/// Open the output for appending after cutting it back to `bytes_written`.
///
/// Bytes past that length belong to a batch that never completed.
async fn open_at_checkpoint(path: &Path, bytes_written: u64) -> Result<tokio::fs::File> {
    let file = tokio::fs::OpenOptions::new()
        .append(true)
        .open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let len = file.metadata().await?.len();
    if len < bytes_written {
        return Err(ClientError::validation(
            "export results",
            format!(
                "{} has {len} bytes but the checkpoint recorded {bytes_written}; delete the checkpoint to start over",
                path.display()
            ),
        )
        .into());
    }
    if len > bytes_written {
        debug!(discarded = len - bytes_written, "Discarding partial batch");
        file.set_len(bytes_written)
            .await
            .with_context(|| format!("Failed to truncate {}", path.display()))?;
    }
    Ok(file)
}

async fn append_page(
    mut stream: ResultStream,
    file: &mut tokio::fs::File,
    skip_header: bool,
) -> Result<u64, ClientError> {
    let mut skipper = HeaderSkipper::new(skip_header);
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let body = skipper.feed(&chunk);
        file.write_all(body).await?;
        written += body.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

async fn estimate(session: &Session, query: &str, time: &TimeRange) -> Result<()> {
    let spl = validate_spl(query)?;
    let (earliest, latest) = time.resolve(&session.defaults);
    validate_time_modifier(&earliest)?;
    validate_time_modifier(&latest)?;

    let request = SearchRequest::new(format!("{spl} | stats count"))
        .time_range(Some(earliest), Some(latest));
    let results = session
        .cancel
        .run(oneshot(&session.client, &request))
        .await?;
    let count = results
        .results
        .first()
        .and_then(|row| row.get("count"))
        .and_then(count_value)
        .unwrap_or(0);

    session.output.status(
        &format!("Estimated results: {count}"),
        json!({ "estimated_count": count }),
    )
}

/// Splunk returns stats counts as strings in JSON output.
fn count_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
