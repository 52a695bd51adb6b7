//! Search command implementation.
//!
//! Responsibilities:
//! - Run oneshot, normal (optionally waited) and blocking searches.
//! - Read final and preview results of an existing job.
//! - Validate SPL locally and report complexity and optimization hints.
//!
//! Does NOT handle:
//! - Job control (see `job`) or large exports (see `export`).

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use serde_json::json;
use splunk_as_client::endpoints::jobs::{self, CreateJobOptions, ExecMode, ResultsQuery};
use splunk_as_client::endpoints::search::{SearchRequest, oneshot};
use splunk_as_client::spl::{self, Complexity, SplCommand};
use splunk_as_client::validators::validate_spl;
use splunk_as_client::{ResultsResponse, WaitOptions, wait_for_job};
use std::time::Duration;
use tracing::info;

use crate::commands::{Output, Session, TimeRange, split_fields};
use crate::progress::SearchProgress;

#[derive(Subcommand)]
pub enum SearchCommand {
    /// Run a search synchronously without leaving a job behind
    Oneshot {
        /// The SPL query (a leading `search` is added when needed)
        query: String,
        #[command(flatten)]
        time: TimeRange,
        /// Maximum number of results
        #[arg(short, long)]
        count: Option<u64>,
        /// Comma-separated fields to return
        #[arg(long)]
        fields: Option<String>,
    },
    /// Create a job and return its sid, or wait for and print its results
    Normal {
        query: String,
        #[command(flatten)]
        time: TimeRange,
        /// App namespace to dispatch in
        #[arg(short, long)]
        app: Option<String>,
        /// Wait for the job and print its results
        #[arg(short, long)]
        wait: bool,
        /// Seconds to wait before giving up (default: configured search timeout)
        #[arg(long, requires = "wait")]
        timeout: Option<u64>,
        /// Maximum number of results to print when waiting
        #[arg(short, long)]
        count: Option<u64>,
    },
    /// Create a job that returns only once it has finished, then print results
    Blocking {
        query: String,
        #[command(flatten)]
        time: TimeRange,
        #[arg(short, long)]
        app: Option<String>,
        #[arg(short, long)]
        count: Option<u64>,
    },
    /// Check SPL syntax locally and suggest optimizations
    Validate {
        query: String,
    },
    /// Read the final results of a finished job
    Results {
        sid: String,
        /// Index of the first result
        #[arg(long, default_value_t = 0)]
        offset: u64,
        /// Number of results (0 for all)
        #[arg(short, long)]
        count: Option<u64>,
        /// Comma-separated fields to return
        #[arg(long)]
        fields: Option<String>,
    },
    /// Read partial results of a running job
    Preview {
        sid: String,
        #[arg(short, long, default_value_t = 100)]
        count: u64,
    },
}

/// Outcome of local SPL validation.
#[derive(Debug, Serialize)]
struct ValidationReport {
    valid: bool,
    complexity: Complexity,
    commands: Vec<SplCommand>,
    hints: Vec<String>,
}

pub(crate) async fn run(session: &Session, command: SearchCommand) -> Result<()> {
    match command {
        SearchCommand::Oneshot {
            query,
            time,
            count,
            fields,
        } => {
            let (earliest, latest) = time.resolve(&session.defaults);
            let mut request = SearchRequest::new(query)
                .time_range(Some(earliest), Some(latest))
                .fields(split_fields(fields.as_deref()));
            if let Some(count) = count {
                request = request.count(count);
            }

            info!("Running oneshot search");
            let results = session.cancel.run(oneshot(&session.client, &request)).await?;
            print_results(&session.output, &results)
        }
        SearchCommand::Normal {
            query,
            time,
            app,
            wait,
            timeout,
            count,
        } => {
            let sid = create(session, &query, &time, app, ExecMode::Normal).await?;
            if !wait {
                return session
                    .output
                    .status(&format!("Job created: {sid}"), json!({ "sid": sid }));
            }

            let timeout = timeout
                .map(Duration::from_secs)
                .unwrap_or_else(|| session.client.search_timeout());
            let options = WaitOptions {
                timeout,
                ..WaitOptions::default()
            };
            wait_with_progress(session, &sid, &options).await?;
            fetch_and_print(session, &sid, count).await
        }
        SearchCommand::Blocking {
            query,
            time,
            app,
            count,
        } => {
            let sid = create(session, &query, &time, app, ExecMode::Blocking).await?;
            fetch_and_print(session, &sid, count).await
        }
        SearchCommand::Validate { query } => validate(&session.output, &query),
        SearchCommand::Results {
            sid,
            offset,
            count,
            fields,
        } => {
            let query = ResultsQuery {
                offset,
                count,
                fields: split_fields(fields.as_deref()),
            };
            let results = session
                .cancel
                .run(jobs::get_results(&session.client, &sid, &query))
                .await?;
            print_results(&session.output, &results)
        }
        SearchCommand::Preview { sid, count } => {
            let results = session
                .cancel
                .run(jobs::get_results_preview(&session.client, &sid, count))
                .await?;
            print_results(&session.output, &results)
        }
    }
}

async fn create(
    session: &Session,
    query: &str,
    time: &TimeRange,
    app: Option<String>,
    exec_mode: ExecMode,
) -> Result<String> {
    let (earliest, latest) = time.resolve(&session.defaults);
    let options = CreateJobOptions {
        earliest_time: Some(earliest),
        latest_time: Some(latest),
        exec_mode,
        app,
        max_count: Some(session.defaults.max_count),
        ttl: None,
    };

    info!(exec_mode = exec_mode.as_str(), "Creating search job");
    let sid = session
        .cancel
        .run(jobs::create_job(&session.client, query, &options))
        .await?;
    info!(sid = %sid, "Job created");
    Ok(sid)
}

/// Poll `sid` to completion, drawing the progress bar unless quiet.
///
/// A `FAILED` job is turned into an error here so callers only see finished jobs.
pub(crate) async fn wait_with_progress(
    session: &Session,
    sid: &str,
    options: &WaitOptions,
) -> Result<splunk_as_client::JobProgress> {
    let mut bar = SearchProgress::new(session.progress, sid);
    let progress = session
        .cancel
        .run(wait_for_job(&session.client, sid, options, Some(&mut bar)))
        .await?;
    bar.finish(&progress);

    if progress.is_failed() {
        return Err(splunk_as_client::ClientError::JobFailed {
            sid: sid.to_string(),
            reason: splunk_as_client::JobFailureReason::Failed {
                messages: progress.messages,
            },
        }
        .into());
    }
    Ok(progress)
}

async fn fetch_and_print(session: &Session, sid: &str, count: Option<u64>) -> Result<()> {
    let query = ResultsQuery {
        offset: 0,
        count: Some(count.unwrap_or(0)),
        fields: Vec::new(),
    };
    let results = session
        .cancel
        .run(jobs::get_results(&session.client, sid, &query))
        .await?;
    print_results(&session.output, &results)
}

pub(crate) fn print_results(output: &Output, results: &ResultsResponse) -> Result<()> {
    for message in &results.messages {
        eprintln!("{}: {}", message.message_type, message.text);
    }

    let names = results.field_names();
    let columns: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|name| !name.starts_with('_') || *name == "_raw" || *name == "_time")
        .collect();
    output.values(&results.results, &columns)
}

pub(crate) fn validate(output: &Output, query: &str) -> Result<()> {
    validate_spl(query)?;

    let report = ValidationReport {
        valid: true,
        complexity: spl::estimate_complexity(query),
        commands: spl::parse_spl_commands(query),
        hints: spl::optimization_hints(query),
    };

    match output.format {
        crate::formatters::OutputFormat::Text => {
            let mut text = format!("Valid SPL ({} complexity)\n", report.complexity);
            let pipeline: Vec<&str> = report.commands.iter().map(|c| c.name.as_str()).collect();
            text.push_str(&format!("Commands: {}\n", pipeline.join(" | ")));
            for hint in &report.hints {
                text.push_str(&format!("Hint: {hint}\n"));
            }
            crate::formatters::output_result(&text, output.format, output.file.as_deref())
        }
        _ => output.record(&report),
    }
}
