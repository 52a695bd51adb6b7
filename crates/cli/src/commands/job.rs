//! Job command implementation.
//!
//! Responsibilities:
//! - Create jobs and report their sid.
//! - Inspect one job or list recent jobs.
//! - Poll a job to completion with a progress bar.
//! - Send control actions (cancel, pause, unpause, finalize, ttl, touch) and delete jobs.

use anyhow::Result;
use clap::Subcommand;
use serde_json::json;
use splunk_as_client::endpoints::jobs::{self, CreateJobOptions, ExecMode};
use splunk_as_client::{WaitOptions, get_dispatch_state};
use splunk_as_config::constants::{DEFAULT_JOB_LIST_COUNT, DEFAULT_POLL_INTERVAL_SECS};
use std::time::Duration;
use tracing::info;

use crate::commands::search::wait_with_progress;
use crate::commands::{Session, TimeRange};

const JOB_COLUMNS: &[&str] = &[
    "sid",
    "dispatchState",
    "doneProgress",
    "eventCount",
    "resultCount",
    "runDuration",
    "ttl",
];

#[derive(Subcommand)]
pub enum JobCommand {
    /// Create a search job and print its sid
    Create {
        query: String,
        #[command(flatten)]
        time: TimeRange,
        #[arg(short, long)]
        app: Option<String>,
        /// Seconds to keep the finished job's artifacts
        #[arg(long)]
        ttl: Option<u64>,
        /// Maximum number of results the job keeps
        #[arg(long)]
        max_count: Option<u64>,
    },
    /// Show the current state of a job
    Status { sid: String },
    /// List recent jobs
    List {
        #[arg(short, long, default_value_t = DEFAULT_JOB_LIST_COUNT)]
        count: u64,
    },
    /// Wait for a job to finish, showing progress
    Poll {
        sid: String,
        /// Seconds to wait before giving up (default: configured search timeout)
        #[arg(short, long)]
        timeout: Option<u64>,
        /// Seconds between status checks
        #[arg(short, long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
        interval: u64,
    },
    /// Cancel a running job
    Cancel { sid: String },
    /// Pause a running job
    Pause { sid: String },
    /// Resume a paused job
    Unpause { sid: String },
    /// Stop a job and keep the results gathered so far
    Finalize { sid: String },
    /// Delete a job and its artifacts
    Delete { sid: String },
    /// Set the job's time-to-live in seconds
    Ttl { sid: String, seconds: u64 },
    /// Extend the job's time-to-live by its default amount
    Touch { sid: String },
}

pub(crate) async fn run(session: &Session, command: JobCommand) -> Result<()> {
    let client = &session.client;

    match command {
        JobCommand::Create {
            query,
            time,
            app,
            ttl,
            max_count,
        } => {
            let (earliest, latest) = time.resolve(&session.defaults);
            let options = CreateJobOptions {
                earliest_time: Some(earliest),
                latest_time: Some(latest),
                exec_mode: ExecMode::Normal,
                app,
                max_count: Some(max_count.unwrap_or(session.defaults.max_count)),
                ttl,
            };
            let sid = session
                .cancel
                .run(jobs::create_job(client, &query, &options))
                .await?;
            session
                .output
                .status(&format!("Job created: {sid}"), json!({ "sid": sid }))
        }
        JobCommand::Status { sid } => {
            let progress = session.cancel.run(get_dispatch_state(client, &sid)).await?;
            session.output.record(&progress)
        }
        JobCommand::List { count } => {
            let jobs = session.cancel.run(jobs::list_jobs(client, count)).await?;
            session.output.rows(&jobs, JOB_COLUMNS)
        }
        JobCommand::Poll {
            sid,
            timeout,
            interval,
        } => {
            let options = WaitOptions::new(
                timeout
                    .map(Duration::from_secs)
                    .unwrap_or_else(|| client.search_timeout()),
                Duration::from_secs(interval.max(1)),
            );
            info!(sid = %sid, timeout_secs = options.timeout.as_secs(), "Polling job");
            let progress = wait_with_progress(session, &sid, &options).await?;
            session.output.record(&progress)
        }
        JobCommand::Cancel { sid } => {
            session.cancel.run(jobs::cancel_job(client, &sid)).await?;
            acknowledge(session, &sid, "cancel", "Job cancelled")
        }
        JobCommand::Pause { sid } => {
            session.cancel.run(jobs::pause_job(client, &sid)).await?;
            acknowledge(session, &sid, "pause", "Job paused")
        }
        JobCommand::Unpause { sid } => {
            session.cancel.run(jobs::unpause_job(client, &sid)).await?;
            acknowledge(session, &sid, "unpause", "Job resumed")
        }
        JobCommand::Finalize { sid } => {
            session.cancel.run(jobs::finalize_job(client, &sid)).await?;
            acknowledge(session, &sid, "finalize", "Job finalized")
        }
        JobCommand::Delete { sid } => {
            session.cancel.run(jobs::delete_job(client, &sid)).await?;
            acknowledge(session, &sid, "delete", "Job deleted")
        }
        JobCommand::Ttl { sid, seconds } => {
            session
                .cancel
                .run(jobs::set_job_ttl(client, &sid, seconds))
                .await?;
            session.output.status(
                &format!("Job TTL set to {seconds}s: {sid}"),
                json!({ "sid": sid, "action": "setttl", "ttl": seconds }),
            )
        }
        JobCommand::Touch { sid } => {
            session.cancel.run(jobs::touch_job(client, &sid)).await?;
            acknowledge(session, &sid, "touch", "Job TTL extended")
        }
    }
}

fn acknowledge(session: &Session, sid: &str, action: &str, message: &str) -> Result<()> {
    session.output.status(
        &format!("{message}: {sid}"),
        json!({ "sid": sid, "action": action, "status": "ok" }),
    )
}
