//! Job polling: one-shot dispatch-state reads and the wait loop.
//!
//! Responsibilities:
//! - Fetch a job's detail entry and turn it into a [`JobProgress`] snapshot.
//! - Poll until the job reaches `DONE` or `FAILED`, or the timeout elapses.
//! - Surface each snapshot to an optional progress sink.
//!
//! Does NOT handle:
//! - Job creation or control actions (see [`crate::endpoints::jobs`]).
//! - Cancelling the remote job when the caller gives up.
//!
//! Invariants:
//! - Snapshots are produced strictly in poll order, one request in flight.
//! - A `FAILED` job is a normal return value; only HTTP errors, malformed
//!   responses and the timeout are errors.
//! - The timeout check happens after the terminal check, so a job that
//!   finishes on the last poll is still returned. The loop gives up within
//!   `timeout + poll_interval` of starting.

use std::time::Duration;
use tracing::debug;

use splunk_as_config::constants::{DEFAULT_POLL_INTERVAL_SECS, DEFAULT_SEARCH_TIMEOUT_SECS};

use crate::client::SplunkClient;
use crate::endpoints::encode_path_segment;
use crate::error::{ClientError, JobFailureReason, Result};
use crate::models::JobProgress;
use crate::validators::validate_sid;

/// Bounds for [`wait_for_job`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }
}

impl WaitOptions {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }
}

/// Receives every snapshot taken by [`wait_for_job`].
pub trait ProgressSink {
    fn on_progress(&mut self, progress: &JobProgress);
}

impl<F> ProgressSink for F
where
    F: FnMut(&JobProgress),
{
    fn on_progress(&mut self, progress: &JobProgress) {
        self(progress)
    }
}

/// Query a job's current state once.
pub async fn get_dispatch_state(client: &SplunkClient, sid: &str) -> Result<JobProgress> {
    const OPERATION: &str = "get job status";

    let sid = validate_sid(sid)?;
    let path = format!("/search/v2/jobs/{}", encode_path_segment(sid));
    let entry = client
        .get(&path, &[], None, OPERATION)
        .await?
        .into_first_entry(OPERATION)?;
    JobProgress::from_entry(entry, sid, OPERATION)
}

/// Poll a job until it reaches a terminal state.
///
/// Returns the terminal snapshot, including when the job `FAILED`. Fails
/// with [`ClientError::JobFailed`] carrying [`JobFailureReason::Timeout`]
/// when the job is still running after `options.timeout`.
pub async fn wait_for_job(
    client: &SplunkClient,
    sid: &str,
    options: &WaitOptions,
    mut sink: Option<&mut dyn ProgressSink>,
) -> Result<JobProgress> {
    let clock = client.clock();
    let started = clock.now();
    let mut polls = 0u32;

    loop {
        let progress = get_dispatch_state(client, sid).await?;
        polls += 1;

        debug!(
            sid,
            poll = polls,
            state = %progress.state,
            progress = progress.progress_percent,
            result_count = progress.result_count,
            "Polled job"
        );

        if let Some(sink) = sink.as_deref_mut() {
            sink.on_progress(&progress);
        }

        if progress.is_terminal() {
            return Ok(progress);
        }

        let waited = clock.now().saturating_duration_since(started);
        if waited >= options.timeout {
            return Err(ClientError::JobFailed {
                sid: progress.sid,
                reason: JobFailureReason::Timeout {
                    waited,
                    last_state: progress.state,
                },
            });
        }

        clock.sleep(options.poll_interval).await;
    }
}
