//! Splunk REST API client.
//!
//! One authenticated [`SplunkClient`] per session, with retry and backoff
//! for transient failures, bearer-token or basic authentication, streamed
//! result downloads, and a job poller that waits for a search to finish.
//!
//! ```rust,ignore
//! use splunk_as_client::{SplunkClient, WaitOptions, endpoints::jobs, wait_for_job};
//!
//! let client = SplunkClient::builder().from_config(&config).build()?;
//! let sid = jobs::create_job(&client, "index=main | head 10", &Default::default()).await?;
//! let done = wait_for_job(&client, &sid, &WaitOptions::default(), None).await?;
//! ```

mod auth;
pub mod client;
pub mod clock;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod poller;
pub mod retry;
mod serde_helpers;
pub mod spl;
pub mod validators;

pub use auth::AuthStrategy;
pub use client::builder::SplunkClientBuilder;
pub use client::{FilePart, Params, RequestBody, ResultStream, SplunkClient};
pub use clock::{Clock, ManualClock, TokioClock};
pub use error::{ClientError, JobFailureReason, Result};
pub use models::{
    DispatchState, JobProgress, JobSummary, ResponseBody, ResultsResponse, SplunkMessage,
};
pub use poller::{ProgressSink, WaitOptions, get_dispatch_state, wait_for_job};
pub use retry::{Idempotency, RetryPolicy};
