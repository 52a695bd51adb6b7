//! Ctrl-C handling for command handlers.
//!
//! Responsibilities:
//! - Provide a cloneable cancellation token shared between the signal task
//!   and the running command.
//! - Race client calls against the token so a pending request or poll sleep
//!   is dropped as soon as the user interrupts.
//! - Define the `Cancelled` marker error that `main` maps to exit code 130.
//!
//! Does NOT handle:
//! - Installing the signal listener (done in `main`).
//! - Cancelling the remote search job; an interrupted `job poll` leaves the
//!   job running on the server.
//!
//! Invariants:
//! - Once cancelled, the token stays cancelled.

use std::fmt;
use std::future::Future;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::Notify;

/// Standard Unix exit code for SIGINT: 128 + 2.
pub const SIGINT_EXIT_CODE: u8 = 130;

/// Cancellation token usable across async tasks.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the token (idempotent).
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Await cancellation.
    ///
    /// The `notified()` future is created before the flag is checked so a
    /// cancel racing with this call is never missed.
    pub async fn cancelled(&self) {
        let notified = self.notify.notified();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }

    /// Run `fut` to completion unless the token fires first.
    ///
    /// Errors from `fut` are converted into `anyhow::Error` so the
    /// `ClientError` stays downcastable for exit code mapping.
    pub async fn run<T, E, F>(&self, fut: F) -> anyhow::Result<T>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<anyhow::Error>,
    {
        tokio::select! {
            res = fut => res.map_err(Into::into),
            _ = self.cancelled() => Err(Cancelled.into()),
        }
    }
}

/// Marker error used to indicate user-driven cancellation.
#[derive(Debug, Clone, Copy)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cancelled")
    }
}

impl std::error::Error for Cancelled {}

/// Returns true if this anyhow error represents a cancellation.
pub fn is_cancelled_error(err: &anyhow::Error) -> bool {
    err.is::<Cancelled>()
}

/// Print the standard cancellation message to stderr.
pub fn print_cancelled_message() {
    eprintln!("^C\nOperation cancelled by user");
}
