//! Retry policy for transient request failures.
//!
//! Responsibilities:
//! - Decide whether a failed attempt may be repeated.
//! - Compute the exponential backoff delay for the next attempt.
//!
//! Does NOT handle:
//! - Sending requests or sleeping (see `client::request` and `clock`).
//!
//! Invariants:
//! - `max_attempts` is at least 1 and counts the first attempt.
//! - Non-idempotent requests are repeated only when the server cannot have
//!   acted on them: HTTP 429 and connection-establishment failures.

use std::time::Duration;

use splunk_as_config::constants::{
    DEFAULT_MAX_RETRIES, DEFAULT_RETRY_BASE_DELAY_MS, DEFAULT_RETRY_MAX_DELAY_SECS,
};

/// Whether repeating a request can duplicate a server-side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Idempotency {
    /// Safe to repeat (reads, deletes, control actions, updates keyed by name).
    Idempotent,
    /// Repeating may create a second resource (e.g. dispatching a search job).
    NonIdempotent,
}

/// What went wrong with one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// The server answered with a non-success status.
    Status(u16),
    /// The connection could not be established.
    Connect,
    /// The request timed out after it may have reached the server.
    Timeout,
    /// Any other transport failure.
    Other,
}

impl Failure {
    /// Classify a transport error from reqwest.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_connect() {
            Self::Connect
        } else if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Other
        }
    }
}

/// Bounded exponential backoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Status codes treated as transient.
    pub retryable_statuses: Vec<u16>,
    /// Whether request timeouts are retried (idempotent requests only).
    pub retry_timeouts: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::with_max_retries(DEFAULT_MAX_RETRIES)
    }
}

impl RetryPolicy {
    /// Default policy allowing `max_retries` repeats after the first attempt.
    pub fn with_max_retries(max_retries: usize) -> Self {
        Self {
            max_attempts: max_retries.saturating_add(1),
            base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
            max_delay: Duration::from_secs(DEFAULT_RETRY_MAX_DELAY_SECS),
            retryable_statuses: vec![429, 500, 502, 503, 504],
            retry_timeouts: true,
        }
    }

    /// A policy that never repeats a request.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before the attempt following zero-based `attempt`.
    ///
    /// `min(base_delay * 2^attempt, max_delay)`.
    pub fn backoff(&self, attempt: usize) -> Duration {
        let factor = 1u32.checked_shl(attempt.min(31) as u32).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    /// Delay before the next attempt, honouring a server `Retry-After` hint.
    pub fn delay_for(&self, attempt: usize, retry_after: Option<Duration>) -> Duration {
        match retry_after {
            Some(hint) => hint.min(self.max_delay),
            None => self.backoff(attempt),
        }
    }

    /// Whether a failure of this kind may be retried at all.
    pub fn should_retry(&self, failure: Failure, idempotency: Idempotency) -> bool {
        match (failure, idempotency) {
            (Failure::Status(429), _) => self.retryable_statuses.contains(&429),
            (Failure::Connect, _) => true,
            (_, Idempotency::NonIdempotent) => false,
            (Failure::Status(status), Idempotency::Idempotent) => {
                self.retryable_statuses.contains(&status)
            }
            (Failure::Timeout, Idempotency::Idempotent) => self.retry_timeouts,
            (Failure::Other, Idempotency::Idempotent) => false,
        }
    }

    /// Whether another attempt is allowed after zero-based `attempt` failed.
    pub fn has_attempts_left(&self, attempt: usize) -> bool {
        attempt + 1 < self.max_attempts.max(1)
    }
}

/// Parse a `Retry-After` header value given in delta seconds.
///
/// HTTP-date values are ignored and fall back to computed backoff.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
