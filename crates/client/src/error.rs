//! Error types for the Splunk client.
//!
//! Every non-2xx response is turned into one typed variant by
//! [`ClientError::from_response`]. All HTTP-derived variants carry the
//! caller's `operation` label, the status code, and a short body excerpt.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::models::{DispatchState, SplunkMessages};

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Longest body excerpt kept in an error message, in characters.
const MAX_BODY_EXCERPT_CHARS: usize = 512;

/// Body fragments Splunk uses when a search is refused for quota or concurrency reasons.
const QUOTA_HINTS: &[&str] = &[
    "quota",
    "maximum number of concurrent",
    "concurrency limit",
    "max_searches",
    "disk usage",
];

/// Errors that can occur during Splunk client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Credentials were rejected (HTTP 401).
    #[error("{operation}: authentication failed (HTTP {status}): {message}")]
    Authentication {
        operation: String,
        status: u16,
        message: String,
    },

    /// The authenticated user lacks a capability (HTTP 403).
    #[error("{operation}: permission denied (HTTP {status}): {message}")]
    Authorization {
        operation: String,
        status: u16,
        message: String,
    },

    /// The resource, job or collection does not exist (HTTP 404).
    #[error("{operation}: not found (HTTP {status}): {message}")]
    NotFound {
        operation: String,
        status: u16,
        message: String,
    },

    /// Too many requests (HTTP 429), after retries.
    #[error("{operation}: rate limited (HTTP {status}){}: {message}", .retry_after.map(|d| format!(", retry after {}s", d.as_secs())).unwrap_or_default())]
    RateLimited {
        operation: String,
        status: u16,
        message: String,
        retry_after: Option<Duration>,
    },

    /// Search concurrency or disk quota exceeded.
    #[error("{operation}: search quota exceeded (HTTP {status}): {message}")]
    SearchQuota {
        operation: String,
        status: u16,
        message: String,
    },

    /// Server-side failure (HTTP 5xx), after retries.
    #[error("{operation}: server error (HTTP {status}): {message}")]
    Server {
        operation: String,
        status: u16,
        message: String,
    },

    /// Malformed input, rejected locally (`status` is `None`) or by the server (HTTP 400/422).
    #[error("{operation}: invalid request{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Validation {
        operation: String,
        status: Option<u16>,
        message: String,
    },

    /// A search job failed or did not finish in time.
    #[error("search job {sid} {reason}")]
    JobFailed {
        sid: String,
        reason: JobFailureReason,
    },

    /// Any other non-success response.
    #[error("{operation}: Splunk API error (HTTP {status}): {message}")]
    Api {
        operation: String,
        status: u16,
        message: String,
    },

    /// The request never produced a response (connect failure, timeout, TLS, body read).
    #[error("{operation}: request failed: {source}")]
    Transport {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body did not have the expected shape.
    #[error("{operation}: invalid response: {message}")]
    InvalidResponse { operation: String, message: String },

    /// The base URL or resource path could not be turned into a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Local file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a search job is reported as failed.
#[derive(Debug, Clone, PartialEq)]
pub enum JobFailureReason {
    /// The poller gave up before the job reached a terminal state.
    Timeout {
        waited: Duration,
        last_state: DispatchState,
    },
    /// Splunk reported the job as `FAILED`.
    Failed { messages: Vec<String> },
}

impl fmt::Display for JobFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout { waited, last_state } => write!(
                f,
                "timed out after {:.1}s (last state {last_state})",
                waited.as_secs_f64()
            ),
            Self::Failed { messages } if messages.is_empty() => write!(f, "failed"),
            Self::Failed { messages } => write!(f, "failed: {}", messages.join("; ")),
        }
    }
}

impl ClientError {
    /// Map a non-success HTTP response to the matching error variant.
    ///
    /// Quota hints in the body win over the status code; after that the
    /// status alone decides.
    pub fn from_response(
        operation: &str,
        status: u16,
        body: &str,
        retry_after: Option<Duration>,
    ) -> Self {
        let operation = operation.to_string();
        let message = extract_message(body);

        if status != 401 && status != 404 && has_quota_hint(body) {
            return Self::SearchQuota {
                operation,
                status,
                message,
            };
        }

        match status {
            401 => Self::Authentication {
                operation,
                status,
                message,
            },
            403 => Self::Authorization {
                operation,
                status,
                message,
            },
            404 => Self::NotFound {
                operation,
                status,
                message,
            },
            429 => Self::RateLimited {
                operation,
                status,
                message,
                retry_after,
            },
            400 | 422 => Self::Validation {
                operation,
                status: Some(status),
                message,
            },
            500..=599 => Self::Server {
                operation,
                status,
                message,
            },
            _ => Self::Api {
                operation,
                status,
                message,
            },
        }
    }

    /// A locally detected input problem.
    pub fn validation(operation: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            operation: operation.to_string(),
            status: None,
            message: message.into(),
        }
    }

    /// A response that did not have the expected shape.
    pub fn invalid_response(operation: &str, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    /// The operation label attached to this error, if any.
    pub fn operation(&self) -> Option<&str> {
        match self {
            Self::Authentication { operation, .. }
            | Self::Authorization { operation, .. }
            | Self::NotFound { operation, .. }
            | Self::RateLimited { operation, .. }
            | Self::SearchQuota { operation, .. }
            | Self::Server { operation, .. }
            | Self::Validation { operation, .. }
            | Self::Api { operation, .. }
            | Self::Transport { operation, .. }
            | Self::InvalidResponse { operation, .. } => Some(operation),
            Self::JobFailed { .. } | Self::InvalidUrl(_) | Self::Io(_) => None,
        }
    }

    /// The HTTP status code behind this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. }
            | Self::Authorization { status, .. }
            | Self::NotFound { status, .. }
            | Self::RateLimited { status, .. }
            | Self::SearchQuota { status, .. }
            | Self::Server { status, .. }
            | Self::Api { status, .. } => Some(*status),
            Self::Validation { status, .. } => *status,
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error indicates an authentication failure.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Check if the request failed before a response was received.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if this is the poller's timeout condition.
    pub fn is_job_timeout(&self) -> bool {
        matches!(
            self,
            Self::JobFailed {
                reason: JobFailureReason::Timeout { .. },
                ..
            }
        )
    }
}

fn has_quota_hint(body: &str) -> bool {
    let lower = body.to_ascii_lowercase();
    QUOTA_HINTS.iter().any(|hint| lower.contains(hint))
}

/// Flatten Splunk's `{"messages": [...]}` envelope, or excerpt the raw body.
fn extract_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<SplunkMessages>(body)
        && !parsed.messages.is_empty()
    {
        return parsed
            .messages
            .iter()
            .map(|msg| format!("{}: {}", msg.message_type, msg.text))
            .collect::<Vec<_>>()
            .join("; ");
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "(empty response body)".to_string();
    }
    if trimmed.chars().count() > MAX_BODY_EXCERPT_CHARS {
        let excerpt: String = trimmed.chars().take(MAX_BODY_EXCERPT_CHARS).collect();
        format!("{excerpt}...")
    } else {
        trimmed.to_string()
    }
}
