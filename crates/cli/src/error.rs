//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map `ClientError` variants to the matching exit code.
//!
//! Does NOT handle:
//! - Error message formatting (handled by the error's `Display` in `main`).
//! - Signal handling (see cancellation.rs for SIGINT handling).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for specific error categories.
//! - Exit code 130 is reserved for SIGINT (Unix standard: 128 + SIGINT).

use splunk_as_client::ClientError;

use crate::cancellation::SIGINT_EXIT_CODE;

/// Structured exit codes for splunk-as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Command completed successfully.
    Success = 0,

    /// Unhandled or generic failure, including configuration errors.
    GeneralError = 1,

    /// Credentials were rejected (HTTP 401).
    ///
    /// Scripts should refresh credentials.
    AuthenticationFailed = 2,

    /// Network, TLS or timeout failure before a response arrived.
    ///
    /// Scripts may retry with backoff.
    ConnectionError = 3,

    /// Job, collection, saved search or other resource does not exist.
    NotFound = 4,

    /// Invalid SPL, time modifier, name or other input.
    ///
    /// Scripts should fix the input and not retry the same request.
    ValidationError = 5,

    /// The user lacks a capability (HTTP 403).
    PermissionDenied = 6,

    /// HTTP 429 or search quota exceeded.
    ///
    /// Scripts should back off and retry later.
    RateLimited = 7,

    /// Splunk answered with a 5xx after retries.
    ServerError = 8,

    /// The search job failed or did not finish within the timeout.
    JobFailed = 9,

    /// SIGINT/Ctrl+C (128 + 2).
    Interrupted = SIGINT_EXIT_CODE,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }

    /// Returns true if this exit code indicates a retryable condition.
    #[allow(dead_code)]
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            ExitCode::ConnectionError | ExitCode::RateLimited | ExitCode::ServerError
        )
    }
}

impl From<&ClientError> for ExitCode {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::Authentication { .. } => ExitCode::AuthenticationFailed,
            ClientError::Authorization { .. } => ExitCode::PermissionDenied,
            ClientError::NotFound { .. } => ExitCode::NotFound,
            ClientError::RateLimited { .. } | ClientError::SearchQuota { .. } => {
                ExitCode::RateLimited
            }
            ClientError::Server { .. } => ExitCode::ServerError,
            ClientError::Validation { .. } | ClientError::InvalidResponse { .. } => {
                ExitCode::ValidationError
            }
            ClientError::JobFailed { .. } => ExitCode::JobFailed,
            ClientError::Transport { .. } | ClientError::InvalidUrl(_) => {
                ExitCode::ConnectionError
            }
            ClientError::Api { .. } | ClientError::Io(_) => ExitCode::GeneralError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// The exit code for this error, `GeneralError` when no `ClientError` is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        self.chain()
            .find_map(|cause| cause.downcast_ref::<ClientError>())
            .map(ExitCode::from)
            .unwrap_or(ExitCode::GeneralError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use splunk_as_client::JobFailureReason;
    use splunk_as_client::models::DispatchState;
    use std::time::Duration;

    fn http_error(status: u16) -> ClientError {
        ClientError::from_response("test op", status, "", None)
    }

    #[test]
    fn test_exit_code_as_i32() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::JobFailed.as_i32(), 9);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
    }

    #[test]
    fn test_is_retryable() {
        assert!(ExitCode::ConnectionError.is_retryable());
        assert!(ExitCode::RateLimited.is_retryable());
        assert!(ExitCode::ServerError.is_retryable());
        assert!(!ExitCode::ValidationError.is_retryable());
        assert!(!ExitCode::JobFailed.is_retryable());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ExitCode::from(&http_error(401)), ExitCode::AuthenticationFailed);
        assert_eq!(ExitCode::from(&http_error(403)), ExitCode::PermissionDenied);
        assert_eq!(ExitCode::from(&http_error(404)), ExitCode::NotFound);
        assert_eq!(ExitCode::from(&http_error(400)), ExitCode::ValidationError);
        assert_eq!(ExitCode::from(&http_error(429)), ExitCode::RateLimited);
        assert_eq!(ExitCode::from(&http_error(503)), ExitCode::ServerError);
        assert_eq!(ExitCode::from(&http_error(409)), ExitCode::GeneralError);
    }

    #[test]
    fn test_quota_maps_to_rate_limited() {
        let err = ClientError::from_response(
            "create job",
            503,
            "The maximum number of concurrent historical searches has been reached",
            None,
        );
        assert_eq!(ExitCode::from(&err), ExitCode::RateLimited);
    }

    #[test]
    fn test_job_timeout_maps_to_job_failed() {
        let err = ClientError::JobFailed {
            sid: "1703779200.12345".to_string(),
            reason: JobFailureReason::Timeout {
                waited: Duration::from_secs(6),
                last_state: DispatchState::Running,
            },
        };
        assert_eq!(ExitCode::from(&err), ExitCode::JobFailed);
    }

    #[test]
    fn test_exit_code_found_through_context() {
        let err = anyhow::Error::new(http_error(404)).context("while reading job");
        assert_eq!(err.exit_code(), ExitCode::NotFound);

        let wrapped: anyhow::Result<()> = Err(http_error(401)).context("outer");
        assert_eq!(
            wrapped.unwrap_err().exit_code(),
            ExitCode::AuthenticationFailed
        );
    }

    #[test]
    fn test_non_client_error_is_general() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(err.exit_code(), ExitCode::GeneralError);
    }
}
