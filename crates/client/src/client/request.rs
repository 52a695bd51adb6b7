//! Request bodies and the retry loop.
//!
//! A fresh `reqwest::RequestBuilder` is built for every attempt, so
//! multipart bodies (which cannot be cloned) retry like any other.

use reqwest::header::RETRY_AFTER;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::auth::ApplyAuth;
use crate::client::SplunkClient;
use crate::error::{ClientError, Result};
use crate::retry::{Failure, Idempotency, parse_retry_after};

/// A file attached to a multipart request.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Form field name.
    pub field: String,
    pub file_name: String,
    pub content: Vec<u8>,
}

/// Body of a POST request.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// `application/x-www-form-urlencoded`; repeated keys are allowed.
    Form(Vec<(String, String)>),
    /// `application/json`.
    Json(Value),
    /// `multipart/form-data` with text fields and file parts.
    Multipart {
        fields: Vec<(String, String)>,
        files: Vec<FilePart>,
    },
}

impl RequestBody {
    /// Form body from borrowed pairs.
    pub fn form<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Empty => builder,
            Self::Form(pairs) => builder.form(pairs),
            Self::Json(value) => builder.json(value),
            Self::Multipart { fields, files } => {
                let mut form = Form::new();
                for (name, value) in fields {
                    form = form.text(name.clone(), value.clone());
                }
                for file in files {
                    let part = Part::bytes(file.content.clone()).file_name(file.file_name.clone());
                    form = form.part(file.field.clone(), part);
                }
                builder.multipart(form)
            }
        }
    }
}

impl SplunkClient {
    /// Send a request, retrying transient failures per the client's policy.
    ///
    /// Returns the first 2xx response. Non-2xx responses that are not
    /// retried (or exhaust the budget) are mapped through
    /// [`ClientError::from_response`].
    pub(crate) async fn execute(
        &self,
        method: Method,
        url: Url,
        body: &RequestBody,
        timeout: Duration,
        idempotency: Idempotency,
        operation: &str,
    ) -> Result<Response> {
        let mut attempt = 0usize;
        loop {
            let builder = body.apply(
                self.http
                    .request(method.clone(), url.clone())
                    .timeout(timeout)
                    .apply_auth(&self.auth),
            );

            debug!(
                operation,
                method = %method,
                path = url.path(),
                attempt = attempt + 1,
                max_attempts = self.retry.max_attempts,
                "Sending request"
            );

            let failure = match builder.send().await {
                Ok(response) if response.status().is_success() => {
                    if attempt > 0 {
                        debug!(operation, attempt = attempt + 1, "Request succeeded after retry");
                    }
                    return Ok(response);
                }
                Ok(response) => {
                    let status = response.status().as_u16();
                    let retry_after = response
                        .headers()
                        .get(RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(parse_retry_after);

                    if self.can_retry(Failure::Status(status), idempotency, attempt) {
                        let delay = self.retry.delay_for(attempt, retry_after);
                        debug!(
                            operation,
                            status,
                            attempt = attempt + 1,
                            delay_ms = delay.as_millis() as u64,
                            "Transient HTTP status, backing off"
                        );
                        drop(response);
                        self.clock.sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    let body = response.text().await.unwrap_or_default();
                    let err = ClientError::from_response(operation, status, &body, retry_after);
                    if attempt > 0 {
                        warn!(operation, attempts = attempt + 1, status, "Retries exhausted");
                    }
                    return Err(err);
                }
                Err(err) => (Failure::from_transport(&err), err),
            };

            let (kind, source) = failure;
            if self.can_retry(kind, idempotency, attempt) {
                let delay = self.retry.backoff(attempt);
                debug!(
                    operation,
                    failure = ?kind,
                    error = %source,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "Transport failure, backing off"
                );
                self.clock.sleep(delay).await;
                attempt += 1;
                continue;
            }

            if attempt > 0 {
                warn!(operation, attempts = attempt + 1, failure = ?kind, "Retries exhausted");
            }
            return Err(ClientError::Transport {
                operation: operation.to_string(),
                source,
            });
        }
    }

    fn can_retry(&self, failure: Failure, idempotency: Idempotency, attempt: usize) -> bool {
        self.retry.should_retry(failure, idempotency) && self.retry.has_attempts_left(attempt)
    }
}
