//! Main Splunk REST API client.
//!
//! This module provides the primary [`SplunkClient`]: one authenticated
//! session per CLI invocation, exposing generic `get`/`post`/`delete` calls
//! and a streaming read. Endpoint-specific helpers live in
//! [`crate::endpoints`] and are written in terms of these calls.
//!
//! # Submodules
//! - [`builder`]: Client construction and configuration
//! - `request`: Per-attempt request construction and the retry loop
//! - [`stream`]: Re-chunking byte stream for large result bodies
//!
//! # What this module does NOT handle:
//! - Response shape interpretation (see [`crate::models::response`])
//! - Endpoint paths and parameters (see [`crate::endpoints`])
//!
//! # Invariants
//! - Paths must start with `/`. `/services...` and `/servicesNS...` paths are
//!   resolved against the host root, anything else under `/services`.
//! - `output_mode=json` is appended unless the caller supplies `output_mode`.
//! - No response is cached; every call goes to the server.

pub mod builder;
mod request;
pub mod stream;

use reqwest::{Method, Url};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::AuthStrategy;
use crate::clock::Clock;
use crate::error::{ClientError, Result};
use crate::models::ResponseBody;
use crate::retry::{Idempotency, RetryPolicy};

pub use request::{FilePart, RequestBody};
pub use stream::ResultStream;

/// Query parameters as `(name, value)` pairs.
pub type Params<'a> = [(&'a str, String)];

/// Splunk REST API client.
///
/// # Creating a Client
///
/// ```rust,ignore
/// use splunk_as_client::SplunkClient;
///
/// let client = SplunkClient::builder().from_config(&config).build()?;
/// let body = client
///     .get("/server/info", &[], None, "get server info")
///     .await?;
/// ```
#[derive(Debug)]
pub struct SplunkClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) auth: AuthStrategy,
    pub(crate) timeout: Duration,
    pub(crate) search_timeout: Duration,
    pub(crate) retry: RetryPolicy,
    pub(crate) clock: Arc<dyn Clock>,
}

impl SplunkClient {
    /// Create a new client builder.
    pub fn builder() -> builder::SplunkClientBuilder {
        builder::SplunkClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether requests carry a bearer token rather than basic credentials.
    pub fn is_api_token_auth(&self) -> bool {
        matches!(self.auth, AuthStrategy::ApiToken { .. })
    }

    /// Timeout applied to ordinary requests.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Timeout for long-running search operations.
    pub fn search_timeout(&self) -> Duration {
        self.search_timeout
    }

    /// The retry policy applied to every request.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// The clock used for backoff and poll sleeps.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// GET a resource and classify the JSON body.
    pub async fn get(
        &self,
        path: &str,
        params: &Params<'_>,
        timeout: Option<Duration>,
        operation: &str,
    ) -> Result<ResponseBody> {
        let url = self.resolve_url(path, params, operation)?;
        let response = self
            .execute(
                Method::GET,
                url,
                &RequestBody::Empty,
                timeout.unwrap_or(self.timeout),
                Idempotency::Idempotent,
                operation,
            )
            .await?;
        read_body(response, operation).await
    }

    /// POST a form, JSON or multipart body.
    ///
    /// Pass [`Idempotency::NonIdempotent`] for calls that create a resource;
    /// those are only repeated when the server cannot have acted on them.
    pub async fn post(
        &self,
        path: &str,
        body: RequestBody,
        idempotency: Idempotency,
        timeout: Option<Duration>,
        operation: &str,
    ) -> Result<ResponseBody> {
        let url = self.resolve_url(path, &[], operation)?;
        let response = self
            .execute(
                Method::POST,
                url,
                &body,
                timeout.unwrap_or(self.timeout),
                idempotency,
                operation,
            )
            .await?;
        read_body(response, operation).await
    }

    /// DELETE a resource.
    pub async fn delete(
        &self,
        path: &str,
        params: &Params<'_>,
        operation: &str,
    ) -> Result<ResponseBody> {
        let url = self.resolve_url(path, params, operation)?;
        let response = self
            .execute(
                Method::DELETE,
                url,
                &RequestBody::Empty,
                self.timeout,
                Idempotency::Idempotent,
                operation,
            )
            .await?;
        read_body(response, operation).await
    }

    /// GET a streaming endpoint and return its body as bounded chunks.
    ///
    /// Retries cover only the request up to response headers; an error while
    /// reading the body surfaces as a stream item. Re-calling restarts the
    /// download from the beginning.
    pub async fn stream_results(
        &self,
        path: &str,
        params: &Params<'_>,
        timeout: Option<Duration>,
        operation: &str,
    ) -> Result<ResultStream> {
        let url = self.resolve_url(path, params, operation)?;
        let response = self
            .execute(
                Method::GET,
                url,
                &RequestBody::Empty,
                timeout.unwrap_or(self.search_timeout),
                Idempotency::Idempotent,
                operation,
            )
            .await?;
        Ok(ResultStream::from_response(response, operation))
    }

    /// Build the absolute URL for `path` with query parameters.
    pub(crate) fn resolve_url(
        &self,
        path: &str,
        params: &Params<'_>,
        operation: &str,
    ) -> Result<Url> {
        if !path.starts_with('/') {
            return Err(ClientError::validation(
                operation,
                format!("resource path must start with '/': {path}"),
            ));
        }

        let full = if is_services_path(path) {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/services{}", self.base_url, path)
        };
        let mut url = Url::parse(&full).map_err(|e| ClientError::InvalidUrl(format!("{full}: {e}")))?;

        let has_output_mode = params.iter().any(|(name, _)| *name == "output_mode")
            || url.query_pairs().any(|(name, _)| name == "output_mode");
        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
            if !has_output_mode {
                pairs.append_pair("output_mode", "json");
            }
        }
        Ok(url)
    }
}

fn is_services_path(path: &str) -> bool {
    ["/services", "/servicesNS"].iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'))
    })
}

async fn read_body(response: reqwest::Response, operation: &str) -> Result<ResponseBody> {
    let bytes = response
        .bytes()
        .await
        .map_err(|source| ClientError::Transport {
            operation: operation.to_string(),
            source,
        })?;
    ResponseBody::parse(operation, &bytes)
}
