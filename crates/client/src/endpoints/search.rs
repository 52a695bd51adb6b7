//! Oneshot searches and streaming export.

use crate::client::{RequestBody, ResultStream, SplunkClient};
use crate::error::Result;
use crate::models::ResultsResponse;
use crate::retry::Idempotency;
use crate::spl::ensure_search_command;
use crate::validators::{validate_spl, validate_time_modifier};

/// Parameters shared by [`oneshot`] and [`export_events`].
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub spl: String,
    pub earliest_time: Option<String>,
    pub latest_time: Option<String>,
    /// Maximum rows returned; `None` keeps the server default.
    pub count: Option<u64>,
    pub fields: Vec<String>,
}

impl SearchRequest {
    pub fn new(spl: impl Into<String>) -> Self {
        Self {
            spl: spl.into(),
            ..Self::default()
        }
    }

    pub fn time_range(mut self, earliest: Option<String>, latest: Option<String>) -> Self {
        self.earliest_time = earliest;
        self.latest_time = latest;
        self
    }

    pub fn count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    /// Validated `(name, value)` pairs for the search endpoints.
    fn to_pairs(&self) -> Result<Vec<(String, String)>> {
        let spl = validate_spl(&self.spl)?;
        let mut pairs = vec![("search".to_string(), ensure_search_command(spl))];
        if let Some(earliest) = &self.earliest_time {
            pairs.push(("earliest_time".to_string(), validate_time_modifier(earliest)?.to_string()));
        }
        if let Some(latest) = &self.latest_time {
            pairs.push(("latest_time".to_string(), validate_time_modifier(latest)?.to_string()));
        }
        if let Some(count) = self.count {
            pairs.push(("count".to_string(), count.to_string()));
        }
        if !self.fields.is_empty() {
            pairs.push(("field_list".to_string(), self.fields.join(",")));
        }
        Ok(pairs)
    }
}

/// Run a search synchronously and return its results.
///
/// No job is left behind. Oneshot searches only read, so failures are
/// retried like GETs.
pub async fn oneshot(client: &SplunkClient, request: &SearchRequest) -> Result<ResultsResponse> {
    const OPERATION: &str = "run oneshot search";

    let form = request.to_pairs()?;
    client
        .post(
            "/search/jobs/oneshot",
            RequestBody::Form(form),
            Idempotency::Idempotent,
            Some(client.search_timeout()),
            OPERATION,
        )
        .await?
        .into_results(OPERATION)
}

/// Stream events as they are found, in `output_mode` (`csv`, `json`, `raw`, `xml`).
pub async fn export_events(
    client: &SplunkClient,
    request: &SearchRequest,
    output_mode: &str,
) -> Result<ResultStream> {
    const OPERATION: &str = "export search";

    let pairs = request.to_pairs()?;
    let mut params: Vec<(&str, String)> = pairs
        .iter()
        .map(|(name, value)| (name.as_str(), value.clone()))
        .collect();
    params.push(("output_mode", output_mode.to_string()));

    client
        .stream_results("/search/v2/jobs/export", &params, None, OPERATION)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    #[test]
    fn test_pairs_prefix_search_and_validate_times() {
        let request = SearchRequest::new("index=main error")
            .time_range(Some("-1h".to_string()), Some("now".to_string()))
            .count(10)
            .fields(vec!["host".to_string()]);
        let pairs = request.to_pairs().unwrap();
        assert_eq!(pairs[0], ("search".to_string(), "search index=main error".to_string()));
        assert!(pairs.contains(&("earliest_time".to_string(), "-1h".to_string())));
        assert!(pairs.contains(&("count".to_string(), "10".to_string())));
        assert!(pairs.contains(&("field_list".to_string(), "host".to_string())));
    }

    #[test]
    fn test_invalid_time_rejected_locally() {
        let request = SearchRequest::new("index=main").time_range(Some("yesterday".to_string()), None);
        assert!(matches!(
            request.to_pairs().unwrap_err(),
            ClientError::Validation { status: None, .. }
        ));
    }

    #[test]
    fn test_generating_command_kept() {
        let pairs = SearchRequest::new("| makeresults count=3").to_pairs().unwrap();
        assert_eq!(pairs[0].1, "| makeresults count=3");
    }
}
