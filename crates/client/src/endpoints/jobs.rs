//! Search job lifecycle: create, list, read results, control, delete.
//!
//! Status reads and the wait loop live in [`crate::poller`].

use serde_json::Value;

use crate::client::{RequestBody, ResultStream, SplunkClient};
use crate::endpoints::{encode_path_segment, scoped};
use crate::error::{ClientError, Result};
use crate::models::{JobControlAction, JobSummary, ResponseBody, ResultsResponse};
use crate::retry::Idempotency;
use crate::spl::ensure_search_command;
use crate::validators::{validate_app_name, validate_sid, validate_spl, validate_time_modifier};

const JOBS_PATH: &str = "search/v2/jobs";

/// How the create call behaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecMode {
    /// Return the sid immediately.
    #[default]
    Normal,
    /// Return only once the job has finished.
    Blocking,
}

impl ExecMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Blocking => "blocking",
        }
    }
}

/// Options for [`create_job`].
#[derive(Debug, Clone, Default)]
pub struct CreateJobOptions {
    pub earliest_time: Option<String>,
    pub latest_time: Option<String>,
    pub exec_mode: ExecMode,
    /// Dispatch in this app's namespace instead of the user default.
    pub app: Option<String>,
    pub max_count: Option<u64>,
    /// Seconds the finished job's artifacts are kept.
    pub ttl: Option<u64>,
}

/// Paging and projection for result reads.
#[derive(Debug, Clone, Default)]
pub struct ResultsQuery {
    pub offset: u64,
    /// `None` lets the server apply its default page size; `Some(0)` means all.
    pub count: Option<u64>,
    pub fields: Vec<String>,
}

impl ResultsQuery {
    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("offset", self.offset.to_string())];
        if let Some(count) = self.count {
            params.push(("count", count.to_string()));
        }
        if !self.fields.is_empty() {
            params.push(("field_list", self.fields.join(",")));
        }
        params
    }
}

fn job_path(sid: &str, suffix: &str) -> String {
    format!("/{JOBS_PATH}/{}{suffix}", encode_path_segment(sid))
}

/// Pull the sid out of a create/dispatch response.
///
/// Splunk answers with `{"sid": "..."}` for JSON output, but some versions
/// wrap it in an entry collection instead.
pub(crate) fn extract_sid(body: ResponseBody, operation: &str) -> Result<String> {
    let sid = match body {
        ResponseBody::Document(doc) => doc.get("sid").and_then(Value::as_str).map(str::to_string),
        ResponseBody::Entries(collection) => collection.entry.into_iter().next().and_then(|entry| {
            entry
                .content_str("sid")
                .or_else(|| (!entry.name.is_empty()).then_some(entry.name))
        }),
        other => {
            return Err(ClientError::invalid_response(
                operation,
                format!("expected a sid, got {}", other.kind()),
            ));
        }
    };
    sid.filter(|s| !s.is_empty())
        .ok_or_else(|| ClientError::invalid_response(operation, "response did not include a sid"))
}

/// Create a search job and return its sid.
///
/// Bare search terms get a `search` prefix. The request is not repeated
/// after a server error, since the job may already exist.
pub async fn create_job(
    client: &SplunkClient,
    spl: &str,
    options: &CreateJobOptions,
) -> Result<String> {
    const OPERATION: &str = "create search job";

    let spl = validate_spl(spl)?;
    let mut form = vec![
        ("search".to_string(), ensure_search_command(spl)),
        ("exec_mode".to_string(), options.exec_mode.as_str().to_string()),
    ];
    if let Some(earliest) = &options.earliest_time {
        form.push(("earliest_time".to_string(), validate_time_modifier(earliest)?.to_string()));
    }
    if let Some(latest) = &options.latest_time {
        form.push(("latest_time".to_string(), validate_time_modifier(latest)?.to_string()));
    }
    if let Some(max_count) = options.max_count {
        form.push(("max_count".to_string(), max_count.to_string()));
    }
    if let Some(ttl) = options.ttl {
        form.push(("timeout".to_string(), ttl.to_string()));
    }

    let app = options.app.as_deref().map(validate_app_name).transpose()?;
    let path = scoped(app, JOBS_PATH);

    // Blocking creates hold the connection until the job finishes.
    let timeout = match options.exec_mode {
        ExecMode::Blocking => Some(client.search_timeout()),
        ExecMode::Normal => None,
    };

    let body = client
        .post(
            &path,
            RequestBody::Form(form),
            Idempotency::NonIdempotent,
            timeout,
            OPERATION,
        )
        .await?;
    extract_sid(body, OPERATION)
}

/// List recent jobs visible to the caller.
pub async fn list_jobs(client: &SplunkClient, count: u64) -> Result<Vec<JobSummary>> {
    const OPERATION: &str = "list search jobs";

    let collection = client
        .get(
            &format!("/{JOBS_PATH}"),
            &[("count", count.to_string())],
            None,
            OPERATION,
        )
        .await?
        .into_entries(OPERATION)?;

    collection
        .entry
        .into_iter()
        .map(|entry| JobSummary::from_entry(entry, OPERATION))
        .collect()
}

/// Read a page of final results.
pub async fn get_results(
    client: &SplunkClient,
    sid: &str,
    query: &ResultsQuery,
) -> Result<ResultsResponse> {
    const OPERATION: &str = "get job results";

    let sid = validate_sid(sid)?;
    client
        .get(&job_path(sid, "/results"), &query.to_params(), None, OPERATION)
        .await?
        .into_results(OPERATION)
}

/// Read partial results of a running job.
pub async fn get_results_preview(
    client: &SplunkClient,
    sid: &str,
    count: u64,
) -> Result<ResultsResponse> {
    const OPERATION: &str = "get job results preview";

    let sid = validate_sid(sid)?;
    client
        .get(
            &job_path(sid, "/results_preview"),
            &[("count", count.to_string())],
            None,
            OPERATION,
        )
        .await?
        .into_results(OPERATION)
}

/// Stream a page of results in `output_mode` (`csv`, `json`, `xml`).
///
/// A non-empty `fields` narrows the columns through `field_list`.
pub async fn stream_results_page(
    client: &SplunkClient,
    sid: &str,
    offset: u64,
    count: u64,
    output_mode: &str,
    fields: &[String],
) -> Result<ResultStream> {
    const OPERATION: &str = "export job results";

    let sid = validate_sid(sid)?;
    let mut params = vec![
        ("output_mode", output_mode.to_string()),
        ("offset", offset.to_string()),
        ("count", count.to_string()),
    ];
    if !fields.is_empty() {
        params.push(("field_list", fields.join(",")));
    }
    client
        .stream_results(&job_path(sid, "/results"), &params, None, OPERATION)
        .await
}

/// Send a control action to a job.
///
/// Control actions are safe to repeat and are retried like reads.
pub async fn control_job(
    client: &SplunkClient,
    sid: &str,
    action: JobControlAction,
) -> Result<()> {
    let operation = format!("{} job", action.as_str());

    let sid = validate_sid(sid)?;
    let mut form = vec![("action".to_string(), action.as_str().to_string())];
    if let JobControlAction::SetTtl(ttl) = action {
        form.push(("ttl".to_string(), ttl.to_string()));
    }

    client
        .post(
            &job_path(sid, "/control"),
            RequestBody::Form(form),
            Idempotency::Idempotent,
            None,
            &operation,
        )
        .await?;
    Ok(())
}

pub async fn cancel_job(client: &SplunkClient, sid: &str) -> Result<()> {
    control_job(client, sid, JobControlAction::Cancel).await
}

pub async fn pause_job(client: &SplunkClient, sid: &str) -> Result<()> {
    control_job(client, sid, JobControlAction::Pause).await
}

pub async fn unpause_job(client: &SplunkClient, sid: &str) -> Result<()> {
    control_job(client, sid, JobControlAction::Unpause).await
}

/// Stop the job and keep the results gathered so far.
pub async fn finalize_job(client: &SplunkClient, sid: &str) -> Result<()> {
    control_job(client, sid, JobControlAction::Finalize).await
}

pub async fn set_job_ttl(client: &SplunkClient, sid: &str, ttl: u64) -> Result<()> {
    control_job(client, sid, JobControlAction::SetTtl(ttl)).await
}

pub async fn touch_job(client: &SplunkClient, sid: &str) -> Result<()> {
    control_job(client, sid, JobControlAction::Touch).await
}

/// Delete a job and its artifacts.
pub async fn delete_job(client: &SplunkClient, sid: &str) -> Result<()> {
    const OPERATION: &str = "delete search job";

    let sid = validate_sid(sid)?;
    client.delete(&job_path(sid, ""), &[], OPERATION).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_sid_from_document() {
        let body = ResponseBody::from_value("create", json!({"sid": "1703779200.12345"})).unwrap();
        assert_eq!(extract_sid(body, "create").unwrap(), "1703779200.12345");
    }

    #[test]
    fn test_extract_sid_from_entry_content_or_name() {
        let body = ResponseBody::from_value(
            "create",
            json!({"entry": [{"name": "ignored", "content": {"sid": "1703779200.1"}}]}),
        )
        .unwrap();
        assert_eq!(extract_sid(body, "create").unwrap(), "1703779200.1");

        let body = ResponseBody::from_value(
            "create",
            json!({"entry": [{"name": "1703779200.2", "content": {}}]}),
        )
        .unwrap();
        assert_eq!(extract_sid(body, "create").unwrap(), "1703779200.2");
    }

    #[test]
    fn test_extract_sid_missing() {
        let body = ResponseBody::from_value("create", json!({"messages": []})).unwrap();
        let err = extract_sid(body, "create").unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse { .. }));

        let err = extract_sid(ResponseBody::Empty, "create").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_results_query_params() {
        let query = ResultsQuery {
            offset: 100,
            count: Some(50),
            fields: vec!["host".to_string(), "status".to_string()],
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("offset", "100".to_string()),
                ("count", "50".to_string()),
                ("field_list", "host,status".to_string()),
            ]
        );
        assert_eq!(ResultsQuery::default().to_params(), vec![("offset", "0".to_string())]);
    }

    #[test]
    fn test_job_path_encodes_sid() {
        assert_eq!(job_path("1.2", "/control"), "/search/v2/jobs/1.2/control");
    }
}
