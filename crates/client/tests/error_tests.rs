//! HTTP error classification tests.
//!
//! # Invariants
//! - Each status maps to exactly one `ClientError` variant
//! - Messages carry the operation label and the flattened Splunk message envelope
//! - Quota wording in the body wins over the status code
//! - Local validation failures never reach the server

mod common;

use common::*;
use splunk_as_client::endpoints::jobs::{CreateJobOptions, create_job};
use wiremock::matchers::{method, path};

async fn error_for(status: u16, body: serde_json::Value) -> ClientError {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/server/info"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&mock_server)
        .await;

    let (client, _clock) = test_client_with(&mock_server, token_auth(), 0);
    endpoints::server::get_server_info(&client)
        .await
        .unwrap_err()
}

#[tokio::test]
async fn test_401_is_authentication() {
    let err = error_for(401, splunk_error("call not properly authenticated")).await;
    assert!(err.is_auth_error());
    assert_eq!(
        err.to_string(),
        "get server info: authentication failed (HTTP 401): ERROR: call not properly authenticated"
    );
}

#[tokio::test]
async fn test_403_is_authorization() {
    let err = error_for(403, splunk_error("You do not have permission")).await;
    assert!(matches!(err, ClientError::Authorization { status: 403, .. }));
}

#[tokio::test]
async fn test_404_is_not_found() {
    let err = error_for(404, splunk_error("Unknown sid.")).await;
    assert!(matches!(err, ClientError::NotFound { .. }));
    assert_eq!(err.operation(), Some("get server info"));
}

#[tokio::test]
async fn test_400_is_server_side_validation() {
    let err = error_for(400, splunk_error("Error in 'search' command")).await;
    assert!(matches!(
        err,
        ClientError::Validation {
            status: Some(400),
            ..
        }
    ));
}

#[tokio::test]
async fn test_quota_message_wins_over_status() {
    let body = serde_json::json!({
        "messages": [{
            "type": "FATAL",
            "text": "The maximum number of concurrent historical searches for this user has been reached."
        }]
    });
    let err = error_for(503, body).await;
    assert!(matches!(err, ClientError::SearchQuota { status: 503, .. }));
}

#[tokio::test]
async fn test_unexpected_status_is_generic_api_error() {
    let err = error_for(409, splunk_error("Conflict")).await;
    assert!(matches!(err, ClientError::Api { status: 409, .. }));
}

#[tokio::test]
async fn test_non_json_error_body_is_excerpted() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/server/info"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let (client, _clock) = test_client_with(&mock_server, token_auth(), 0);
    let err = endpoints::server::get_server_info(&client)
        .await
        .unwrap_err();
    assert!(err.to_string().ends_with("<html>Bad Gateway</html>"));
}

#[tokio::test]
async fn test_malformed_success_body_is_invalid_response() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/server/info"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let (client, _clock) = test_client(&mock_server);
    let err = endpoints::server::get_server_info(&client)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_invalid_spl_rejected_before_request() {
    let mock_server = MockServer::start().await;
    let (client, _clock) = test_client(&mock_server);

    let err = create_job(&client, "index=main | stats count(", &CreateJobOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Validation { status: None, .. }));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}
