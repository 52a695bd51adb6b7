//! Integration tests for `splunk-as job`.

mod common;

use common::{job_entry, splunk_cmd_with_url};
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SID: &str = "1703779200.12345";

#[tokio::test]
async fn test_create_prints_sid_and_sends_ttl() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/servicesNS/nobody/my_app/search/v2/jobs"))
        .and(body_string_contains("timeout=600"))
        .and(body_string_contains("max_count=50000"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "sid": SID })))
        .expect(1)
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args(["job", "create", "index=main", "--app", "my_app", "--ttl", "600"])
        .assert()
        .success()
        .stdout(format!("Job created: {SID}\n"));
}

#[tokio::test]
async fn test_status_json_reports_state() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/services/search/v2/jobs/{SID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_entry(SID, "RUNNING", 42)))
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args(["-o", "json", "job", "status", SID])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"state\": \"RUNNING\""))
        .stdout(predicate::str::contains("\"result_count\": 42"));
}

#[tokio::test]
async fn test_list_uses_count() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/search/v2/jobs"))
        .and(query_param("count", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entry": [
                {"name": SID, "content": {"dispatchState": "DONE", "resultCount": "3", "isDone": "1"}},
                {"name": "scheduler__admin__search__RMD5", "content": {"dispatchState": "RUNNING"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args(["job", "list", "--count", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains(SID))
        .stdout(predicate::str::contains("scheduler__admin__search__RMD5\tRUNNING"));
}

#[tokio::test]
async fn test_poll_returns_final_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/services/search/v2/jobs/{SID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_entry(SID, "DONE", 7)))
        .expect(1)
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args(["--quiet", "-o", "json", "job", "poll", SID, "--interval", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"state\": \"DONE\""))
        .stdout(predicate::str::contains("\"progress_percent\": 1.0"));
}

#[tokio::test]
async fn test_poll_times_out_with_exit_code_9() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/services/search/v2/jobs/{SID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_entry(SID, "RUNNING", 0)))
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args(["--quiet", "job", "poll", SID, "--timeout", "1", "--interval", "1"])
        .assert()
        .code(9)
        .stderr(predicate::str::contains("timed out"));
}

#[tokio::test]
async fn test_control_actions_post_action() {
    let server = MockServer::start().await;

    for action in ["cancel", "pause", "unpause", "finalize", "touch"] {
        Mock::given(method("POST"))
            .and(path(format!("/services/search/v2/jobs/{SID}/control")))
            .and(body_string_contains(format!("action={action}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"messages": []})))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path(format!("/services/search/v2/jobs/{SID}/control")))
        .and(body_string_contains("action=setttl"))
        .and(body_string_contains("ttl=3600"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"messages": []})))
        .expect(1)
        .mount(&server)
        .await;

    for action in ["cancel", "pause", "unpause", "finalize", "touch"] {
        splunk_cmd_with_url(&server.uri())
            .args(["job", action, SID])
            .assert()
            .success();
    }
    splunk_cmd_with_url(&server.uri())
        .args(["job", "ttl", SID, "3600"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Job TTL set to 3600s"));
}

#[tokio::test]
async fn test_delete_job() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/services/search/v2/jobs/{SID}")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args(["job", "delete", SID])
        .assert()
        .success()
        .stdout(format!("Job deleted: {SID}\n"));
}
