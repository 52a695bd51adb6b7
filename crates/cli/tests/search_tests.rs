//! Integration tests for `splunk-as search`.

mod common;

use common::{job_entry, splunk_cmd, splunk_cmd_with_url};
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SID: &str = "1703779200.12345";

fn host_counts() -> serde_json::Value {
    json!({
        "fields": [{"name": "host"}, {"name": "count"}],
        "results": [
            {"host": "web-01", "count": "1520"},
            {"host": "web-02", "count": "980"}
        ]
    })
}

#[tokio::test]
async fn test_oneshot_prints_text_table() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/search/jobs/oneshot"))
        .and(body_string_contains("search=search+index%3Dweb"))
        .and(body_string_contains("earliest_time=-15m"))
        .and(body_string_contains("latest_time=now"))
        .respond_with(ResponseTemplate::new(200).set_body_json(host_counts()))
        .expect(1)
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args([
            "search",
            "oneshot",
            "index=web | stats count by host",
            "--earliest",
            "-15m",
        ])
        .assert()
        .success()
        .stdout("host\tcount\nweb-01\t1520\nweb-02\t980\n");
}

#[tokio::test]
async fn test_oneshot_csv_output() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/search/jobs/oneshot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(host_counts()))
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args(["-o", "csv", "search", "oneshot", "index=web | stats count by host"])
        .assert()
        .success()
        .stdout("host,count\nweb-01,1520\nweb-02,980\n");
}

#[tokio::test]
async fn test_normal_without_wait_prints_sid() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/search/v2/jobs"))
        .and(body_string_contains("exec_mode=normal"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "sid": SID })))
        .expect(1)
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args(["-o", "json", "search", "normal", "index=main"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("\"sid\": \"{SID}\"")));
}

#[tokio::test]
async fn test_normal_with_wait_polls_then_prints_results() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/search/v2/jobs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "sid": SID })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/services/search/v2/jobs/{SID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_entry(SID, "DONE", 2)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/services/search/v2/jobs/{SID}/results")))
        .and(query_param("count", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(host_counts()))
        .expect(1)
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args([
            "--quiet",
            "search",
            "normal",
            "index=web | stats count by host",
            "--wait",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("web-02\t980"));
}

#[tokio::test]
async fn test_blocking_fetches_results_after_create() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/search/v2/jobs"))
        .and(body_string_contains("exec_mode=blocking"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "sid": SID })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/services/search/v2/jobs/{SID}/results")))
        .respond_with(ResponseTemplate::new(200).set_body_json(host_counts()))
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args(["search", "blocking", "index=web | stats count by host"])
        .assert()
        .success()
        .stdout(predicate::str::contains("web-01\t1520"));
}

#[tokio::test]
async fn test_results_passes_paging_and_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/services/search/v2/jobs/{SID}/results")))
        .and(query_param("offset", "10"))
        .and(query_param("count", "5"))
        .and(query_param("field_list", "host,count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(host_counts()))
        .expect(1)
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args([
            "search", "results", SID, "--offset", "10", "--count", "5", "--fields", "host,count",
        ])
        .assert()
        .success();
}

#[test]
fn test_validate_reports_complexity_offline() {
    splunk_cmd()
        .args([
            "search",
            "validate",
            "index=web | join host [search index=cmdb] | stats count by host",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Valid SPL (complex complexity)"))
        .stdout(predicate::str::contains("Commands: search | join | stats"));
}

#[test]
fn test_validate_json_output() {
    splunk_cmd()
        .args(["-o", "json", "search", "validate", "index=main | head 10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"valid\": true"))
        .stdout(predicate::str::contains("\"complexity\": \"simple\""));
}
