//! Integration tests for `splunk-as kvstore`.

mod common;

use common::splunk_cmd_with_url;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DATA_PATH: &str = "/servicesNS/nobody/search/storage/collections/data/assets";

#[tokio::test]
async fn test_query_passes_filter_and_paging() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .and(query_param("query", r#"{"env":"prod"}"#))
        .and(query_param("limit", "10"))
        .and(query_param("sort", "hostname:1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_key": "a1", "hostname": "web-01", "env": "prod"},
            {"_key": "a2", "hostname": "web-02", "env": "prod"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args([
            "-o",
            "json",
            "kvstore",
            "query",
            "assets",
            "--query",
            r#"{"env":"prod"}"#,
            "--limit",
            "10",
            "--sort",
            "hostname:1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"hostname\": \"web-02\""));
}

#[tokio::test]
async fn test_insert_object_reports_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(DATA_PATH))
        .and(body_json(json!({"hostname": "web-03", "env": "dev"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_key": "5f1b2c"})))
        .expect(1)
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args([
            "kvstore",
            "insert",
            "assets",
            r#"{"hostname":"web-03","env":"dev"}"#,
        ])
        .assert()
        .success()
        .stdout("Record inserted: 5f1b2c\n");
}

#[tokio::test]
async fn test_insert_array_uses_batch_save() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{DATA_PATH}/batch_save")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["k1", "k2"])))
        .expect(1)
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args([
            "kvstore",
            "insert",
            "assets",
            r#"[{"hostname":"a"},{"hostname":"b"}]"#,
        ])
        .assert()
        .success()
        .stdout("Saved 2 records to assets\n");
}

#[test]
fn test_insert_rejects_invalid_json_without_request() {
    splunk_cmd_with_url("http://127.0.0.1:1")
        .args(["kvstore", "insert", "assets", "{not json"])
        .assert()
        .code(5);
}
