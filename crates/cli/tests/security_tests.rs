//! Integration tests for `splunk-as security`.

mod common;

use common::{splunk_cmd, splunk_cmd_with_url};
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_create_token_prints_secret() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/authorization/tokens"))
        .and(body_string_contains("name=svc_reporting"))
        .and(body_string_contains("expires_on=%2B3600s"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "entry": [{
                "name": "tokens",
                "content": {"id": "f1e2d3", "token": "eyJ.payload.sig"}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args([
            "security",
            "create-token",
            "--name",
            "svc_reporting",
            "--expires",
            "3600",
        ])
        .assert()
        .success()
        .stdout("Token created for svc_reporting (id f1e2d3)\nToken: eyJ.payload.sig\n");
}

#[test]
fn test_delete_token_requires_force() {
    splunk_cmd_with_url("http://127.0.0.1:1")
        .args(["security", "delete-token", "f1e2d3"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("without --force"));
}

#[tokio::test]
async fn test_delete_token_with_force() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/services/authorization/tokens/f1e2d3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args(["security", "delete-token", "f1e2d3", "--force"])
        .assert()
        .success()
        .stdout("Token deleted: f1e2d3\n");
}

#[tokio::test]
async fn test_acl_of_relative_object() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/saved/searches/Daily%20Report/acl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entry": [{
                "name": "Daily Report",
                "acl": {"app": "search", "owner": "admin", "sharing": "global", "perms": {"read": ["*"], "write": ["admin"]}}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args(["-o", "json", "security", "acl", "saved/searches/Daily Report"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sharing\": \"global\""));
}

#[tokio::test]
async fn test_check_capability_reports_missing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/authentication/current-context"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entry": [{"name": "tester", "content": {"username": "analyst", "capabilities": ["search"]}}]
        })))
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args(["security", "check", "edit_tokens_all"])
        .assert()
        .success()
        .stdout("analyst does not have capability 'edit_tokens_all'\n");
}

#[test]
fn test_acl_rejects_traversal_without_a_server() {
    splunk_cmd()
        .env("SPLUNK_URL", "http://127.0.0.1:1")
        .args(["security", "acl", "saved/../../etc/passwd"])
        .assert()
        .code(5);
}
