//! Integration tests for `splunk-as tag`.

mod common;

use common::splunk_cmd_with_url;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WEB01: &str = "/servicesNS/nobody/search/saved/fvtags/host%3A%3Aweb01";

fn fvtags(tags: &[&str]) -> serde_json::Value {
    json!({
        "entry": [{
            "name": "host::web01",
            "content": {"tags": tags},
            "acl": {"app": "search", "owner": "admin"}
        }]
    })
}

#[tokio::test]
async fn test_tag_add_posts_union_in_default_app() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEB01))
        .respond_with(ResponseTemplate::new(200).set_body_json(fvtags(&["production"])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(WEB01))
        .and(body_string_contains("value=production%2Cpci"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fvtags(&["production", "pci"])))
        .expect(1)
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args(["tag", "add", "pci", "host", "web01"])
        .assert()
        .success()
        .stdout("Tagged host=web01 with 'pci'\n");
}

#[tokio::test]
async fn test_tag_remove_missing_tag_exits_5() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEB01))
        .respond_with(ResponseTemplate::new(200).set_body_json(fvtags(&["production"])))
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args(["tag", "remove", "pci", "host", "web01"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("host=web01 is not tagged pci"));
}

#[tokio::test]
async fn test_tag_list_filters_by_value() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/saved/fvtags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entry": [
                {"name": "host::web01", "content": {"tags": ["production"]}},
                {"name": "host::db01", "content": {"tags": ["database"]}}
            ]
        })))
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args(["-o", "json", "tag", "list", "--field", "host", "--value", "db01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"tag\": \"database\""))
        .stdout(predicate::str::contains("production").not());
}

#[tokio::test]
async fn test_tag_search_runs_oneshot() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/search/jobs/oneshot"))
        .and(body_string_contains("search=search+tag%3Dproduction"))
        .and(body_string_contains("count=5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"_raw": "GET /cart 200", "host": "web01", "_cd": "0:1"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    splunk_cmd_with_url(&server.uri())
        .args(["-o", "csv", "tag", "search", "production", "-c", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GET /cart 200"))
        .stdout(predicate::str::contains("_cd").not());
}
