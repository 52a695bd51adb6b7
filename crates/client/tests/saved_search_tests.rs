//! Saved search and alert endpoint tests.

mod common;

use common::*;
use splunk_as_client::endpoints::{alerts, saved_searches};
use splunk_as_client::models::{AlertSeverity, CreateAlertParams, FiredAlertFilter, SavedSearchParams};
use wiremock::matchers::{body_string_contains, method, path, query_param};

#[tokio::test]
async fn test_list_saved_searches_in_app() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/servicesNS/nobody/search/saved/searches"))
        .and(query_param("count", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("saved_searches/list.json")))
        .mount(&mock_server)
        .await;

    let (client, _clock) = test_client(&mock_server);
    let saved = saved_searches::list_saved_searches(&client, Some("search"), None, 30)
        .await
        .unwrap();

    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0].name, "High Error Rate");
    assert!(saved[0].is_scheduled);
    assert_eq!(saved[0].dispatch_earliest_time.as_deref(), Some("-5m"));
}

#[tokio::test]
async fn test_create_saved_search_sends_name_and_search() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/saved/searches"))
        .and(body_string_contains("name=Nightly+Errors"))
        .and(body_string_contains("search=index%3Dmain+error"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _clock) = test_client(&mock_server);
    let params = SavedSearchParams {
        search: Some("index=main error".to_string()),
        ..SavedSearchParams::default()
    };
    saved_searches::create_saved_search(&client, None, "Nightly Errors", &params)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_saved_search_requires_query() {
    let mock_server = MockServer::start().await;
    let (client, _clock) = test_client(&mock_server);

    let err = saved_searches::create_saved_search(
        &client,
        None,
        "Nightly Errors",
        &SavedSearchParams::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ClientError::Validation { status: None, .. }));
}

#[tokio::test]
async fn test_disable_saved_search() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/servicesNS/nobody/search/saved/searches/High%20Error%20Rate"))
        .and(body_string_contains("disabled=1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _clock) = test_client(&mock_server);
    saved_searches::set_saved_search_disabled(&client, Some("search"), "High Error Rate", true)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_saved_search_sends_only_set_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/servicesNS/nobody/search/saved/searches/High%20Error%20Rate"))
        .and(body_string_contains("cron_schedule=0+6+*+*+*"))
        .and(body_string_contains("is_scheduled=1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _clock) = test_client(&mock_server);
    let params = SavedSearchParams {
        cron_schedule: Some("0 6 * * *".to_string()),
        ..Default::default()
    };
    saved_searches::update_saved_search(&client, Some("search"), "High Error Rate", &params)
        .await
        .unwrap();

    let err = saved_searches::update_saved_search(
        &client,
        Some("search"),
        "High Error Rate",
        &SavedSearchParams::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ClientError::Validation { status: None, .. }));
}

#[tokio::test]
async fn test_dispatch_saved_search_returns_sid() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(
            "/servicesNS/nobody/search/saved/searches/High%20Error%20Rate/dispatch",
        ))
        .and(body_string_contains("trigger_actions=1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(load_fixture("jobs/create_job.json")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _clock) = test_client(&mock_server);
    let sid =
        saved_searches::dispatch_saved_search(&client, Some("search"), "High Error Rate", true)
            .await
            .unwrap();
    assert_eq!(sid, "1703779200.12345");
}

#[tokio::test]
async fn test_list_alerts_keeps_triggered_searches_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/saved/searches"))
        .and(query_param("search", "is_scheduled=1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("saved_searches/list.json")))
        .mount(&mock_server)
        .await;

    let (client, _clock) = test_client(&mock_server);
    let alerts = alerts::list_alerts(&client, None, 100).await.unwrap();

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].name, "High Error Rate");
}

#[tokio::test]
async fn test_fired_alerts_filtered_by_severity() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/alerts/fired_alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("alerts/fired_alerts.json")))
        .mount(&mock_server)
        .await;

    let (client, _clock) = test_client(&mock_server);

    let all = alerts::list_fired_alerts(&client, None, 50, &FiredAlertFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].triggered_alert_count, 3);

    let filter = FiredAlertFilter {
        severity: Some(AlertSeverity::Error),
        ..FiredAlertFilter::default()
    };
    let errors = alerts::list_fired_alerts(&client, None, 50, &filter)
        .await
        .unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].savedsearch_name.as_deref(), Some("High Error Rate"));
}

#[tokio::test]
async fn test_create_alert_posts_schedule_and_severity() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/servicesNS/nobody/search/saved/searches"))
        .and(body_string_contains("is_scheduled=1"))
        .and(body_string_contains("alert.severity=5"))
        .and(body_string_contains("cron_schedule=*%2F5+*+*+*+*"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _clock) = test_client(&mock_server);
    let params = CreateAlertParams {
        name: "Failed Logins".to_string(),
        search: "index=security action=failure | stats count".to_string(),
        description: None,
        earliest_time: "-15m".to_string(),
        latest_time: "now".to_string(),
        cron_schedule: None,
        alert_type: "number of events".to_string(),
        alert_comparator: Some("greater than".to_string()),
        alert_threshold: Some("10".to_string()),
        severity: AlertSeverity::Severe,
        actions: None,
        email_to: None,
        digest_mode: false,
        throttle: None,
    };
    alerts::create_alert(&client, "search", &params).await.unwrap();
}
