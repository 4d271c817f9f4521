#![allow(clippy::unwrap_used)]
// Integration tests for `ConsoleClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use switchboard_api::{ConsoleClient, Endpoint, Error, HttpSettings};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ConsoleClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/nexus/switches/", server.uri())).unwrap();
    let client = ConsoleClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn form(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_add_switch_posts_form_and_returns_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/nexus/switches/add/"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("key=beta"))
        .and(body_string_contains("desc=beta+rollout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "key": "beta",
                "label": "Beta",
                "description": "beta rollout",
                "status": 1,
                "conditions": []
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let env = client
        .post(
            Endpoint::AddSwitch,
            &form(&[("name", "Beta"), ("key", "beta"), ("desc", "beta rollout")]),
        )
        .await
        .unwrap();

    assert!(env.success);
    assert_eq!(env.data["key"], "beta");
}

#[tokio::test]
async fn test_application_failure_is_not_an_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/nexus/switches/delete/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "data": "Switch cannot be found"
        })))
        .mount(&server)
        .await;

    let env = client
        .post(Endpoint::DeleteSwitch, &form(&[("key", "missing")]))
        .await
        .unwrap();

    assert!(!env.success);
    assert_eq!(env.into_result().unwrap_err(), "Switch cannot be found");
}

#[tokio::test]
async fn test_csrf_token_is_sent() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ConsoleClient::with_client(reqwest::Client::new(), base_url)
        .with_csrf_token("tok-123".to_owned().into());

    Mock::given(method("POST"))
        .and(path("/status/"))
        .and(header("X-CSRFToken", "tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"key": "beta", "status": 3, "conditions": []}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let env = client
        .post(Endpoint::UpdateStatus, &form(&[("key", "beta"), ("status", "3")]))
        .await
        .unwrap();
    assert!(env.success);
}

// ── Failure modes ───────────────────────────────────────────────────

#[tokio::test]
async fn test_http_error_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/nexus/switches/update/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let result = client
        .post(Endpoint::UpdateSwitch, &form(&[("curkey", "beta")]))
        .await;

    assert!(
        matches!(result, Err(Error::Http { status: 500, .. })),
        "expected Http error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_non_json_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/nexus/switches/conditions/add/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let result = client.post(Endpoint::AddCondition, &[]).await;

    match result {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "<html>login</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Nothing listens on port 1.
    let base_url = Url::parse("http://127.0.0.1:1/").unwrap();
    let client = ConsoleClient::with_client(reqwest::Client::new(), base_url);
    let result = client.post(Endpoint::DeleteSwitch, &[]).await;

    assert!(
        matches!(result, Err(Error::Transport(_))),
        "expected Transport error, got: {result:?}"
    );
}

// ── Index ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_index_passes_sort_order() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/nexus/switches/"))
        .and(query_param("by", "-date_modified"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"switches": [], "all_conditions": []}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let env = client.index("-date_modified").await.unwrap();
    assert!(env.success);
    assert_eq!(env.data["switches"], json!([]));
}

// ── Timeouts ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_slow_console_reports_configured_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/nexus/switches/delete/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "data": {}}))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let settings = HttpSettings {
        timeout: std::time::Duration::from_secs(1),
        ..HttpSettings::default()
    };
    let base_url = Url::parse(&format!("{}/nexus/switches/", server.uri())).unwrap();
    let client = ConsoleClient::new(base_url, &settings).unwrap();

    let err = client
        .post(Endpoint::DeleteSwitch, &form(&[("key", "beta")]))
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::Timeout { timeout_secs: 1 }),
        "expected timeout, got {err:?}"
    );
    assert_eq!(err.to_string(), "Request timed out after 1s");
}
