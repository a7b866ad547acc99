//! Integration tests for event submission

use std::time::Duration;

use honeymeter_core::{
    domain::{FieldValue, SendError},
    ports::ITelemetryClient,
};
use honeymeter_honeycomb::{ClientConfig, HoneycombClient};
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{self, DATASET, WRITE_KEY};

#[tokio::test]
async fn test_send_posts_fields_with_auth_headers() {
    let (server, client) = common::setup_client().await;

    Mock::given(method("POST"))
        .and(path(format!("/1/events/{DATASET}")))
        .and(header("X-Honeycomb-Team", WRITE_KEY))
        .and(header("Content-Type", "application/json"))
        .and(header_exists("X-Honeycomb-Event-Time"))
        .and(body_json(serde_json::json!({
            "source": "web-1",
            "service_name": "api",
            "requests.count": 10.0,
            "queue_depth": 5.0
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut event = client.new_event();
    event.add_field("source", "web-1");
    event.add_field("service_name", "api");
    event.add_field("requests.count", 10.0);
    event.add_field("queue_depth", 5.0);

    client.send(event).await.expect("send succeeds");
}

#[tokio::test]
async fn test_client_level_fields_are_sent() {
    let (server, client) = common::setup_client().await;

    Mock::given(method("POST"))
        .and(path(format!("/1/events/{DATASET}")))
        .and(body_json(serde_json::json!({ "region": "eu-west-1" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    client.add_field("region", FieldValue::from("eu-west-1"));
    client.send(client.new_event()).await.unwrap();
    client.send(client.new_event()).await.unwrap();
}

#[tokio::test]
async fn test_rejected_event_reports_status_and_body() {
    let (server, client) = common::setup_client().await;
    common::mount_events(&server, 401, r#"{"error":"unknown API key"}"#).await;

    let err = client.send(client.new_event()).await.unwrap_err();
    assert_eq!(
        err,
        SendError::Rejected {
            status: 401,
            body: r#"{"error":"unknown API key"}"#.to_string(),
        }
    );
}

#[tokio::test]
async fn test_server_error_is_rejected_not_retried() {
    let (server, client) = common::setup_client().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.send(client.new_event()).await.unwrap_err();
    assert!(matches!(err, SendError::Rejected { status: 503, .. }));
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    // Nothing listens on port 1
    let client = HoneycombClient::new(
        ClientConfig::new(WRITE_KEY, DATASET)
            .with_api_host("http://127.0.0.1:1")
            .with_timeout(Duration::from_secs(2)),
    )
    .unwrap();

    let err = client.send(client.new_event()).await.unwrap_err();
    assert!(matches!(err, SendError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn test_send_after_close_does_not_hit_server() {
    let (server, client) = common::setup_client().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    client.close().await;
    let err = client.send(client.new_event()).await.unwrap_err();
    assert_eq!(err, SendError::Closed);
}
