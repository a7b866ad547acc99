//! Shared test helpers for reporter integration tests

use std::time::Duration;

use honeymeter_core::config::ConfigBuilder;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const WRITE_KEY: &str = "test-write-key";
pub const DATASET: &str = "reporter-dataset";

/// Starts a mock events API accepting every event for [`DATASET`].
pub async fn setup_events_mock() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/1/events/{DATASET}")))
        .and(header("X-Honeycomb-Team", WRITE_KEY))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    server
}

/// Builds a valid configuration pointing at `server` with a one second
/// interval.
pub fn config_for(server: &MockServer) -> ConfigBuilder {
    ConfigBuilder::new()
        .write_key(WRITE_KEY)
        .dataset(DATASET)
        .api_host(server.uri())
        .interval(1)
        .service("checkout")
        .source("web-1")
}

/// Waits until the server has received at least `n` requests, returning
/// their JSON bodies.
pub async fn wait_for_events(server: &MockServer, n: usize) -> Vec<serde_json::Value> {
    for _ in 0..100 {
        let requests = server.received_requests().await.unwrap_or_default();
        if requests.len() >= n {
            return requests
                .iter()
                .map(|r| serde_json::from_slice(&r.body).expect("event body is JSON"))
                .collect();
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("server did not receive {n} events in time");
}
