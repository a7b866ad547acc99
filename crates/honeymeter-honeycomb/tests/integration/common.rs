//! Shared test helpers for Honeycomb API integration tests

use honeymeter_honeycomb::{ClientConfig, HoneycombClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Write key used by every test client
pub const WRITE_KEY: &str = "test-write-key";

/// Dataset used by every test client
pub const DATASET: &str = "example-dataset";

/// Starts a mock server and returns it together with a client pointed at it.
pub async fn setup_client() -> (MockServer, HoneycombClient) {
    let server = MockServer::start().await;
    let client = HoneycombClient::new(
        ClientConfig::new(WRITE_KEY, DATASET).with_api_host(server.uri()),
    )
    .expect("create client");
    (server, client)
}

/// Mounts the events endpoint answering every request with `status`.
pub async fn mount_events(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/1/events/{DATASET}")))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}
