//! End-to-end tests for the reporting loop

use std::sync::Arc;

use honeymeter_core::config::{ConfigBuilder, LabelMode};
use honeymeter_honeycomb::HoneycombError;
use honeymeter_registry::StandardRegistry;
use honeymeter_reporter::{report, Reporter, ReporterError};

use crate::common::{self, WRITE_KEY};

#[tokio::test]
async fn test_reporter_posts_registry_to_honeycomb() {
    let server = common::setup_events_mock().await;
    let config = common::config_for(&server).build();

    let registry = Arc::new(StandardRegistry::new());
    registry.get_or_register_counter("orders").unwrap().inc(10);
    registry.get_or_register_gauge("queue_depth").unwrap().update(5);

    let reporter = Arc::new(Reporter::connect(registry.clone(), &config).unwrap());
    let handle = reporter.spawn();

    let events = common::wait_for_events(&server, 1).await;
    reporter.stop().await;
    handle.await.unwrap().unwrap();

    let event = &events[0];
    assert_eq!(event["orders.count"], serde_json::json!(10.0));
    assert_eq!(event["queue_depth"], serde_json::json!(5.0));
    assert_eq!(event["service_name"], "checkout");
    assert_eq!(event["source"], "web-1");
}

#[tokio::test]
async fn test_namespace_mode_prefixes_fields() {
    let server = common::setup_events_mock().await;
    let config = common::config_for(&server)
        .label_mode(LabelMode::Namespace)
        .build();

    let registry = Arc::new(StandardRegistry::new());
    registry.get_or_register_gauge("queue_depth").unwrap().update(5);

    let reporter = Arc::new(Reporter::connect(registry, &config).unwrap());
    let handle = reporter.spawn();

    let events = common::wait_for_events(&server, 1).await;
    reporter.stop().await;
    handle.await.unwrap().unwrap();

    let event = events[0].as_object().unwrap();
    assert_eq!(event["checkout.queue_depth"], serde_json::json!(5.0));
    assert!(!event.contains_key("service_name"));
    assert!(!event.contains_key("queue_depth"));
}

#[tokio::test]
async fn test_reporter_keeps_running_when_events_are_rejected() {
    let server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .respond_with(wiremock::ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let config = common::config_for(&server).build();

    let reporter = Arc::new(
        Reporter::connect(Arc::new(StandardRegistry::new()), &config).unwrap(),
    );
    let handle = reporter.spawn();

    common::wait_for_events(&server, 2).await;
    assert!(reporter.is_running());

    reporter.stop().await;
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_reporter_static_fields_are_sent() {
    let server = common::setup_events_mock().await;
    let config = common::config_for(&server).build();

    let reporter = Arc::new(
        Reporter::connect(Arc::new(StandardRegistry::new()), &config).unwrap(),
    );
    reporter.add_field("region", "eu-west-1");
    let handle = reporter.spawn();

    let events = common::wait_for_events(&server, 1).await;
    reporter.stop().await;
    handle.await.unwrap().unwrap();

    assert_eq!(events[0]["region"], "eu-west-1");
}

#[tokio::test]
async fn test_connect_without_write_key_fails() {
    let config = ConfigBuilder::new().dataset("metrics").build();

    let err = Reporter::connect(Arc::new(StandardRegistry::new()), &config).unwrap_err();

    assert!(matches!(
        err,
        ReporterError::ClientInit(HoneycombError::MissingWriteKey)
    ));
}

#[tokio::test]
async fn test_report_returns_client_init_error() {
    let config = ConfigBuilder::new()
        .write_key(WRITE_KEY)
        .dataset("metrics")
        .api_host("not a url")
        .build();

    let err = report(Arc::new(StandardRegistry::new()), &config)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ReporterError::ClientInit(HoneycombError::InvalidApiHost { .. })
    ));
}
