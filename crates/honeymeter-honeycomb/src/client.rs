//! Honeycomb events API client
//!
//! Posts one event per request to `POST {api_host}/1/events/{dataset}`,
//! authenticating with the team write key.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use honeymeter_core::ports::ITelemetryClient;
//! use honeymeter_honeycomb::{ClientConfig, HoneycombClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = HoneycombClient::new(ClientConfig::new("hcaik_123", "metrics"))?;
//! let mut event = client.new_event();
//! event.add_field("requests.count", 10.0);
//! client.send(event).await?;
//! client.close().await;
//! # Ok(())
//! # }
//! ```

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        PoisonError, RwLock,
    },
    time::Duration,
};

use honeymeter_core::{
    config::{HoneycombConfig, DEFAULT_API_HOST, DEFAULT_TIMEOUT_SECS},
    domain::{FieldValue, OutboundEvent, SendError},
    ports::ITelemetryClient,
};
use reqwest::{header::CONTENT_TYPE, Client};
use tracing::{debug, info};
use url::Url;

use crate::HoneycombError;

/// Header carrying the team write key
const TEAM_HEADER: &str = "X-Honeycomb-Team";

/// Header carrying the event's own timestamp
const EVENT_TIME_HEADER: &str = "X-Honeycomb-Event-Time";

// ============================================================================
// ClientConfig
// ============================================================================

/// Connection settings for a [`HoneycombClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Team write key
    pub write_key: String,
    /// Destination dataset
    pub dataset: String,
    /// Base URL of the events API
    pub api_host: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a config for the public Honeycomb API with the default timeout.
    pub fn new(write_key: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            write_key: write_key.into(),
            dataset: dataset.into(),
            api_host: DEFAULT_API_HOST.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Overrides the API host (useful for testing or proxies).
    pub fn with_api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = api_host.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl From<&HoneycombConfig> for ClientConfig {
    fn from(config: &HoneycombConfig) -> Self {
        Self {
            write_key: config.write_key.clone(),
            dataset: config.dataset.clone(),
            api_host: config.api_host.clone(),
            timeout: config.timeout_duration(),
        }
    }
}

/// Builds `{api_host}/1/events/{dataset}`, percent-encoding the dataset.
fn events_url(api_host: &str, dataset: &str) -> Result<Url, HoneycombError> {
    let invalid = |reason: String| HoneycombError::InvalidApiHost {
        host: api_host.to_string(),
        reason,
    };

    let mut url = Url::parse(api_host).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }

    url.path_segments_mut()
        .map_err(|_| invalid("cannot be a base URL".to_string()))?
        .pop_if_empty()
        .extend(["1", "events", dataset]);

    Ok(url)
}

// ============================================================================
// HoneycombClient
// ============================================================================

/// HTTP client for the Honeycomb events API
///
/// Owns its connection pool and credentials. Fields added with
/// [`ITelemetryClient::add_field`] are copied into every event created
/// afterwards.
pub struct HoneycombClient {
    /// The underlying HTTP client
    http: Client,
    /// Fully resolved events endpoint for the dataset
    events_url: Url,
    write_key: String,
    dataset: String,
    /// Fields attached to every new event
    fields: RwLock<HashMap<String, FieldValue>>,
    closed: AtomicBool,
}

impl HoneycombClient {
    /// Creates a client after validating credentials and the API host.
    ///
    /// # Errors
    /// Returns a [`HoneycombError`] if the write key or dataset is empty,
    /// the API host is not an http(s) base URL, or the HTTP client cannot
    /// be built.
    pub fn new(config: ClientConfig) -> Result<Self, HoneycombError> {
        if config.write_key.trim().is_empty() {
            return Err(HoneycombError::MissingWriteKey);
        }
        if config.dataset.trim().is_empty() {
            return Err(HoneycombError::MissingDataset);
        }

        let events_url = events_url(&config.api_host, &config.dataset)?;

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("honeymeter/", env!("CARGO_PKG_VERSION")))
            .build()?;

        info!(dataset = %config.dataset, url = %events_url, "Honeycomb client initialized");

        Ok(Self {
            http,
            events_url,
            write_key: config.write_key,
            dataset: config.dataset,
            fields: RwLock::new(HashMap::new()),
            closed: AtomicBool::new(false),
        })
    }

    /// The endpoint events are posted to.
    pub fn events_url(&self) -> &Url {
        &self.events_url
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Whether [`ITelemetryClient::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for HoneycombClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoneycombClient")
            .field("events_url", &self.events_url.as_str())
            .field("write_key", &"<redacted>")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl ITelemetryClient for HoneycombClient {
    fn add_field(&self, key: &str, value: FieldValue) {
        self.fields
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }

    fn new_event(&self) -> OutboundEvent {
        let fields = self
            .fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        OutboundEvent::with_fields(fields)
    }

    async fn send(&self, event: OutboundEvent) -> Result<(), SendError> {
        if self.is_closed() {
            return Err(SendError::Closed);
        }

        let timestamp = event.timestamp().to_rfc3339();
        let body = serde_json::to_vec(event.fields())
            .map_err(|e| SendError::Serialization(e.to_string()))?;

        debug!(dataset = %self.dataset, fields = event.len(), "Sending event to Honeycomb");

        let response = self
            .http
            .post(self.events_url.clone())
            .header(TEAM_HEADER, &self.write_key)
            .header(EVENT_TIME_HEADER, timestamp)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| SendError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    async fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!(dataset = %self.dataset, "Honeycomb client closed");
        }
    }
}
