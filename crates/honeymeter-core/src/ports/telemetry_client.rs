//! Telemetry client port (driven/secondary port)
//!
//! This module defines the interface used to submit events to a remote
//! telemetry ingestion service. Implementations own their transport
//! (HTTP connection pool, credentials, destination dataset).
//!
//! ## Design Notes
//!
//! - Uses `#[async_trait]` for the async methods.
//! - Submission is fire-and-forget from the reporter's perspective: a
//!   [`SendError`] is logged by the caller and never retried.
//! - Client-level fields set through [`ITelemetryClient::add_field`] are
//!   copied into every event created afterwards by
//!   [`ITelemetryClient::new_event`].

use crate::domain::{FieldValue, OutboundEvent, SendError};

/// Submits events to a telemetry ingestion service
#[async_trait::async_trait]
pub trait ITelemetryClient: Send + Sync {
    /// Attaches a static field to every event created after this call.
    fn add_field(&self, key: &str, value: FieldValue);

    /// Creates a new event pre-populated with the client-level fields.
    fn new_event(&self) -> OutboundEvent;

    /// Transmits a single event.
    async fn send(&self, event: OutboundEvent) -> Result<(), SendError>;

    /// Releases the client's resources. Subsequent sends fail with
    /// [`SendError::Closed`].
    async fn close(&self);
}
