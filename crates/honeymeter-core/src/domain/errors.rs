//! Domain error types

use thiserror::Error;

/// Errors that can occur when submitting an event to a telemetry client
///
/// Every variant is recoverable from the reporter's point of view: the
/// failing tick is logged and dropped, and the next tick proceeds normally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendError {
    /// The client has already been closed
    #[error("telemetry client is closed")]
    Closed,

    /// The request never reached the ingestion service
    #[error("network error: {0}")]
    Network(String),

    /// The ingestion service answered with a non-success status
    #[error("event rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status code returned by the service
        status: u16,
        /// Response body, as returned
        body: String,
    },

    /// The event could not be encoded
    #[error("failed to serialize event: {0}")]
    Serialization(String),
}
