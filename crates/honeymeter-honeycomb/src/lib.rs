//! Honeymeter Honeycomb - Events API client
//!
//! Provides [`HoneycombClient`], an implementation of
//! [`ITelemetryClient`](honeymeter_core::ports::ITelemetryClient) that posts
//! each event as a single JSON object to the Honeycomb events API.
//!
//! The client deliberately does no batching, sampling or retrying: a failed
//! submission is reported to the caller once and then forgotten.
//!
//! ## Modules
//!
//! - [`client`] - Client configuration and the HTTP client itself

pub mod client;

pub use client::{ClientConfig, HoneycombClient};

use thiserror::Error;

/// Errors that can occur when initializing a Honeycomb client
///
/// All of them are configuration problems: a client that fails to
/// initialize will never be able to deliver an event.
#[derive(Debug, Error)]
pub enum HoneycombError {
    /// No write key was configured
    #[error("missing write key")]
    MissingWriteKey,

    /// No dataset was configured
    #[error("missing dataset")]
    MissingDataset,

    /// The API host is not a usable base URL
    #[error("invalid API host {host}: {reason}")]
    InvalidApiHost { host: String, reason: String },

    /// The underlying HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
