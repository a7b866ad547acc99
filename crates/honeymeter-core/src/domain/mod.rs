//! Domain types
//!
//! This module contains the core data types shared across Honeymeter:
//! - Metric kinds and point-in-time sample snapshots
//! - Field values and the outbound event handed to a telemetry client
//! - Domain-specific error types

pub mod errors;
pub mod event;
pub mod metric;
pub mod sample;

// Re-export commonly used types
pub use errors::SendError;
pub use event::{FieldValue, FlatFieldMap, OutboundEvent};
pub use metric::MetricKind;
pub use sample::SampleSnapshot;
