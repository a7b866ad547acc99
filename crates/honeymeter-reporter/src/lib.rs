//! Honeymeter Reporter - Periodic metrics export
//!
//! Flattens an in-process metrics registry into a single event per interval
//! and submits it to Honeycomb.
//!
//! ## Modules
//!
//! - [`translator`] - Registry to event field translation
//! - [`reporter`] - The reporting loop and its lifecycle

pub mod reporter;
pub mod translator;

pub use reporter::Reporter;
pub use translator::{percentile_label, Translator};

use std::sync::Arc;

use honeymeter_core::{
    config::{Config, ValidationError},
    ports::IMetricsRegistry,
};
use honeymeter_honeycomb::HoneycombError;
use thiserror::Error;

/// Errors surfaced by a [`Reporter`]
///
/// Failures while sending an individual event are never returned; they are
/// logged and the loop carries on.
#[derive(Debug, Error)]
pub enum ReporterError {
    /// The Honeycomb client could not be created
    #[error("failed to initialize telemetry client: {0}")]
    ClientInit(#[from] HoneycombError),

    /// The reporter settings failed validation
    #[error("invalid reporter configuration: {}", join_errors(.0))]
    InvalidConfig(Vec<ValidationError>),

    /// `start` was called while the loop is already running
    #[error("reporter is already running")]
    AlreadyRunning,

    /// `start` was called on a reporter that has been stopped
    #[error("reporter has been stopped")]
    Stopped,
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Connects to Honeycomb and runs the reporting loop on the current task.
///
/// Only returns on error, since nothing else holds the reporter to stop
/// it. Use [`Reporter::connect`] and [`Reporter::spawn`] for a stoppable
/// reporter.
///
/// # Errors
/// Returns [`ReporterError::InvalidConfig`] if the reporter settings are
/// invalid, or [`ReporterError::ClientInit`] if the client cannot be created.
pub async fn report(
    registry: Arc<dyn IMetricsRegistry>,
    config: &Config,
) -> Result<(), ReporterError> {
    Reporter::connect(registry, config)?.start().await
}
