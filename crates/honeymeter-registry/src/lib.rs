//! Honeymeter Registry - In-process metrics
//!
//! Provides the five metric kinds a reporter can flatten, plus a named
//! registry holding them:
//! - [`Counter`], [`Gauge`], [`GaugeF64`] - lock-free atomics
//! - [`Histogram`] - integer distribution over a [`UniformSample`] reservoir
//! - [`Meter`] - event count with 1/5/15-minute [`Ewma`] rates
//! - [`Timer`] - duration histogram combined with a meter
//! - [`StandardRegistry`] - name to metric map implementing
//!   [`IMetricsRegistry`](honeymeter_core::ports::IMetricsRegistry)
//!
//! Every metric is safe to update from any thread while a reporter reads it.

pub mod counter;
pub mod ewma;
pub mod gauge;
pub mod histogram;
pub mod meter;
pub mod registry;
pub mod sample;
pub mod timer;

pub use counter::Counter;
pub use ewma::Ewma;
pub use gauge::{Gauge, GaugeF64};
pub use histogram::Histogram;
pub use meter::Meter;
pub use registry::{Metric, StandardRegistry};
pub use sample::UniformSample;
pub use timer::Timer;

use honeymeter_core::domain::MetricKind;
use thiserror::Error;

/// Errors that can occur when registering metrics
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A metric is already registered under this name
    #[error("duplicate metric: {0}")]
    DuplicateMetric(String),

    /// The name is registered with a different kind than requested
    #[error("metric {name} is a {actual}, not a {expected}")]
    KindMismatch {
        name: String,
        expected: MetricKind,
        actual: MetricKind,
    },
}
