//! Metric kinds
//!
//! The closed set of metric shapes a registry can expose. Each kind has a
//! different statistical shape and therefore flattens into a different set
//! of event fields.

use serde::{Deserialize, Serialize};

/// The kind of a registered metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Monotonic (or resettable) integer count
    Counter,
    /// Instantaneous integer value
    Gauge,
    /// Instantaneous floating point value
    GaugeF64,
    /// Distribution of integer samples
    Histogram,
    /// Event count plus exponentially weighted rates
    Meter,
    /// Duration distribution plus rates
    Timer,
}

impl MetricKind {
    /// Returns the lowercase name of this kind, as used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::GaugeF64 => "gauge_f64",
            MetricKind::Histogram => "histogram",
            MetricKind::Meter => "meter",
            MetricKind::Timer => "timer",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
