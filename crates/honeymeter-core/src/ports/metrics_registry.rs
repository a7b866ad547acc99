//! Metrics registry port (driving side, read only)
//!
//! This module defines how the reporter observes an in-process metrics
//! registry. The registry owns live metric objects that the rest of the host
//! process updates concurrently; the reporter only iterates them once per
//! tick and reads (and optionally clears) their accumulated values.
//!
//! ## Design Notes
//!
//! - Thread safety is the registry's responsibility. Accessor traits take
//!   `&self` so implementations use atomics or interior locking.
//! - [`MetricRef`] is `#[non_exhaustive]`: consumers outside this crate must
//!   keep a default arm, which is where unknown future kinds are skipped.
//! - `for_each` takes a `&mut dyn FnMut` so the trait stays object safe and
//!   registries can be shared as `Arc<dyn IMetricsRegistry>`.

use crate::domain::{MetricKind, SampleSnapshot};

/// Read access to a counter
pub trait ICounter: Send + Sync {
    /// Current count.
    fn count(&self) -> i64;
    /// Resets the count to zero.
    fn clear(&self);

    /// Returns the current count and resets it to zero.
    ///
    /// The default reads and clears in two steps, so increments landing in
    /// between are lost. Implementations should do both in one atomic step.
    fn take(&self) -> i64 {
        let count = self.count();
        self.clear();
        count
    }
}

/// Read access to an integer gauge
pub trait IGauge: Send + Sync {
    fn value(&self) -> i64;
}

/// Read access to a floating point gauge
pub trait IGaugeF64: Send + Sync {
    fn value(&self) -> f64;
}

/// Read access to a histogram
pub trait IHistogram: Send + Sync {
    /// Number of observations recorded since creation or the last clear.
    fn count(&self) -> i64;
    /// Point-in-time copy of the retained sample.
    fn sample(&self) -> SampleSnapshot;
    /// Discards all observations.
    fn clear(&self);

    /// Returns the retained sample and discards it, as one step where the
    /// implementation allows.
    fn take_sample(&self) -> SampleSnapshot {
        let sample = self.sample();
        self.clear();
        sample
    }
}

/// Read access to a meter
///
/// Rates are events per second.
pub trait IMeter: Send + Sync {
    fn count(&self) -> i64;
    /// One-minute exponentially weighted moving average rate.
    fn rate1(&self) -> f64;
    /// Five-minute exponentially weighted moving average rate.
    fn rate5(&self) -> f64;
    /// Fifteen-minute exponentially weighted moving average rate.
    fn rate15(&self) -> f64;
    /// Mean rate since the meter was created.
    fn rate_mean(&self) -> f64;
}

/// Read access to a timer: a duration histogram combined with a meter
pub trait ITimer: Send + Sync {
    fn count(&self) -> i64;
    /// Point-in-time copy of the retained durations.
    fn sample(&self) -> SampleSnapshot;
    fn rate1(&self) -> f64;
    fn rate5(&self) -> f64;
    fn rate15(&self) -> f64;
    fn rate_mean(&self) -> f64;
    /// Discards all recorded durations and resets the rate meter.
    fn clear(&self);

    /// Returns the retained durations and then clears the timer.
    fn take_sample(&self) -> SampleSnapshot {
        let sample = self.sample();
        self.clear();
        sample
    }
}

/// A borrowed, kind-tagged view of one registered metric
#[derive(Clone, Copy)]
#[non_exhaustive]
pub enum MetricRef<'a> {
    Counter(&'a dyn ICounter),
    Gauge(&'a dyn IGauge),
    GaugeF64(&'a dyn IGaugeF64),
    Histogram(&'a dyn IHistogram),
    Meter(&'a dyn IMeter),
    Timer(&'a dyn ITimer),
}

impl MetricRef<'_> {
    /// The kind of metric behind this view.
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricRef::Counter(_) => MetricKind::Counter,
            MetricRef::Gauge(_) => MetricKind::Gauge,
            MetricRef::GaugeF64(_) => MetricKind::GaugeF64,
            MetricRef::Histogram(_) => MetricKind::Histogram,
            MetricRef::Meter(_) => MetricKind::Meter,
            MetricRef::Timer(_) => MetricKind::Timer,
        }
    }
}

impl std::fmt::Debug for MetricRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("MetricRef").field(&self.kind()).finish()
    }
}

/// Read interface over an in-process metrics registry
pub trait IMetricsRegistry: Send + Sync {
    /// Invokes `f` once for every currently registered metric.
    ///
    /// Iteration order is unspecified. Metrics registered or removed while
    /// iterating may or may not be visited.
    fn for_each(&self, f: &mut dyn FnMut(&str, MetricRef<'_>));
}
