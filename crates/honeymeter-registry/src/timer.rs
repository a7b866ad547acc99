//! Duration timer

use std::time::{Duration, Instant};

use honeymeter_core::{domain::SampleSnapshot, ports::ITimer};

use crate::{histogram::Histogram, meter::Meter};

/// Records durations and the rate at which they occur
///
/// Durations are stored in nanoseconds; derived statistics (max, mean,
/// percentiles) are therefore nanoseconds as well.
#[derive(Debug, Default)]
pub struct Timer {
    histogram: Histogram,
    meter: Meter,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one duration.
    pub fn update(&self, d: Duration) {
        let nanos = i64::try_from(d.as_nanos()).unwrap_or(i64::MAX);
        self.histogram.update(nanos);
        self.meter.mark(1);
    }

    /// Records the time elapsed since `start`.
    pub fn update_since(&self, start: Instant) {
        self.update(start.elapsed());
    }

    /// Runs `f` and records how long it took.
    pub fn time<T>(&self, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.update_since(start);
        out
    }

    pub fn count(&self) -> i64 {
        self.histogram.count()
    }

    pub fn sample(&self) -> SampleSnapshot {
        self.histogram.sample()
    }

    /// The rate meter tracking how often durations are recorded.
    pub fn meter(&self) -> &Meter {
        &self.meter
    }

    /// Returns the retained durations, then clears durations and rates.
    pub fn take_sample(&self) -> SampleSnapshot {
        let sample = self.histogram.take_sample();
        self.meter.clear();
        sample
    }

    /// Discards recorded durations and resets the rate meter.
    pub fn clear(&self) {
        self.histogram.clear();
        self.meter.clear();
    }
}

impl ITimer for Timer {
    fn count(&self) -> i64 {
        self.histogram.count()
    }

    fn sample(&self) -> SampleSnapshot {
        self.histogram.sample()
    }

    fn rate1(&self) -> f64 {
        self.meter.rate1()
    }

    fn rate5(&self) -> f64 {
        self.meter.rate5()
    }

    fn rate15(&self) -> f64 {
        self.meter.rate15()
    }

    fn rate_mean(&self) -> f64 {
        self.meter.rate_mean()
    }

    fn clear(&self) {
        Timer::clear(self);
    }

    fn take_sample(&self) -> SampleSnapshot {
        Timer::take_sample(self)
    }
}
