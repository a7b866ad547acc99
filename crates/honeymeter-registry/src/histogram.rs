//! Integer histogram

use honeymeter_core::{domain::SampleSnapshot, ports::IHistogram};

use crate::sample::UniformSample;

/// Distribution of integer observations backed by a reservoir sample
#[derive(Debug, Default)]
pub struct Histogram {
    sample: UniformSample,
}

impl Histogram {
    /// Creates a histogram over the default 1028-value reservoir.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a histogram over a caller-provided sample.
    pub fn with_sample(sample: UniformSample) -> Self {
        Self { sample }
    }

    pub fn update(&self, v: i64) {
        self.sample.update(v);
    }

    pub fn count(&self) -> i64 {
        self.sample.count()
    }

    pub fn sample(&self) -> SampleSnapshot {
        self.sample.snapshot()
    }

    /// Returns the retained sample and empties the histogram.
    pub fn take_sample(&self) -> SampleSnapshot {
        self.sample.take_snapshot()
    }

    pub fn clear(&self) {
        self.sample.clear();
    }
}

impl IHistogram for Histogram {
    fn count(&self) -> i64 {
        self.sample.count()
    }

    fn sample(&self) -> SampleSnapshot {
        self.sample.snapshot()
    }

    fn clear(&self) {
        self.sample.clear();
    }

    fn take_sample(&self) -> SampleSnapshot {
        self.sample.take_snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_and_statistics() {
        let h = Histogram::new();
        for v in [4, 8, 15, 16, 23, 42] {
            h.update(v);
        }
        assert_eq!(h.count(), 6);

        let s = h.sample();
        assert_eq!(s.size(), 6);
        assert_eq!(s.min(), 4);
        assert_eq!(s.max(), 42);
        assert_eq!(s.sum(), 108);
        assert_eq!(s.mean(), 18.0);
    }

    #[test]
    fn test_take_sample_resets() {
        let h = Histogram::new();
        h.update(5);
        h.update(9);

        let port: &dyn IHistogram = &h;
        let s = port.take_sample();
        assert_eq!(s.count(), 2);
        assert_eq!(s.max(), 9);
        assert_eq!(h.count(), 0);
    }

    #[test]
    fn test_clear() {
        let h = Histogram::with_sample(UniformSample::new(10));
        h.update(1);
        let port: &dyn IHistogram = &h;
        port.clear();
        assert_eq!(h.count(), 0);
        assert_eq!(h.sample().size(), 0);
    }
}
