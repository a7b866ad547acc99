//! Point-in-time sample snapshots
//!
//! A [`SampleSnapshot`] is an immutable, sorted copy of the values held in a
//! histogram or timer reservoir. All derived statistics (max, mean,
//! percentiles, ...) are computed from the snapshot so that one translation
//! pass sees a consistent view even while the live metric keeps updating.

/// Immutable sorted copy of a sample reservoir
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSnapshot {
    /// Total number of observations recorded, including those evicted
    /// from the reservoir
    count: i64,
    /// Retained values, sorted ascending
    values: Vec<i64>,
}

impl SampleSnapshot {
    /// Creates a snapshot from a total observation count and the retained values.
    ///
    /// The values are sorted on construction.
    pub fn new(count: i64, mut values: Vec<i64>) -> Self {
        values.sort_unstable();
        Self { count, values }
    }

    /// Total number of observations ever recorded.
    pub fn count(&self) -> i64 {
        self.count
    }

    /// Number of values retained in the reservoir.
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Retained values in ascending order.
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Largest retained value, or 0 for an empty sample.
    pub fn max(&self) -> i64 {
        self.values.last().copied().unwrap_or(0)
    }

    /// Smallest retained value, or 0 for an empty sample.
    pub fn min(&self) -> i64 {
        self.values.first().copied().unwrap_or(0)
    }

    /// Sum of retained values, saturating at the `i64` bounds.
    pub fn sum(&self) -> i64 {
        self.values.iter().fold(0_i64, |acc, v| acc.saturating_add(*v))
    }

    /// Arithmetic mean of retained values, or 0.0 for an empty sample.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.sum() as f64 / self.values.len() as f64
    }

    /// Value at the given percentile, `p` expressed as a fraction in `[0, 1]`.
    ///
    /// Uses linear interpolation between the two closest ranks at
    /// position `p * (n + 1)`, clamped to the smallest and largest value.
    /// A NaN `p` yields 0.0.
    pub fn percentile(&self, p: f64) -> f64 {
        let n = self.values.len();
        if n == 0 || p.is_nan() {
            return 0.0;
        }

        let pos = p * (n as f64 + 1.0);
        if pos < 1.0 {
            self.values[0] as f64
        } else if pos >= n as f64 {
            self.values[n - 1] as f64
        } else {
            let lower = self.values[pos as usize - 1] as f64;
            let upper = self.values[pos as usize] as f64;
            lower + (pos - pos.floor()) * (upper - lower)
        }
    }

    /// Values at each of the given percentiles, in the same order.
    pub fn percentiles(&self, ps: &[f64]) -> Vec<f64> {
        ps.iter().map(|&p| self.percentile(p)).collect()
    }
}
