//! Integer counter

use std::sync::atomic::{AtomicI64, Ordering};

use honeymeter_core::ports::ICounter;

/// A signed 64-bit counter
///
/// Cumulative until [`clear`](Counter::clear) is called, which the reporter
/// does after every read in reset-counters mode.
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicI64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `n` to the counter.
    pub fn inc(&self, n: i64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    /// Subtracts `n` from the counter.
    pub fn dec(&self, n: i64) {
        self.value.fetch_sub(n, Ordering::Relaxed);
    }

    pub fn count(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Resets the counter to zero.
    pub fn clear(&self) {
        self.value.store(0, Ordering::Relaxed);
    }

    /// Returns the count and resets it to zero in one atomic step.
    pub fn take(&self) -> i64 {
        self.value.swap(0, Ordering::Relaxed)
    }
}

impl ICounter for Counter {
    fn count(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    fn clear(&self) {
        self.value.store(0, Ordering::Relaxed);
    }

    fn take(&self) -> i64 {
        Counter::take(self)
    }
}
