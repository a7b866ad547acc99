//! Uniform reservoir sampling
//!
//! Keeps a statistically representative, bounded subset of an unbounded
//! stream of integer observations using Vitter's Algorithm R.

use std::sync::{Mutex, MutexGuard, PoisonError};

use honeymeter_core::domain::SampleSnapshot;
use rand::Rng;

/// Reservoir size used by [`UniformSample::default`].
pub const DEFAULT_RESERVOIR_SIZE: usize = 1028;

#[derive(Debug, Default)]
struct Reservoir {
    count: i64,
    values: Vec<i64>,
}

/// Fixed-size uniform random sample of a stream of values
#[derive(Debug)]
pub struct UniformSample {
    reservoir_size: usize,
    inner: Mutex<Reservoir>,
}

impl UniformSample {
    /// Creates a sample retaining at most `reservoir_size` values.
    pub fn new(reservoir_size: usize) -> Self {
        Self {
            reservoir_size,
            inner: Mutex::new(Reservoir {
                count: 0,
                values: Vec::with_capacity(reservoir_size.min(DEFAULT_RESERVOIR_SIZE)),
            }),
        }
    }

    // A panic while holding the lock cannot leave the reservoir
    // inconsistent, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Reservoir> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records one observation.
    pub fn update(&self, v: i64) {
        let mut r = self.lock();
        r.count += 1;
        if r.values.len() < self.reservoir_size {
            r.values.push(v);
        } else {
            let idx = rand::thread_rng().gen_range(0..r.count) as usize;
            if idx < self.reservoir_size {
                r.values[idx] = v;
            }
        }
    }

    /// Total number of observations, including those not retained.
    pub fn count(&self) -> i64 {
        self.lock().count
    }

    /// Number of retained values.
    pub fn size(&self) -> usize {
        self.lock().values.len()
    }

    /// Maximum number of retained values.
    pub fn reservoir_size(&self) -> usize {
        self.reservoir_size
    }

    /// Copies the current reservoir into an immutable snapshot.
    pub fn snapshot(&self) -> SampleSnapshot {
        let r = self.lock();
        SampleSnapshot::new(r.count, r.values.clone())
    }

    /// Copies the reservoir into a snapshot and empties it under one lock.
    pub fn take_snapshot(&self) -> SampleSnapshot {
        let mut r = self.lock();
        let count = std::mem::take(&mut r.count);
        let values = std::mem::take(&mut r.values);
        SampleSnapshot::new(count, values)
    }

    /// Discards all observations.
    pub fn clear(&self) {
        let mut r = self.lock();
        r.count = 0;
        r.values.clear();
    }
}

impl Default for UniformSample {
    fn default() -> Self {
        Self::new(DEFAULT_RESERVOIR_SIZE)
    }
}
