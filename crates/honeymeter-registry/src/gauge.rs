//! Integer and floating point gauges

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use honeymeter_core::ports::{IGauge, IGaugeF64};

/// Holds the most recently set integer value
#[derive(Debug, Default)]
pub struct Gauge {
    value: AtomicI64,
}

impl Gauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, v: i64) {
        self.value.store(v, Ordering::Relaxed);
    }

    pub fn value(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl IGauge for Gauge {
    fn value(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Holds the most recently set `f64` value
///
/// The value is stored as raw bits in an `AtomicU64`.
#[derive(Debug)]
pub struct GaugeF64 {
    bits: AtomicU64,
}

impl GaugeF64 {
    pub fn new() -> Self {
        Self {
            bits: AtomicU64::new(0.0_f64.to_bits()),
        }
    }

    pub fn update(&self, v: f64) {
        self.bits.store(v.to_bits(), Ordering::Relaxed);
    }

    pub fn value(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

impl Default for GaugeF64 {
    fn default() -> Self {
        Self::new()
    }
}

impl IGaugeF64 for GaugeF64 {
    fn value(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}
