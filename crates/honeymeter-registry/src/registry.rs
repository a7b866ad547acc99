//! Named metrics registry
//!
//! [`StandardRegistry`] maps names to shared metric handles. Application
//! code keeps its own `Arc` to each metric and updates it directly; the
//! reporter only ever sees the registry through
//! [`IMetricsRegistry`].

use std::sync::Arc;

use dashmap::{mapref::entry::Entry, DashMap};
use honeymeter_core::{
    domain::MetricKind,
    ports::{IMetricsRegistry, MetricRef},
};
use tracing::debug;

use crate::{Counter, Gauge, GaugeF64, Histogram, Meter, RegistryError, Timer};

/// A shared handle to one registered metric
#[derive(Debug, Clone)]
pub enum Metric {
    Counter(Arc<Counter>),
    Gauge(Arc<Gauge>),
    GaugeF64(Arc<GaugeF64>),
    Histogram(Arc<Histogram>),
    Meter(Arc<Meter>),
    Timer(Arc<Timer>),
}

impl Metric {
    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::Counter(_) => MetricKind::Counter,
            Metric::Gauge(_) => MetricKind::Gauge,
            Metric::GaugeF64(_) => MetricKind::GaugeF64,
            Metric::Histogram(_) => MetricKind::Histogram,
            Metric::Meter(_) => MetricKind::Meter,
            Metric::Timer(_) => MetricKind::Timer,
        }
    }

    /// Borrows the metric as a port-level view.
    pub fn as_metric_ref(&self) -> MetricRef<'_> {
        match self {
            Metric::Counter(m) => MetricRef::Counter(m.as_ref()),
            Metric::Gauge(m) => MetricRef::Gauge(m.as_ref()),
            Metric::GaugeF64(m) => MetricRef::GaugeF64(m.as_ref()),
            Metric::Histogram(m) => MetricRef::Histogram(m.as_ref()),
            Metric::Meter(m) => MetricRef::Meter(m.as_ref()),
            Metric::Timer(m) => MetricRef::Timer(m.as_ref()),
        }
    }
}

macro_rules! impl_from_arc {
    ($($variant:ident),*) => {
        $(
            impl From<Arc<$variant>> for Metric {
                fn from(m: Arc<$variant>) -> Self {
                    Metric::$variant(m)
                }
            }
        )*
    };
}

impl_from_arc!(Counter, Gauge, GaugeF64, Histogram, Meter, Timer);

/// Thread-safe map from metric name to metric handle
#[derive(Debug, Default)]
pub struct StandardRegistry {
    metrics: DashMap<String, Metric>,
}

impl StandardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `metric` under `name`.
    ///
    /// # Errors
    /// Returns [`RegistryError::DuplicateMetric`] if the name is taken.
    pub fn register(&self, name: &str, metric: impl Into<Metric>) -> Result<(), RegistryError> {
        match self.metrics.entry(name.to_string()) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateMetric(name.to_string())),
            Entry::Vacant(slot) => {
                let metric = metric.into();
                debug!(name, kind = %metric.kind(), "Registered metric");
                slot.insert(metric);
                Ok(())
            }
        }
    }

    /// Returns the metric registered under `name`, if any.
    pub fn get(&self, name: &str) -> Option<Metric> {
        self.metrics.get(name).map(|m| m.value().clone())
    }

    /// Removes the metric registered under `name`. Returns whether one existed.
    pub fn unregister(&self, name: &str) -> bool {
        let removed = self.metrics.remove(name).is_some();
        if removed {
            debug!(name, "Unregistered metric");
        }
        removed
    }

    /// Removes every metric.
    pub fn unregister_all(&self) {
        self.metrics.clear();
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Names of all registered metrics, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.metrics.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    fn get_or_insert(&self, name: &str, make: impl FnOnce() -> Metric) -> Metric {
        self.metrics
            .entry(name.to_string())
            .or_insert_with(make)
            .value()
            .clone()
    }

    pub fn get_or_register_counter(&self, name: &str) -> Result<Arc<Counter>, RegistryError> {
        match self.get_or_insert(name, || Metric::Counter(Arc::default())) {
            Metric::Counter(m) => Ok(m),
            other => Err(mismatch(name, MetricKind::Counter, &other)),
        }
    }

    pub fn get_or_register_gauge(&self, name: &str) -> Result<Arc<Gauge>, RegistryError> {
        match self.get_or_insert(name, || Metric::Gauge(Arc::default())) {
            Metric::Gauge(m) => Ok(m),
            other => Err(mismatch(name, MetricKind::Gauge, &other)),
        }
    }

    pub fn get_or_register_gauge_f64(&self, name: &str) -> Result<Arc<GaugeF64>, RegistryError> {
        match self.get_or_insert(name, || Metric::GaugeF64(Arc::default())) {
            Metric::GaugeF64(m) => Ok(m),
            other => Err(mismatch(name, MetricKind::GaugeF64, &other)),
        }
    }

    pub fn get_or_register_histogram(
        &self,
        name: &str,
    ) -> Result<Arc<Histogram>, RegistryError> {
        match self.get_or_insert(name, || Metric::Histogram(Arc::default())) {
            Metric::Histogram(m) => Ok(m),
            other => Err(mismatch(name, MetricKind::Histogram, &other)),
        }
    }

    pub fn get_or_register_meter(&self, name: &str) -> Result<Arc<Meter>, RegistryError> {
        match self.get_or_insert(name, || Metric::Meter(Arc::default())) {
            Metric::Meter(m) => Ok(m),
            other => Err(mismatch(name, MetricKind::Meter, &other)),
        }
    }

    pub fn get_or_register_timer(&self, name: &str) -> Result<Arc<Timer>, RegistryError> {
        match self.get_or_insert(name, || Metric::Timer(Arc::default())) {
            Metric::Timer(m) => Ok(m),
            other => Err(mismatch(name, MetricKind::Timer, &other)),
        }
    }
}

fn mismatch(name: &str, expected: MetricKind, actual: &Metric) -> RegistryError {
    RegistryError::KindMismatch {
        name: name.to_string(),
        expected,
        actual: actual.kind(),
    }
}

impl IMetricsRegistry for StandardRegistry {
    fn for_each(&self, f: &mut dyn FnMut(&str, MetricRef<'_>)) {
        // Copy the handles out first so no shard lock is held while the
        // callback reads (and possibly clears) the metrics.
        let entries: Vec<(String, Metric)> = self
            .metrics
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();

        for (name, metric) in &entries {
            f(name, metric.as_metric_ref());
        }
    }
}
