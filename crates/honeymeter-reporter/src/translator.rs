//! Registry to event field translation
//!
//! The [`Translator`] walks every metric in a registry and flattens it into a
//! [`FlatFieldMap`] of derived field names (`requests.count`,
//! `latency.p99`, `jobs.rate.1min`, ...) to numeric values.
//!
//! ## Field layout
//!
//! | Kind | Fields |
//! |------|--------|
//! | Counter | `<name>.count`, only when the count is positive |
//! | Gauge | `<name>` |
//! | Histogram | `.count`, `.max`, `.mean`, `.min`, `.sum`, `.p<P>`, only when non-empty |
//! | Meter | `<name>`, `.rate.1min`, `.rate.5min`, `.rate.15min` |
//! | Timer | `<name>`, statistics as for histograms when non-empty, then the three rates |
//!
//! In reset mode counters, histograms and timers are cleared right after
//! they are read, so every tick reports only what happened since the last
//! one.

use honeymeter_core::{
    config::ReporterConfig,
    domain::{FieldValue, FlatFieldMap, SampleSnapshot},
    ports::{IMetricsRegistry, MetricRef},
};

/// Flattens a metrics registry into event fields
#[derive(Debug, Clone, PartialEq)]
pub struct Translator {
    /// Prefix applied to every metric name, joined with `.`
    namespace: Option<String>,
    /// Percentile fractions reported for histograms and timers
    percentiles: Vec<f64>,
    /// Clear accumulating metrics after reading them
    reset_counters: bool,
}

impl Translator {
    pub fn new(namespace: Option<String>, percentiles: Vec<f64>, reset_counters: bool) -> Self {
        Self {
            namespace: namespace.filter(|ns| !ns.is_empty()),
            percentiles,
            reset_counters,
        }
    }

    /// Creates a translator using the naming and reset settings of `config`.
    pub fn from_config(config: &ReporterConfig) -> Self {
        Self::new(
            config.namespace().map(str::to_string),
            config.percentiles.clone(),
            config.reset_counters,
        )
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn percentiles(&self) -> &[f64] {
        &self.percentiles
    }

    pub fn reset_counters(&self) -> bool {
        self.reset_counters
    }

    /// Produces the field map for the current state of `registry`.
    ///
    /// Never fails. Metric kinds this translator does not know about are
    /// skipped.
    pub fn translate(&self, registry: &dyn IMetricsRegistry) -> FlatFieldMap {
        let mut fields = FlatFieldMap::new();

        registry.for_each(&mut |name, metric| {
            let name = self.field_name(name);

            match metric {
                MetricRef::Counter(counter) => {
                    let count = if self.reset_counters {
                        counter.take()
                    } else {
                        counter.count()
                    };
                    if count > 0 {
                        put(&mut fields, format!("{name}.count"), count as f64);
                    }
                }
                MetricRef::Gauge(gauge) => {
                    put(&mut fields, name, gauge.value() as f64);
                }
                MetricRef::GaugeF64(gauge) => {
                    put(&mut fields, name, gauge.value());
                }
                MetricRef::Histogram(histogram) => {
                    let sample = if self.reset_counters {
                        histogram.take_sample()
                    } else {
                        histogram.sample()
                    };
                    if sample.count() > 0 {
                        fields.insert(
                            format!("{name}.count"),
                            FieldValue::UInt(sample.size() as u64),
                        );
                        put(&mut fields, format!("{name}.max"), sample.max() as f64);
                        put(&mut fields, format!("{name}.mean"), sample.mean());
                        put(&mut fields, format!("{name}.min"), sample.min() as f64);
                        put(&mut fields, format!("{name}.sum"), sample.sum() as f64);
                        self.put_percentiles(&mut fields, &name, &sample);
                    }
                }
                MetricRef::Meter(meter) => {
                    put(&mut fields, name.clone(), meter.count() as f64);
                    put_rates(&mut fields, &name, meter.rate1(), meter.rate5(), meter.rate15());
                }
                MetricRef::Timer(timer) => {
                    // Rates first: taking the sample also resets the meter
                    let rates = (timer.rate1(), timer.rate5(), timer.rate15());
                    let sample = if self.reset_counters {
                        timer.take_sample()
                    } else {
                        timer.sample()
                    };
                    let count = sample.count();
                    put(&mut fields, name.clone(), count as f64);
                    if count > 0 {
                        let mean = sample.mean();
                        put(&mut fields, format!("{name}.max"), sample.max() as f64);
                        put(&mut fields, format!("{name}.mean"), mean);
                        put(&mut fields, format!("{name}.min"), sample.min() as f64);
                        put(&mut fields, format!("{name}.sum"), mean * count as f64);
                        self.put_percentiles(&mut fields, &name, &sample);
                    }
                    put_rates(&mut fields, &name, rates.0, rates.1, rates.2);
                }
                _ => {}
            }
        });

        fields
    }

    fn field_name(&self, name: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}.{name}"),
            None => name.to_string(),
        }
    }

    fn put_percentiles(&self, fields: &mut FlatFieldMap, name: &str, sample: &SampleSnapshot) {
        for (p, value) in self.percentiles.iter().zip(sample.percentiles(&self.percentiles)) {
            put(fields, format!("{name}.p{}", percentile_label(*p)), value);
        }
    }
}

impl From<&ReporterConfig> for Translator {
    fn from(config: &ReporterConfig) -> Self {
        Self::from_config(config)
    }
}

fn put(fields: &mut FlatFieldMap, key: String, value: f64) {
    fields.insert(key, FieldValue::Float(value));
}

fn put_rates(fields: &mut FlatFieldMap, name: &str, rate1: f64, rate5: f64, rate15: f64) {
    put(fields, format!("{name}.rate.1min"), rate1);
    put(fields, format!("{name}.rate.5min"), rate5);
    put(fields, format!("{name}.rate.15min"), rate15);
}

/// Renders a percentile fraction as the field suffix used after `.p`.
///
/// `0.5` becomes `"50"` and `0.999` becomes `"99.9"`. The scaled value is
/// rounded to six decimal places first to strip floating point noise.
pub fn percentile_label(p: f64) -> String {
    let scaled = (p * 100.0 * 1e6).round() / 1e6;
    format!("{scaled}")
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeSet, sync::Arc, time::Duration};

    use honeymeter_registry::{Counter, Gauge, StandardRegistry};

    use super::*;

    fn keys(fields: &FlatFieldMap) -> BTreeSet<&str> {
        fields.keys().map(String::as_str).collect()
    }

    fn float(fields: &FlatFieldMap, key: &str) -> f64 {
        fields
            .get(key)
            .and_then(FieldValue::as_f64)
            .unwrap_or_else(|| panic!("missing numeric field {key}"))
    }

    fn gauge_and_counter() -> StandardRegistry {
        let registry = StandardRegistry::new();
        let gauge = Arc::new(Gauge::new());
        gauge.update(5);
        let counter = Arc::new(Counter::new());
        counter.inc(10);
        registry.register("queue_depth", gauge).unwrap();
        registry.register("requests", counter).unwrap();
        registry
    }

    #[test]
    fn test_percentile_labels() {
        assert_eq!(percentile_label(0.5), "50");
        assert_eq!(percentile_label(0.95), "95");
        assert_eq!(percentile_label(0.99), "99");
        assert_eq!(percentile_label(0.999), "99.9");
        assert_eq!(percentile_label(0.75), "75");
        assert_eq!(percentile_label(1.0), "100");
    }

    #[test]
    fn test_gauge_and_counter() {
        let registry = gauge_and_counter();
        let translator = Translator::new(None, vec![0.5], false);

        let fields = translator.translate(&registry);

        assert_eq!(fields.len(), 2);
        assert_eq!(fields["queue_depth"], FieldValue::Float(5.0));
        assert_eq!(fields["requests.count"], FieldValue::Float(10.0));
    }

    #[test]
    fn test_namespace_prefixes_every_field_once() {
        let registry = gauge_and_counter();
        let translator = Translator::new(Some("myapp".into()), vec![0.5], false);

        let fields = translator.translate(&registry);

        assert_eq!(
            keys(&fields),
            BTreeSet::from(["myapp.queue_depth", "myapp.requests.count"])
        );
        assert_eq!(fields["myapp.queue_depth"], FieldValue::Float(5.0));
        assert_eq!(fields["myapp.requests.count"], FieldValue::Float(10.0));
    }

    #[test]
    fn test_empty_namespace_is_no_namespace() {
        let translator = Translator::new(Some(String::new()), vec![], false);
        assert_eq!(translator.namespace(), None);
    }

    #[test]
    fn test_reset_mode_clears_counter_after_read() {
        let registry = StandardRegistry::new();
        registry.get_or_register_counter("requests").unwrap().inc(10);
        let translator = Translator::new(None, vec![0.5], true);

        let first = translator.translate(&registry);
        let second = translator.translate(&registry);

        assert_eq!(first["requests.count"], FieldValue::Float(10.0));
        assert!(!second.contains_key("requests.count"));
    }

    #[test]
    fn test_zero_counter_is_absent() {
        let registry = StandardRegistry::new();
        registry.get_or_register_counter("idle").unwrap();

        let fields = Translator::new(None, vec![0.5], false).translate(&registry);

        assert!(fields.is_empty());
    }

    #[test]
    fn test_negative_counter_is_absent() {
        let registry = StandardRegistry::new();
        registry.get_or_register_counter("balance").unwrap().dec(3);

        let fields = Translator::new(None, vec![], false).translate(&registry);

        assert!(fields.is_empty());
    }

    #[test]
    fn test_reset_mode_clears_negative_counter() {
        let registry = StandardRegistry::new();
        let counter = registry.get_or_register_counter("balance").unwrap();
        counter.dec(3);

        let fields = Translator::new(None, vec![], true).translate(&registry);

        assert!(fields.is_empty());
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_nan_percentile_does_not_panic() {
        let registry = StandardRegistry::new();
        registry.get_or_register_histogram("payload").unwrap().update(4);

        let fields = Translator::new(None, vec![f64::NAN], false).translate(&registry);

        assert_eq!(float(&fields, "payload.max"), 4.0);
        assert_eq!(fields.len(), 6);
    }

    #[test]
    fn test_gauge_f64_value() {
        let registry = StandardRegistry::new();
        registry.get_or_register_gauge_f64("load").unwrap().update(0.25);

        let fields = Translator::new(None, vec![], false).translate(&registry);

        assert_eq!(fields["load"], FieldValue::Float(0.25));
    }

    #[test]
    fn test_histogram_emits_exact_field_set() {
        let registry = StandardRegistry::new();
        let histogram = registry.get_or_register_histogram("payload").unwrap();
        for v in 1..=100 {
            histogram.update(v);
        }

        let fields = Translator::new(None, vec![0.5, 0.99], false).translate(&registry);

        assert_eq!(
            keys(&fields),
            BTreeSet::from([
                "payload.count",
                "payload.max",
                "payload.mean",
                "payload.min",
                "payload.sum",
                "payload.p50",
                "payload.p99",
            ])
        );
        assert_eq!(fields["payload.count"], FieldValue::UInt(100));
        assert_eq!(float(&fields, "payload.max"), 100.0);
        assert_eq!(float(&fields, "payload.min"), 1.0);
        assert_eq!(float(&fields, "payload.mean"), 50.5);
        assert_eq!(float(&fields, "payload.sum"), 5050.0);
        assert_eq!(float(&fields, "payload.p50"), 50.5);
        assert!((float(&fields, "payload.p99") - 99.99).abs() < 1e-9);
    }

    #[test]
    fn test_empty_histogram_is_absent() {
        let registry = StandardRegistry::new();
        registry.get_or_register_histogram("payload").unwrap();

        let fields = Translator::new(None, vec![0.5], false).translate(&registry);

        assert!(fields.is_empty());
    }

    #[test]
    fn test_reset_mode_clears_histogram() {
        let registry = StandardRegistry::new();
        let histogram = registry.get_or_register_histogram("payload").unwrap();
        histogram.update(7);

        let translator = Translator::new(None, vec![0.5], true);
        assert!(translator.translate(&registry).contains_key("payload.max"));
        assert_eq!(histogram.count(), 0);
        assert!(translator.translate(&registry).is_empty());
    }

    #[test]
    fn test_meter_fields() {
        let registry = StandardRegistry::new();
        registry.get_or_register_meter("jobs").unwrap().mark(4);

        let fields = Translator::new(None, vec![0.5], false).translate(&registry);

        assert_eq!(
            keys(&fields),
            BTreeSet::from(["jobs", "jobs.rate.1min", "jobs.rate.5min", "jobs.rate.15min"])
        );
        assert_eq!(fields["jobs"], FieldValue::Float(4.0));
    }

    #[test]
    fn test_idle_meter_still_reported() {
        let registry = StandardRegistry::new();
        registry.get_or_register_meter("jobs").unwrap();

        let fields = Translator::new(None, vec![], false).translate(&registry);

        assert_eq!(fields["jobs"], FieldValue::Float(0.0));
        assert_eq!(fields.len(), 4);
    }

    #[test]
    fn test_timer_fields() {
        let registry = StandardRegistry::new();
        let timer = registry.get_or_register_timer("latency").unwrap();
        timer.update(Duration::from_millis(1));
        timer.update(Duration::from_millis(2));
        timer.update(Duration::from_millis(3));

        let fields = Translator::new(Some("api".into()), vec![0.5], false).translate(&registry);

        assert_eq!(
            keys(&fields),
            BTreeSet::from([
                "api.latency",
                "api.latency.max",
                "api.latency.mean",
                "api.latency.min",
                "api.latency.sum",
                "api.latency.p50",
                "api.latency.rate.1min",
                "api.latency.rate.5min",
                "api.latency.rate.15min",
            ])
        );
        assert_eq!(float(&fields, "api.latency"), 3.0);
        assert_eq!(float(&fields, "api.latency.max"), 3_000_000.0);
        assert_eq!(float(&fields, "api.latency.min"), 1_000_000.0);
        assert_eq!(float(&fields, "api.latency.mean"), 2_000_000.0);
        assert_eq!(float(&fields, "api.latency.sum"), 6_000_000.0);
        assert_eq!(float(&fields, "api.latency.p50"), 2_000_000.0);
    }

    #[test]
    fn test_idle_timer_reports_count_and_rates_only() {
        let registry = StandardRegistry::new();
        registry.get_or_register_timer("latency").unwrap();

        let fields = Translator::new(None, vec![0.5], false).translate(&registry);

        assert_eq!(
            keys(&fields),
            BTreeSet::from([
                "latency",
                "latency.rate.1min",
                "latency.rate.5min",
                "latency.rate.15min",
            ])
        );
    }

    #[test]
    fn test_reset_mode_clears_timer() {
        let registry = StandardRegistry::new();
        let timer = registry.get_or_register_timer("latency").unwrap();
        timer.update(Duration::from_millis(5));

        let translator = Translator::new(None, vec![0.5], true);
        let first = translator.translate(&registry);
        let second = translator.translate(&registry);

        assert!(first.contains_key("latency.max"));
        assert_eq!(float(&second, "latency"), 0.0);
        assert!(!second.contains_key("latency.max"));
    }

    #[test]
    fn test_repeated_translation_without_reset_is_stable() {
        let registry = gauge_and_counter();
        let histogram = registry.get_or_register_histogram("payload").unwrap();
        histogram.update(3);
        histogram.update(9);

        let translator = Translator::new(None, vec![0.5, 0.95], false);
        assert_eq!(translator.translate(&registry), translator.translate(&registry));
    }

    #[test]
    fn test_empty_registry_yields_empty_map() {
        let registry = StandardRegistry::new();
        assert!(Translator::new(None, vec![0.5], true)
            .translate(&registry)
            .is_empty());
    }

    #[test]
    fn test_from_config_uses_namespace_only_in_namespace_mode() {
        use honeymeter_core::config::LabelMode;

        let mut config = ReporterConfig {
            service: "api".into(),
            ..ReporterConfig::default()
        };
        assert_eq!(Translator::from(&config).namespace(), None);

        config.label_mode = LabelMode::Namespace;
        let translator = Translator::from(&config);
        assert_eq!(translator.namespace(), Some("api"));
        assert_eq!(translator.percentiles(), &[0.5, 0.95, 0.99, 0.999]);
        assert!(!translator.reset_counters());
    }
}
