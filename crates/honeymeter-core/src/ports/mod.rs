//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are the interfaces the reporter depends on, but whose
//! implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IMetricsRegistry`] - Iteration over live metrics, with per-kind
//!   accessor traits (`ICounter`, `IGauge`, `IHistogram`, ...)
//! - [`ITelemetryClient`] - Event creation and submission

pub mod metrics_registry;
pub mod telemetry_client;

pub use metrics_registry::{
    ICounter, IGauge, IGaugeF64, IHistogram, IMeter, IMetricsRegistry, ITimer, MetricRef,
};
pub use telemetry_client::ITelemetryClient;
