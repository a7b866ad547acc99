//! Honeymeter Core - Domain types, ports and configuration
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain types** - `MetricKind`, `SampleSnapshot`, `FieldValue`, `OutboundEvent`
//! - **Port definitions** - Traits for adapters: `IMetricsRegistry` (read side of
//!   an in-process metrics registry) and `ITelemetryClient` (event submission)
//! - **Configuration** - YAML-backed `Config` with validation and a builder
//!
//! # Architecture
//!
//! The domain module holds plain data with no I/O. Ports define the trait
//! interfaces that adapter crates (`honeymeter-registry`,
//! `honeymeter-honeycomb`) implement, and that `honeymeter-reporter` consumes.

pub mod config;
pub mod domain;
pub mod ports;
