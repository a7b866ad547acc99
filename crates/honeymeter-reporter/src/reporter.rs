//! Periodic reporting loop
//!
//! A [`Reporter`] owns one telemetry client and, once started, sends one
//! event per interval containing every metric in the registry plus the
//! configured metadata fields.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle --start()--> Running --stop()--> Stopped
//! ```
//!
//! A reporter is single use. Once stopped it cannot be restarted, and its
//! client has been closed.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use honeymeter_core::config::ConfigBuilder;
//! use honeymeter_registry::StandardRegistry;
//! use honeymeter_reporter::Reporter;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(StandardRegistry::new());
//! let config = ConfigBuilder::new()
//!     .write_key("hcaik_123")
//!     .dataset("metrics")
//!     .service("api")
//!     .build();
//!
//! let reporter = Arc::new(Reporter::connect(registry.clone(), &config)?);
//! let handle = reporter.spawn();
//!
//! registry.get_or_register_counter("requests")?.inc(1);
//!
//! reporter.stop().await;
//! handle.await??;
//! # Ok(())
//! # }
//! ```

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use honeymeter_core::{
    config::{Config, LabelMode, ReporterConfig},
    domain::{FieldValue, OutboundEvent},
    ports::{IMetricsRegistry, ITelemetryClient},
};
use honeymeter_honeycomb::{ClientConfig, HoneycombClient};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{translator::Translator, ReporterError};

/// Environment variable whose presence enables field map logging
pub const DEBUG_ENV_VAR: &str = "DEBUG";

/// Field carrying the source label
pub const SOURCE_FIELD: &str = "source";

/// Field carrying the service label under [`LabelMode::ServiceName`]
pub const SERVICE_NAME_FIELD: &str = "service_name";

/// Sends the contents of a metrics registry to a telemetry client on a
/// fixed interval
pub struct Reporter {
    registry: Arc<dyn IMetricsRegistry>,
    client: Arc<dyn ITelemetryClient>,
    translator: Translator,
    config: ReporterConfig,
    /// Log every computed field map at info level
    debug: bool,
    running: AtomicBool,
    stopped: AtomicBool,
    /// Set once the client has been closed
    released: AtomicBool,
    shutdown: CancellationToken,
}

impl Reporter {
    /// Creates a reporter with explicit settings and an injected client.
    ///
    /// Field map logging is enabled when `DEBUG` is set in the environment.
    ///
    /// # Errors
    /// Returns [`ReporterError::InvalidConfig`] if `config` fails
    /// [`ReporterConfig::validate`], e.g. a zero interval or a percentile
    /// outside `0.0..=1.0`.
    pub fn new(
        registry: Arc<dyn IMetricsRegistry>,
        client: Arc<dyn ITelemetryClient>,
        config: ReporterConfig,
    ) -> Result<Self, ReporterError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ReporterError::InvalidConfig(errors));
        }
        Ok(Self::from_parts(registry, client, config))
    }

    fn from_parts(
        registry: Arc<dyn IMetricsRegistry>,
        client: Arc<dyn ITelemetryClient>,
        config: ReporterConfig,
    ) -> Self {
        Self {
            registry,
            client,
            translator: Translator::from_config(&config),
            config,
            debug: std::env::var_os(DEBUG_ENV_VAR).is_some(),
            running: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
            released: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
        }
    }

    /// Creates a reporter using the default interval and percentiles.
    pub fn with_defaults(
        registry: Arc<dyn IMetricsRegistry>,
        client: Arc<dyn ITelemetryClient>,
        service: impl Into<String>,
        source: impl Into<String>,
        reset_counters: bool,
    ) -> Self {
        let config = ReporterConfig {
            service: service.into(),
            source: source.into(),
            reset_counters,
            ..ReporterConfig::default()
        };
        Self::from_parts(registry, client, config)
    }

    /// Creates a reporter backed by a [`HoneycombClient`] built from
    /// `config.honeycomb`.
    ///
    /// The reporter section is validated before any client is built.
    ///
    /// # Errors
    /// - [`ReporterError::InvalidConfig`] if `config.reporter` is invalid
    /// - [`ReporterError::ClientInit`] if the client cannot be created
    pub fn connect(
        registry: Arc<dyn IMetricsRegistry>,
        config: &Config,
    ) -> Result<Self, ReporterError> {
        let errors = config.reporter.validate();
        if !errors.is_empty() {
            return Err(ReporterError::InvalidConfig(errors));
        }
        let client = HoneycombClient::new(ClientConfig::from(&config.honeycomb))?;
        Ok(Self::from_parts(
            registry,
            Arc::new(client),
            config.reporter.clone(),
        ))
    }

    /// Forces field map logging on or off, overriding `DEBUG`.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Ties the reporter to a host shutdown token.
    ///
    /// Cancelling `parent` stops the reporter just like [`Reporter::stop`].
    pub fn with_shutdown(mut self, parent: &CancellationToken) -> Self {
        self.shutdown = parent.child_token();
        self
    }

    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    pub fn interval(&self) -> Duration {
        self.config.interval_duration()
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire) && !self.is_stopped()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Attaches a static field to every event sent from now on.
    pub fn add_field(&self, key: &str, value: impl Into<FieldValue>) {
        self.client.add_field(key, value.into());
    }

    /// Builds the event for one tick: metadata fields plus the translated
    /// registry.
    pub fn build_event(&self) -> OutboundEvent {
        let fields = self.translator.translate(self.registry.as_ref());
        if self.debug {
            info!(fields = ?fields, "Computed metric fields");
        }

        let mut event = self.client.new_event();
        event.add_field(SOURCE_FIELD, self.config.source.as_str());
        if self.config.label_mode == LabelMode::ServiceName {
            event.add_field(SERVICE_NAME_FIELD, self.config.service.as_str());
        }
        event.add_fields(fields);
        event
    }

    /// Runs the reporting loop until [`Reporter::stop`] is called.
    ///
    /// The first event is sent one interval after the call. Each wait starts
    /// once the previous event has been handed off, and send failures are
    /// logged and skipped.
    ///
    /// # Errors
    /// - [`ReporterError::Stopped`] if the reporter was already stopped
    /// - [`ReporterError::AlreadyRunning`] if another call is running the loop
    pub async fn start(&self) -> Result<(), ReporterError> {
        if self.is_stopped() {
            self.release().await;
            return Err(ReporterError::Stopped);
        }
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ReporterError::AlreadyRunning);
        }

        let interval = self.interval();
        info!(
            interval_secs = interval.as_secs(),
            service = %self.config.service,
            source = %self.config.source,
            label_mode = %self.config.label_mode,
            "Metrics reporter started"
        );

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => {
                    info!("Metrics reporter shutting down");
                    break;
                }
                _ = tokio::time::sleep(interval) => {
                    self.report_once().await;
                }
            }
        }

        self.stopped.store(true, Ordering::Release);
        self.release().await;
        Ok(())
    }

    /// Runs [`Reporter::start`] on a background task.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<Result<(), ReporterError>> {
        let reporter = Arc::clone(self);
        tokio::spawn(async move { reporter.start().await })
    }

    /// Signals the loop to exit and releases the client. Calling it again
    /// has no effect.
    ///
    /// While the loop is running it closes the client itself on the way
    /// out, and an event already being sent is allowed to finish. A
    /// reporter that was never started has its client closed here.
    pub async fn stop(&self) {
        if self
            .stopped
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        debug!("Metrics reporter stop requested");
        self.shutdown.cancel();
        if !self.running.load(Ordering::Acquire) {
            self.release().await;
        }
    }

    async fn report_once(&self) {
        let event = self.build_event();
        let field_count = event.len();

        match self.client.send(event).await {
            Ok(()) => debug!(fields = field_count, "Metrics event sent"),
            Err(e) => warn!(error = %e, "Failed to send metrics event"),
        }
    }

    async fn release(&self) {
        if !self.released.swap(true, Ordering::AcqRel) {
            self.client.close().await;
        }
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("config", &self.config)
            .field("debug", &self.debug)
            .field("running", &self.is_running())
            .field("stopped", &self.is_stopped())
            .finish_non_exhaustive()
    }
}
