//! Configuration module for Honeymeter.
//!
//! The YAML file has two sections: `honeycomb` (where events go) and
//! `reporter` (how often and under which labels). Missing keys take their
//! defaults, and [`Config::validate`] reports every problem at once.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

/// Percentiles reported for histograms and timers when none are configured.
pub const DEFAULT_PERCENTILES: [f64; 4] = [0.5, 0.95, 0.99, 0.999];

/// Seconds between reporting ticks when no interval is configured.
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Honeycomb API endpoint used when no host is configured.
pub const DEFAULT_API_HOST: &str = "https://api.honeycomb.io";

/// Request timeout in seconds for event submission.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for Honeymeter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub honeycomb: HoneycombConfig,
    #[serde(default)]
    pub reporter: ReporterConfig,
}

/// Destination settings for the Honeycomb events API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoneycombConfig {
    /// Team write key sent as `X-Honeycomb-Team`.
    pub write_key: String,
    /// Dataset the events are written to.
    pub dataset: String,
    /// Base URL of the events API.
    pub api_host: String,
    /// Seconds before an event submission times out.
    pub timeout: u64,
}

/// How the service label is attached to reported metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    /// Attach a `service_name` field to every event; metric names are
    /// reported unprefixed.
    #[default]
    ServiceName,
    /// Prefix every metric field with `<service>.`; no `service_name` field.
    Namespace,
}

impl std::fmt::Display for LabelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LabelMode::ServiceName => "service_name",
            LabelMode::Namespace => "namespace",
        };
        write!(f, "{}", s)
    }
}

/// Reporter loop and translation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// Seconds between reporting ticks.
    pub interval: u64,
    /// Service label, attached according to `label_mode`.
    pub service: String,
    /// Source label attached to every event as `source`.
    pub source: String,
    /// Metadata convention for the service label.
    pub label_mode: LabelMode,
    /// Percentiles (fractions in `0.0..=1.0`) reported for histograms and timers.
    pub percentiles: Vec<f64>,
    /// Clear counters, histograms and timers after every read.
    pub reset_counters: bool,
}

impl ReporterConfig {
    /// The reporting interval as a [`Duration`].
    pub fn interval_duration(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    /// The metric name prefix in effect, if any.
    ///
    /// Only [`LabelMode::Namespace`] with a non-empty service label yields a
    /// namespace.
    pub fn namespace(&self) -> Option<&str> {
        match self.label_mode {
            LabelMode::Namespace if !self.service.is_empty() => Some(&self.service),
            _ => None,
        }
    }
}

impl HoneycombConfig {
    /// The request timeout as a [`Duration`].
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Reads and parses the YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Like [`Config::load`], but returns the defaults if the file is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Where the configuration file lives when no path is given.
    ///
    /// Typically `$XDG_CONFIG_HOME/honeymeter/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("honeymeter")
            .join("config.yaml")
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for HoneycombConfig {
    fn default() -> Self {
        Self {
            write_key: String::new(),
            dataset: String::new(),
            api_host: DEFAULT_API_HOST.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL_SECS,
            service: String::new(),
            source: String::new(),
            label_mode: LabelMode::default(),
            percentiles: DEFAULT_PERCENTILES.to_vec(),
            reset_counters: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// One problem found by [`Config::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"reporter.interval"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ReporterConfig {
    /// Checks the reporter section on its own.
    ///
    /// Field paths in the returned errors are prefixed with `reporter.`.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.interval == 0 {
            errors.push(ValidationError {
                field: "reporter.interval".into(),
                message: "must be greater than 0".into(),
            });
        }
        // NaN fails the range check too
        for (i, p) in self.percentiles.iter().enumerate() {
            if !(0.0..=1.0).contains(p) {
                errors.push(ValidationError {
                    field: format!("reporter.percentiles[{i}]"),
                    message: format!("{p} is not a fraction in range 0.0..=1.0"),
                });
            }
        }
        if self.label_mode == LabelMode::Namespace && self.service.is_empty() {
            errors.push(ValidationError {
                field: "reporter.service".into(),
                message: "must not be empty when label_mode is namespace".into(),
            });
        }

        errors
    }
}

impl Config {
    /// Checks every section and collects all problems found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- honeycomb ---
        if self.honeycomb.write_key.trim().is_empty() {
            errors.push(ValidationError {
                field: "honeycomb.write_key".into(),
                message: "must not be empty".into(),
            });
        }
        if self.honeycomb.dataset.trim().is_empty() {
            errors.push(ValidationError {
                field: "honeycomb.dataset".into(),
                message: "must not be empty".into(),
            });
        }
        if !self.honeycomb.api_host.starts_with("http://")
            && !self.honeycomb.api_host.starts_with("https://")
        {
            errors.push(ValidationError {
                field: "honeycomb.api_host".into(),
                message: format!(
                    "must be an http(s) URL, got '{}'",
                    self.honeycomb.api_host
                ),
            });
        }
        if self.honeycomb.timeout == 0 {
            errors.push(ValidationError {
                field: "honeycomb.timeout".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- reporter ---
        errors.extend(self.reporter.validate());

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Fluent construction of a [`Config`] without a file.
///
/// Unset values keep their defaults.
///
/// # Example
///
/// ```rust
/// use honeymeter_core::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .write_key("hcaik_123")
///     .dataset("metrics")
///     .service("api")
///     .source("web-1")
///     .interval(15)
///     .build();
/// assert_eq!(config.reporter.interval, 15);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Starts from [`Config::default`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- honeycomb ---

    pub fn write_key(mut self, write_key: impl Into<String>) -> Self {
        self.config.honeycomb.write_key = write_key.into();
        self
    }

    pub fn dataset(mut self, dataset: impl Into<String>) -> Self {
        self.config.honeycomb.dataset = dataset.into();
        self
    }

    pub fn api_host(mut self, api_host: impl Into<String>) -> Self {
        self.config.honeycomb.api_host = api_host.into();
        self
    }

    pub fn timeout(mut self, seconds: u64) -> Self {
        self.config.honeycomb.timeout = seconds;
        self
    }

    // --- reporter ---

    pub fn interval(mut self, seconds: u64) -> Self {
        self.config.reporter.interval = seconds;
        self
    }

    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.config.reporter.service = service.into();
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.config.reporter.source = source.into();
        self
    }

    pub fn label_mode(mut self, mode: LabelMode) -> Self {
        self.config.reporter.label_mode = mode;
        self
    }

    pub fn percentiles(mut self, percentiles: Vec<f64>) -> Self {
        self.config.reporter.percentiles = percentiles;
        self
    }

    pub fn reset_counters(mut self, reset: bool) -> Self {
        self.config.reporter.reset_counters = reset;
        self
    }

    // --- build ---

    /// Returns the configuration without validating it.
    pub fn build(self) -> Config {
        self.config
    }

    /// Returns the configuration, or every validation error if it is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
