//! Exponentially weighted moving averages
//!
//! Rates are folded in on a fixed 5-second tick. The smoothing factor for an
//! N-minute window is `1 - exp(-tick / N minutes)`, which gives the same
//! decay curve as the UNIX load average.

use std::time::Duration;

/// Interval at which an [`Ewma`] must be ticked.
pub const TICK_INTERVAL: Duration = Duration::from_secs(5);

fn alpha_for_minutes(minutes: f64) -> f64 {
    1.0 - (-TICK_INTERVAL.as_secs_f64() / 60.0 / minutes).exp()
}

/// Moving average of an event rate, in events per second
#[derive(Debug, Clone)]
pub struct Ewma {
    alpha: f64,
    rate: f64,
    uncounted: i64,
    initialized: bool,
}

impl Ewma {
    /// Creates an average with an explicit smoothing factor.
    pub fn with_alpha(alpha: f64) -> Self {
        Self {
            alpha,
            rate: 0.0,
            uncounted: 0,
            initialized: false,
        }
    }

    /// One-minute moving average.
    pub fn one_minute() -> Self {
        Self::with_alpha(alpha_for_minutes(1.0))
    }

    /// Five-minute moving average.
    pub fn five_minutes() -> Self {
        Self::with_alpha(alpha_for_minutes(5.0))
    }

    /// Fifteen-minute moving average.
    pub fn fifteen_minutes() -> Self {
        Self::with_alpha(alpha_for_minutes(15.0))
    }

    /// Adds `n` events to the current tick window.
    pub fn update(&mut self, n: i64) {
        self.uncounted += n;
    }

    /// Folds the current window into the average. Call once per [`TICK_INTERVAL`].
    pub fn tick(&mut self) {
        let instant_rate = self.uncounted as f64 / TICK_INTERVAL.as_secs_f64();
        self.uncounted = 0;
        if self.initialized {
            self.rate += self.alpha * (instant_rate - self.rate);
        } else {
            self.rate = instant_rate;
            self.initialized = true;
        }
    }

    /// Current rate in events per second.
    pub fn rate(&self) -> f64 {
        self.rate
    }
}
