//! Event rate meter
//!
//! A meter counts events and maintains 1/5/15-minute moving average rates.
//! Rather than relying on a background ticker, the meter catches up on all
//! elapsed tick intervals whenever it is marked or read.

use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    time::Instant,
};

use honeymeter_core::ports::IMeter;

use crate::ewma::{Ewma, TICK_INTERVAL};

#[derive(Debug)]
struct MeterState {
    count: i64,
    m1: Ewma,
    m5: Ewma,
    m15: Ewma,
    start: Instant,
    last_tick: Instant,
}

impl MeterState {
    fn new(now: Instant) -> Self {
        Self {
            count: 0,
            m1: Ewma::one_minute(),
            m5: Ewma::five_minutes(),
            m15: Ewma::fifteen_minutes(),
            start: now,
            last_tick: now,
        }
    }

    fn tick(&mut self) {
        self.m1.tick();
        self.m5.tick();
        self.m15.tick();
    }

    fn tick_if_necessary(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_tick);
        let ticks = elapsed.as_nanos() / TICK_INTERVAL.as_nanos();
        if ticks == 0 {
            return;
        }
        self.last_tick += TICK_INTERVAL * ticks as u32;
        for _ in 0..ticks {
            self.tick();
        }
    }
}

/// Counts events and tracks their rate
#[derive(Debug)]
pub struct Meter {
    state: Mutex<MeterState>,
}

impl Meter {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MeterState::new(Instant::now())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MeterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_ticked(&self) -> MutexGuard<'_, MeterState> {
        let mut state = self.lock();
        state.tick_if_necessary(Instant::now());
        state
    }

    /// Records `n` events.
    pub fn mark(&self, n: i64) {
        let mut state = self.lock_ticked();
        state.count += n;
        state.m1.update(n);
        state.m5.update(n);
        state.m15.update(n);
    }

    /// Folds pending events into the moving averages immediately.
    ///
    /// Normally unnecessary: reads catch up on elapsed ticks by themselves.
    pub fn tick(&self) {
        self.lock().tick();
    }

    pub fn count(&self) -> i64 {
        self.lock().count
    }

    pub fn rate1(&self) -> f64 {
        self.lock_ticked().m1.rate()
    }

    pub fn rate5(&self) -> f64 {
        self.lock_ticked().m5.rate()
    }

    pub fn rate15(&self) -> f64 {
        self.lock_ticked().m15.rate()
    }

    /// Events per second since creation or the last clear.
    pub fn rate_mean(&self) -> f64 {
        let state = self.lock();
        if state.count == 0 {
            return 0.0;
        }
        let elapsed = state.start.elapsed().as_secs_f64();
        if elapsed <= 0.0 {
            return 0.0;
        }
        state.count as f64 / elapsed
    }

    /// Resets the count and all rates.
    pub fn clear(&self) {
        *self.lock() = MeterState::new(Instant::now());
    }
}

impl Default for Meter {
    fn default() -> Self {
        Self::new()
    }
}

impl IMeter for Meter {
    fn count(&self) -> i64 {
        Meter::count(self)
    }

    fn rate1(&self) -> f64 {
        Meter::rate1(self)
    }

    fn rate5(&self) -> f64 {
        Meter::rate5(self)
    }

    fn rate15(&self) -> f64 {
        Meter::rate15(self)
    }

    fn rate_mean(&self) -> f64 {
        Meter::rate_mean(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_counts_events() {
        let m = Meter::new();
        m.mark(1);
        m.mark(4);
        assert_eq!(m.count(), 5);
    }

    #[test]
    fn test_rates_before_first_tick_are_zero() {
        let m = Meter::new();
        m.mark(100);
        assert_eq!(m.rate1(), 0.0);
        assert_eq!(m.rate5(), 0.0);
        assert_eq!(m.rate15(), 0.0);
    }

    #[test]
    fn test_explicit_tick_updates_rates() {
        let m = Meter::new();
        m.mark(60);
        m.tick();
        assert!((m.rate1() - 12.0).abs() < 1e-9);
        assert!((m.rate5() - 12.0).abs() < 1e-9);
        assert!((m.rate15() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_tick_if_necessary_catches_up() {
        let start = Instant::now();
        let mut state = MeterState::new(start);
        state.count = 10;
        state.m1.update(10);
        state.tick_if_necessary(start + TICK_INTERVAL * 3);
        assert_eq!(state.last_tick, start + TICK_INTERVAL * 3);
        assert!(state.m1.rate() > 0.0);
        assert!(state.m1.rate() < 2.0);
    }

    #[test]
    fn test_clear_resets_meter() {
        let m = Meter::new();
        m.mark(10);
        m.tick();
        m.clear();
        assert_eq!(m.count(), 0);
        assert_eq!(m.rate1(), 0.0);
        assert_eq!(m.rate_mean(), 0.0);
    }

    #[test]
    fn test_rate_mean_is_positive_after_marks() {
        let m = Meter::new();
        m.mark(10);
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(m.rate_mean() > 0.0);
    }
}
