//! Bounded rolling window of close prices.
//!
//! Holds the last `period` closes and exposes mean, population standard
//! deviation, and the normalized deviation score. All statistics are
//! `None` until the window is full — warm-up bars produce no signal.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct RollingWindow {
    period: usize,
    values: VecDeque<f64>,
}

impl RollingWindow {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "window period must be >= 1");
        Self {
            period,
            values: VecDeque::with_capacity(period),
        }
    }

    /// Push a close, evicting the oldest once the window is at capacity.
    pub fn push(&mut self, close: f64) {
        if self.values.len() == self.period {
            self.values.pop_front();
        }
        self.values.push_back(close);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.period
    }

    /// Arithmetic mean of the window, once full.
    pub fn mean(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.period as f64)
    }

    /// Population standard deviation over the window, once full.
    pub fn std_dev(&self) -> Option<f64> {
        let mean = self.mean()?;
        let variance = self
            .values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / self.period as f64;
        Some(variance.sqrt())
    }

    /// Normalized deviation score of `close` against the window.
    ///
    /// Exactly 0.0 when the standard deviation is zero (constant price
    /// run) — no signal, not an error.
    pub fn zscore(&self, close: f64) -> Option<f64> {
        let mean = self.mean()?;
        let std = self.std_dev()?;
        if std == 0.0 {
            return Some(0.0);
        }
        Some((close - mean) / std)
    }
}
