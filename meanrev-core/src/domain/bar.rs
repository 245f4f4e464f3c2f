//! Bar — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLCV bar for a single trading day.
///
/// The engine trades one instrument per run, so bars carry no symbol.
/// All fields must be finite; the loaders drop malformed rows before
/// bars reach the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Returns true if every price field is a finite number.
    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
    }

    /// Basic OHLC sanity check: high >= low, high/low bracket open and close.
    pub fn is_sane(&self) -> bool {
        if !self.is_finite() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.close > 0.0
    }
}

/// Errors in the bar sequence itself. Fatal to the run that consumes it.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("empty bar sequence")]
    Empty,

    #[error("non-monotonic bar sequence at index {index}: {date} does not advance past {prev}")]
    NonMonotonic {
        index: usize,
        prev: NaiveDate,
        date: NaiveDate,
    },

    #[error("non-finite or insane OHLC values at index {index} ({date})")]
    BadBar { index: usize, date: NaiveDate },
}

/// Validate a bar sequence before simulation.
///
/// Rejects empty input, duplicate or out-of-order dates, and bars with
/// non-finite or inconsistent OHLC values.
pub fn validate_bars(bars: &[Bar]) -> Result<(), DataError> {
    if bars.is_empty() {
        return Err(DataError::Empty);
    }
    for (i, bar) in bars.iter().enumerate() {
        if !bar.is_sane() {
            return Err(DataError::BadBar {
                index: i,
                date: bar.date,
            });
        }
        if i > 0 && bar.date <= bars[i - 1].date {
            return Err(DataError::NonMonotonic {
                index: i,
                prev: bars[i - 1].date,
                date: bar.date,
            });
        }
    }
    Ok(())
}
