//! The backtest engine: account state, per-bar loop, run output.

pub mod account;
pub mod run;
pub mod state;

pub use account::{Account, InvariantViolation};
pub use run::run_backtest;
pub use state::{BacktestRun, EngineConfig};

use crate::domain::DataError;
use thiserror::Error;

/// Failure of a single backtest run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),
}
