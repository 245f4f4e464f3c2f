//! MeanRev Core — the simulation engine.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (bars, positions, trades)
//! - Rolling-window indicators (SMA / sigma / z-score, ADX trend filter)
//! - The strategy contract and the mean-reversion strategy
//! - Position and risk accounting with structural invariants
//! - The deterministic per-bar backtest loop
//!
//! Each run is a pure, self-contained computation over an immutable bar
//! slice and one parameter set, so runs are safe to fan out in parallel.

pub mod domain;
pub mod engine;
pub mod indicators;
pub mod strategy;

pub use domain::{Bar, DataError, Position, PositionSide, TradeOutcome, TradeRecord};
pub use engine::{run_backtest, BacktestRun, EngineConfig, EngineError, InvariantViolation};
pub use strategy::{Action, ConfigError, MeanReversion, ParamSet, Strategy, StrategyParams};
