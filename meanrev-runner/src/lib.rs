//! MeanRev Runner — backtest orchestration on top of `meanrev-core`.
//!
//! This crate provides:
//! - Bar loading from CSV with a seeded synthetic fallback
//! - Performance metrics (win rate, drawdown, end capital)
//! - Single-backtest runner with a content-addressed run id
//! - Cartesian grid sweep with rayon fan-out and deterministic ranking
//! - Result export (text table, CSV artifact, JSON round trip)

pub mod config;
pub mod data_loader;
pub mod export;
pub mod metrics;
pub mod result;
pub mod runner;
pub mod sweep;

pub use config::{ConfigFileError, GridParam, SweepConfig, SweepSection};
pub use data_loader::{
    compute_dataset_hash, load_csv_bars, synthetic_bars, DataSource, LoadError, LoadOptions,
    LoadedBars,
};
pub use export::{
    export_json, format_backtest_record, format_failures, format_results_table, import_json,
    results_to_csv, write_results_csv,
};
pub use result::{BacktestReport, RunResult, SCHEMA_VERSION};
pub use runner::{run_backtest_summary, run_single_backtest, FailureKind, RunError};
pub use sweep::{FailedCombination, ParamGrid, ParamSweep, RankingKey, SweepOutcome};
