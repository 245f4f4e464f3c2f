//! Backtest runner — wires together strategy, engine, and metrics.
//!
//! Two entry points:
//! - `run_backtest_summary()`: lightweight summary only. Used by the sweep.
//! - `run_single_backtest()`: full report with trade tape, equity curve,
//!   and a content-addressed run id. Used by the CLI.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use meanrev_core::engine::{run_backtest, EngineConfig, EngineError};
use meanrev_core::{
    Bar, ConfigError, DataError, InvariantViolation, MeanReversion, ParamSet, StrategyParams,
};

use crate::metrics;
use crate::result::{BacktestReport, RunResult, SCHEMA_VERSION};

/// Failure of a single run or sweep combination.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),
}

impl From<EngineError> for RunError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Data(e) => RunError::Data(e),
            EngineError::Invariant(e) => RunError::Invariant(e),
        }
    }
}

/// Coarse error classification for failure listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    Config,
    Data,
    Invariant,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Config => write!(f, "config"),
            FailureKind::Data => write!(f, "data"),
            FailureKind::Invariant => write!(f, "invariant"),
        }
    }
}

impl RunError {
    pub fn kind(&self) -> FailureKind {
        match self {
            RunError::Config(_) => FailureKind::Config,
            RunError::Data(_) => FailureKind::Data,
            RunError::Invariant(_) => FailureKind::Invariant,
        }
    }
}

/// Run one backtest and return the summary record.
///
/// `overrides` are applied on top of `base`; the combination is validated
/// before the bar loop starts.
pub fn run_backtest_summary(
    bars: &[Bar],
    base: &StrategyParams,
    overrides: &ParamSet,
    engine_config: &EngineConfig,
) -> Result<RunResult, RunError> {
    let params = base.with_overrides(overrides)?;
    let strategy = MeanReversion::new(params)?;
    let run = run_backtest(bars, &strategy, engine_config)?;

    Ok(RunResult {
        params: overrides.clone(),
        total_trades: run.trades.len(),
        won: metrics::won(&run.trades),
        winrate_pct: metrics::winrate_pct(&run.trades),
        max_drawdown_pct: metrics::max_drawdown_pct(
            &run.equity_curve,
            engine_config.initial_capital,
        ),
        end_capital: metrics::end_capital(&run.equity_curve, engine_config.initial_capital),
    })
}

/// Run one backtest and return the full report artifact.
pub fn run_single_backtest(
    bars: &[Bar],
    base: &StrategyParams,
    overrides: &ParamSet,
    engine_config: &EngineConfig,
    dataset_hash: &str,
) -> Result<BacktestReport, RunError> {
    let params = base.with_overrides(overrides)?;
    let strategy = MeanReversion::new(params.clone())?;
    let run = run_backtest(bars, &strategy, engine_config)?;

    let summary = RunResult {
        params: overrides.clone(),
        total_trades: run.trades.len(),
        won: metrics::won(&run.trades),
        winrate_pct: metrics::winrate_pct(&run.trades),
        max_drawdown_pct: metrics::max_drawdown_pct(
            &run.equity_curve,
            engine_config.initial_capital,
        ),
        end_capital: metrics::end_capital(&run.equity_curve, engine_config.initial_capital),
    };

    Ok(BacktestReport {
        schema_version: SCHEMA_VERSION,
        run_id: compute_run_id(&params, engine_config, dataset_hash),
        summary,
        trades: run.trades,
        equity_curve: run.equity_curve,
        bar_count: run.bar_count,
        warmup_bars: run.warmup_bars,
        initial_capital: engine_config.initial_capital,
        dataset_hash: dataset_hash.to_string(),
    })
}

/// Deterministic content hash of (resolved params, engine config, data).
///
/// Two runs with identical inputs share a run id, making results
/// identifiable as identical across sweeps and sessions.
pub fn compute_run_id(
    params: &StrategyParams,
    engine_config: &EngineConfig,
    dataset_hash: &str,
) -> String {
    let mut hasher = blake3::Hasher::new();
    // BTreeMap-free structs with a stable field order serialize
    // deterministically.
    if let Ok(json) = serde_json::to_string(params) {
        hasher.update(json.as_bytes());
    }
    if let Ok(json) = serde_json::to_string(engine_config) {
        hasher.update(json.as_bytes());
    }
    hasher.update(dataset_hash.as_bytes());
    hasher.finalize().to_hex().to_string()
}
