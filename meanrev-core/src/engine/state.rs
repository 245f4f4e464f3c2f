//! Engine configuration and run output.

use crate::domain::TradeRecord;
use serde::{Deserialize, Serialize};

/// Configuration for a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub initial_capital: f64,
    /// Fixed position size in units per trade (constant stake).
    pub stake: f64,
}

impl EngineConfig {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            ..Self::default()
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_capital: 10_000.0,
            stake: 10.0,
        }
    }
}

/// Output of a complete backtest run: raw material for the metrics layer.
#[derive(Debug, Clone)]
pub struct BacktestRun {
    /// Equity (cash + unrealized pnl) at each bar close.
    pub equity_curve: Vec<f64>,
    /// Completed round-trip trades, in close order.
    pub trades: Vec<TradeRecord>,
    /// Final equity after the last bar (open positions force-closed).
    pub final_equity: f64,
    /// Total bars processed.
    pub bar_count: usize,
    /// Bars before the rolling window filled.
    pub warmup_bars: usize,
}
