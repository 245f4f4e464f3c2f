//! Result records produced by single runs and sweeps.

use meanrev_core::{ParamSet, TradeRecord};
use serde::{Deserialize, Serialize};

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Summary of one backtest run. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// The swept parameter overrides this run was evaluated with.
    pub params: ParamSet,
    pub total_trades: usize,
    pub won: usize,
    pub winrate_pct: f64,
    pub max_drawdown_pct: f64,
    pub end_capital: f64,
}

/// Full artifact for a single run: summary plus the trade tape and
/// equity curve, with a content-addressed run id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: String,
    pub summary: RunResult,
    pub trades: Vec<TradeRecord>,
    pub equity_curve: Vec<f64>,
    pub bar_count: usize,
    pub warmup_bars: usize,
    pub initial_capital: f64,
    pub dataset_hash: String,
}

/// Default schema version for deserializing older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> RunResult {
        RunResult {
            params: ParamSet::new().set("z_entry", 1.5),
            total_trades: 4,
            won: 2,
            winrate_pct: 50.0,
            max_drawdown_pct: 1.25,
            end_capital: 10_040.0,
        }
    }

    #[test]
    fn run_result_serialization_roundtrip() {
        let result = sample_result();
        let json = serde_json::to_string(&result).unwrap();
        let deser: RunResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, deser);
    }

    #[test]
    fn report_defaults_schema_version() {
        let report = BacktestReport {
            schema_version: SCHEMA_VERSION,
            run_id: "abc".into(),
            summary: sample_result(),
            trades: vec![],
            equity_curve: vec![10_000.0],
            bar_count: 1,
            warmup_bars: 0,
            initial_capital: 10_000.0,
            dataset_hash: "d41d8".into(),
        };
        let mut json: serde_json::Value = serde_json::to_value(&report).unwrap();
        json.as_object_mut().unwrap().remove("schema_version");
        let deser: BacktestReport = serde_json::from_value(json).unwrap();
        assert_eq!(deser.schema_version, SCHEMA_VERSION);
    }
}
