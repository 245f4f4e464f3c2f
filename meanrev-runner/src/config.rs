//! Serializable run/sweep configuration for the CLI.
//!
//! TOML layout:
//!
//! ```toml
//! [backtest]
//! initial_capital = 10000.0
//! stake = 10.0
//!
//! [strategy]
//! period = 20
//! z_entry = 1.5
//! sl_distance = 2.0
//! tp_distance = 4.0
//!
//! [sweep]
//! rank_by = "end_capital"
//! parallel = true
//!
//! [[sweep.param]]
//! name = "z_entry"
//! values = [1.0, 1.5, 2.0]
//! ```
//!
//! Grid parameters are an array of tables so their order — which fixes
//! enumeration and result-column order — survives the round trip.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use meanrev_core::engine::EngineConfig;
use meanrev_core::StrategyParams;

use crate::sweep::{ParamGrid, RankingKey};

/// Errors from parsing a config file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Complete configuration for a run or a sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub backtest: EngineConfig,
    pub strategy: StrategyParams,
    pub sweep: SweepSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepSection {
    pub rank_by: RankingKey,
    pub parallel: bool,
    pub param: Vec<GridParam>,
}

impl Default for SweepSection {
    fn default() -> Self {
        Self {
            rank_by: RankingKey::default(),
            parallel: true,
            param: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridParam {
    pub name: String,
    pub values: Vec<f64>,
}

impl SweepConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigFileError> {
        Ok(toml::from_str(input)?)
    }

    /// The configured grid, or the stock grid when none is given.
    pub fn grid(&self) -> ParamGrid {
        if self.sweep.param.is_empty() {
            return Self::default_grid();
        }
        self.sweep
            .param
            .iter()
            .fold(ParamGrid::new(), |grid, p| {
                grid.add(p.name.clone(), p.values.clone())
            })
    }

    /// The classic 3x2x2 grid over entry threshold and risk distances.
    pub fn default_grid() -> ParamGrid {
        ParamGrid::new()
            .add("z_entry", vec![1.0, 1.5, 2.0])
            .add("sl_distance", vec![1.0, 2.0])
            .add("tp_distance", vec![2.0, 4.0])
    }

    /// Deterministic content hash of this configuration.
    ///
    /// Two identical configs share an id and can share cached results.
    pub fn config_id(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => blake3::hash(json.as_bytes()).to_hex().to_string(),
            Err(_) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = SweepConfig::from_toml("").unwrap();
        assert_eq!(config.backtest.initial_capital, 10_000.0);
        assert_eq!(config.strategy.period, 20);
        assert_eq!(config.sweep.rank_by, RankingKey::EndCapital);
        assert!(config.sweep.parallel);
        assert_eq!(config.grid().size(), 12);
    }

    #[test]
    fn full_config_parses() {
        let toml_str = r#"
[backtest]
initial_capital = 25000.0
stake = 5.0

[strategy]
period = 10
z_entry = 2.0
sl_distance = 1.0
tp_distance = 3.0
adx_filter = true

[sweep]
rank_by = "winrate"
parallel = false

[[sweep.param]]
name = "z_entry"
values = [1.5, 2.0]

[[sweep.param]]
name = "tp_distance"
values = [2.0, 4.0, 6.0]
"#;
        let config = SweepConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.backtest.initial_capital, 25_000.0);
        assert_eq!(config.backtest.stake, 5.0);
        assert_eq!(config.strategy.period, 10);
        assert!(config.strategy.adx_filter);
        assert_eq!(config.sweep.rank_by, RankingKey::WinratePct);
        assert!(!config.sweep.parallel);

        let grid = config.grid();
        assert_eq!(grid.names(), vec!["z_entry", "tp_distance"]);
        assert_eq!(grid.size(), 6);
    }

    #[test]
    fn grid_order_follows_config_order() {
        let toml_str = r#"
[[sweep.param]]
name = "tp_distance"
values = [2.0]

[[sweep.param]]
name = "z_entry"
values = [1.5]
"#;
        let config = SweepConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.grid().names(), vec!["tp_distance", "z_entry"]);
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(SweepConfig::from_toml("[strategy\nperiod = 20").is_err());
    }

    #[test]
    fn config_id_deterministic_and_content_sensitive() {
        let a = SweepConfig::default();
        let mut b = SweepConfig::default();
        assert_eq!(a.config_id(), b.config_id());

        b.backtest.initial_capital = 20_000.0;
        assert_ne!(a.config_id(), b.config_id());
    }

    #[test]
    fn config_toml_roundtrip() {
        let config = SweepConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let deser = SweepConfig::from_toml(&serialized).unwrap();
        assert_eq!(config, deser);
    }
}
