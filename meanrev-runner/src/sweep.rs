//! Parameter sweep — Cartesian grid enumeration, parallel execution,
//! deterministic ranking.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use meanrev_core::domain::validate_bars;
use meanrev_core::engine::EngineConfig;
use meanrev_core::{Bar, ParamSet, StrategyParams};

use crate::result::RunResult;
use crate::runner::{run_backtest_summary, FailureKind, RunError};

/// Ordered named parameter ranges for grid search.
///
/// Enumeration is the full Cartesian product in lexicographic order over
/// the value tuples: the first-added parameter varies slowest, the last
/// varies fastest. The order in which ranges are added is the order of
/// the result table columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamGrid {
    ranges: Vec<(String, Vec<f64>)>,
}

impl ParamGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.ranges.push((name.into(), values));
        self
    }

    /// Parameter names in enumeration order.
    pub fn names(&self) -> Vec<String> {
        self.ranges.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Total number of combinations. A grid with no ranges has exactly
    /// one (empty) combination; a range with no candidates has zero.
    pub fn size(&self) -> usize {
        self.ranges.iter().map(|(_, values)| values.len()).product()
    }

    /// Decode combination `index` (lexicographic rank) into a ParamSet.
    pub fn combination(&self, index: usize) -> ParamSet {
        debug_assert!(index < self.size());
        let mut remainder = index;
        let mut picks = vec![0usize; self.ranges.len()];
        for (slot, (_, values)) in self.ranges.iter().enumerate().rev() {
            picks[slot] = remainder % values.len();
            remainder /= values.len();
        }
        self.ranges
            .iter()
            .zip(picks)
            .map(|((name, values), pick)| (name.clone(), values[pick]))
            .collect()
    }
}

/// Which metric the sweep ranks by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingKey {
    #[default]
    EndCapital,
    #[serde(rename = "winrate")]
    WinratePct,
    #[serde(rename = "drawdown")]
    MaxDrawdownPct,
    TotalTrades,
}

impl RankingKey {
    /// Extract the ranked metric from a run result.
    pub fn extract(&self, result: &RunResult) -> f64 {
        match self {
            RankingKey::EndCapital => result.end_capital,
            RankingKey::WinratePct => result.winrate_pct,
            RankingKey::MaxDrawdownPct => result.max_drawdown_pct,
            RankingKey::TotalTrades => result.total_trades as f64,
        }
    }

    /// Whether larger values rank first. Drawdown ranks smallest-first.
    pub fn is_higher_better(&self) -> bool {
        !matches!(self, RankingKey::MaxDrawdownPct)
    }
}

impl std::str::FromStr for RankingKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "end_capital" => Ok(RankingKey::EndCapital),
            "winrate" => Ok(RankingKey::WinratePct),
            "drawdown" => Ok(RankingKey::MaxDrawdownPct),
            "total_trades" => Ok(RankingKey::TotalTrades),
            other => Err(format!(
                "unknown ranking key '{other}' (expected end_capital, winrate, drawdown, or total_trades)"
            )),
        }
    }
}

/// A combination that failed, kept out of the ranking but reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedCombination {
    /// Enumeration index of the combination.
    pub index: usize,
    pub params: ParamSet,
    pub kind: FailureKind,
    pub message: String,
}

/// Everything a sweep produces: ranked successes and listed failures.
/// Every combination appears in exactly one of the two.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepOutcome {
    pub ranked: Vec<RunResult>,
    pub failures: Vec<FailedCombination>,
}

/// Parameter sweep executor.
#[derive(Debug, Clone)]
pub struct ParamSweep {
    base: StrategyParams,
    engine_config: EngineConfig,
    ranking: RankingKey,
    parallel: bool,
}

impl ParamSweep {
    pub fn new(base: StrategyParams, engine_config: EngineConfig) -> Self {
        Self {
            base,
            engine_config,
            ranking: RankingKey::default(),
            parallel: true,
        }
    }

    pub fn with_ranking(mut self, ranking: RankingKey) -> Self {
        self.ranking = ranking;
        self
    }

    /// Enables or disables parallel execution. The outcome is identical
    /// either way; parallelism only changes wall-clock time.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run every combination in the grid against the shared bar slice.
    ///
    /// Fails outright only when the bar sequence itself is invalid — no
    /// combination could succeed on it. Individual combination failures
    /// are recorded and the sweep continues.
    pub fn sweep(&self, bars: &[Bar], grid: &ParamGrid) -> Result<SweepOutcome, RunError> {
        validate_bars(bars).map_err(RunError::Data)?;

        let total = grid.size();
        let run_one = |index: usize| {
            let params = grid.combination(index);
            let outcome = run_backtest_summary(bars, &self.base, &params, &self.engine_config);
            (index, params, outcome)
        };

        let outcomes: Vec<_> = if self.parallel {
            (0..total).into_par_iter().map(run_one).collect()
        } else {
            (0..total).map(run_one).collect()
        };

        let mut ranked: Vec<(usize, RunResult)> = Vec::new();
        let mut failures: Vec<FailedCombination> = Vec::new();
        for (index, params, outcome) in outcomes {
            match outcome {
                Ok(result) => ranked.push((index, result)),
                Err(err) => failures.push(FailedCombination {
                    index,
                    params,
                    kind: err.kind(),
                    message: err.to_string(),
                }),
            }
        }

        // Rank by the configured key; break ties by enumeration index so
        // the order is total and independent of execution order.
        let key = self.ranking;
        ranked.sort_by(|(ia, a), (ib, b)| {
            let va = key.extract(a);
            let vb = key.extract(b);
            let ord = if key.is_higher_better() {
                vb.partial_cmp(&va)
            } else {
                va.partial_cmp(&vb)
            };
            ord.unwrap_or(std::cmp::Ordering::Equal).then(ia.cmp(ib))
        });
        failures.sort_by_key(|f| f.index);

        Ok(SweepOutcome {
            ranked: ranked.into_iter().map(|(_, result)| result).collect(),
            failures,
        })
    }
}
