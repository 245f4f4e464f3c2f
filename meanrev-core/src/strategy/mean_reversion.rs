//! Mean-reversion strategy: enter on z-score extremes, exit on stop/target.

use super::params::{ConfigError, StrategyParams};
use super::{Action, DecisionContext, Strategy};
use crate::domain::{Position, PositionSide};

/// Z-score mean reversion with fixed stop/target distances.
///
/// Entries fire when the close deviates beyond `z_entry` sigmas from the
/// rolling mean — long below, short above — optionally gated on a weak
/// trend (ADX below `max_adx`). Exits are risk-bound: stop or target,
/// with ties closing. When `z_exit` is configured, a reversion of the
/// score toward the mean also closes the position.
#[derive(Debug, Clone)]
pub struct MeanReversion {
    params: StrategyParams,
}

impl MeanReversion {
    pub fn new(params: StrategyParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    fn decide_entry(&self, ctx: &DecisionContext<'_>) -> Action {
        let Some(z) = ctx.zscore else {
            return Action::Hold;
        };

        if self.params.adx_filter {
            // The filter gates entries only; an undefined ADX (its own
            // warm-up) counts as "condition not satisfied".
            match ctx.adx {
                Some(adx) if adx < self.params.max_adx => {}
                _ => return Action::Hold,
            }
        }

        let close = ctx.bar.close;
        if z < -self.params.z_entry {
            Action::Open {
                side: PositionSide::Long,
                stop_price: close - self.params.sl_distance,
                target_price: close + self.params.tp_distance,
            }
        } else if z > self.params.z_entry {
            Action::Open {
                side: PositionSide::Short,
                stop_price: close + self.params.sl_distance,
                target_price: close - self.params.tp_distance,
            }
        } else {
            Action::Hold
        }
    }

    fn decide_exit(
        &self,
        ctx: &DecisionContext<'_>,
        side: PositionSide,
        stop_price: f64,
        target_price: f64,
    ) -> Action {
        let close = ctx.bar.close;
        let hit = match side {
            PositionSide::Long => close <= stop_price || close >= target_price,
            PositionSide::Short => close >= stop_price || close <= target_price,
        };
        if hit {
            return Action::Close;
        }

        if let (Some(z_exit), Some(z)) = (self.params.z_exit, ctx.zscore) {
            if z.abs() <= z_exit {
                return Action::Close;
            }
        }

        Action::Hold
    }
}

impl Strategy for MeanReversion {
    fn name(&self) -> &str {
        "mean_reversion"
    }

    fn window_period(&self) -> usize {
        self.params.period
    }

    fn adx_period(&self) -> Option<usize> {
        self.params.adx_filter.then_some(self.params.adx_period)
    }

    fn decide(&self, ctx: &DecisionContext<'_>) -> Action {
        match ctx.position {
            Position::Flat => self.decide_entry(ctx),
            Position::Open {
                side,
                stop_price,
                target_price,
                ..
            } => self.decide_exit(ctx, *side, *stop_price, *target_price),
        }
    }
}
