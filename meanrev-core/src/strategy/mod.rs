//! Strategy contract and concrete strategies.
//!
//! A strategy is a pure decision function over the current bar, indicator
//! values, and position state. It never touches the account or the bar
//! loop, so new strategies implement [`Strategy`] without changes to the
//! engine.

pub mod mean_reversion;
pub mod params;

pub use mean_reversion::MeanReversion;
pub use params::{ConfigError, ParamSet, StrategyParams};

use crate::domain::{Bar, Position, PositionSide};

/// What the strategy wants done on this bar. At most one action per bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Hold,
    Open {
        side: PositionSide,
        stop_price: f64,
        target_price: f64,
    },
    Close,
}

/// Everything a strategy may look at when deciding.
///
/// `zscore` and `adx` are `None` while their indicators are warming up.
#[derive(Debug)]
pub struct DecisionContext<'a> {
    pub bar: &'a Bar,
    pub zscore: Option<f64>,
    pub adx: Option<f64>,
    pub position: &'a Position,
}

/// The strategy seam: a pure function of the decision context.
pub trait Strategy {
    fn name(&self) -> &str;

    /// Number of closes the rolling window needs before signals fire.
    fn window_period(&self) -> usize;

    /// ADX period when the strategy wants the trend filter, else None.
    fn adx_period(&self) -> Option<usize>;

    fn decide(&self, ctx: &DecisionContext<'_>) -> Action;
}
