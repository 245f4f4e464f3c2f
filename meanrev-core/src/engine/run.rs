//! The per-bar backtest loop.
//!
//! One deterministic pass: window update → indicator values → strategy
//! decision → account mutation → equity snapshot. Bar processing is
//! strictly sequential; step i depends on state mutated by step i-1.

use super::account::Account;
use super::state::{BacktestRun, EngineConfig};
use super::EngineError;
use crate::domain::{validate_bars, Bar};
use crate::indicators::{Adx, RollingWindow};
use crate::strategy::{Action, DecisionContext, Strategy};

/// Run one backtest over `bars` with the given strategy and config.
///
/// Validates the bar sequence, then walks it bar by bar. At most one
/// action is applied per bar, so a close is never followed by a same-bar
/// re-entry. Any position still open after the last bar is force-closed
/// at the final close price and recorded like any other trade.
pub fn run_backtest(
    bars: &[Bar],
    strategy: &dyn Strategy,
    config: &EngineConfig,
) -> Result<BacktestRun, EngineError> {
    validate_bars(bars)?;

    let adx_series = strategy
        .adx_period()
        .map(|period| Adx::new(period).compute(bars));

    let mut window = RollingWindow::new(strategy.window_period());
    let mut account = Account::new(config.initial_capital, config.stake);
    let mut equity_curve = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        window.push(bar.close);
        let zscore = window.zscore(bar.close);
        let adx = adx_series.as_ref().and_then(|series| {
            let value = series[i];
            value.is_finite().then_some(value)
        });

        let ctx = DecisionContext {
            bar,
            zscore,
            adx,
            position: account.position(),
        };

        match strategy.decide(&ctx) {
            Action::Hold => {}
            Action::Open {
                side,
                stop_price,
                target_price,
            } => account.open(side, bar.date, bar.close, stop_price, target_price)?,
            Action::Close => {
                account.close(bar.date, bar.close)?;
            }
        }

        equity_curve.push(account.equity(bar.close));
    }

    // Force-close any remaining position at the final bar's close so the
    // run ends with realized capital only.
    let last = &bars[bars.len() - 1];
    if !account.position().is_flat() {
        account.close(last.date, last.close)?;
        if let Some(equity) = equity_curve.last_mut() {
            *equity = account.equity(last.close);
        }
    }

    let final_equity = account.equity(last.close);
    let warmup_bars = strategy.window_period().saturating_sub(1).min(bars.len());

    Ok(BacktestRun {
        equity_curve,
        trades: account.into_trades(),
        final_equity,
        bar_count: bars.len(),
        warmup_bars,
    })
}
