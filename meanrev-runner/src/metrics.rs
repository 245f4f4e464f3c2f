//! Performance metrics — pure functions over the equity curve and trades.
//!
//! Every metric is a pure function: equity curve and/or trade list in,
//! scalar out. No dependencies on the runner or the engine loop.

use meanrev_core::TradeRecord;

/// Count of winning trades.
pub fn won(trades: &[TradeRecord]) -> usize {
    trades.iter().filter(|t| t.is_winner()).count()
}

/// Win rate in percent. Defined as 0 when there are no trades.
pub fn winrate_pct(trades: &[TradeRecord]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    won(trades) as f64 / trades.len() as f64 * 100.0
}

/// Maximum peak-to-trough drawdown in percent of the running peak.
///
/// The peak is a non-decreasing running maximum seeded with the initial
/// capital, so the result is in [0, 100] whenever capital is positive.
pub fn max_drawdown_pct(equity_curve: &[f64], initial_capital: f64) -> f64 {
    let mut peak = initial_capital;
    let mut max_dd = 0.0_f64;

    for &equity in equity_curve {
        if equity > peak {
            peak = equity;
        }
        if peak > 0.0 {
            let dd = (peak - equity) / peak * 100.0;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Final equity value, falling back to the initial capital for an empty
/// curve.
pub fn end_capital(equity_curve: &[f64], initial_capital: f64) -> f64 {
    equity_curve.last().copied().unwrap_or(initial_capital)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use meanrev_core::{PositionSide, TradeOutcome, TradeRecord};

    fn make_trade(pnl: f64) -> TradeRecord {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        TradeRecord {
            entry_date: date,
            exit_date: date,
            side: PositionSide::Long,
            entry_price: 100.0,
            exit_price: 100.0 + pnl / 10.0,
            size: 10.0,
            pnl,
            outcome: TradeOutcome::from_pnl(pnl),
        }
    }

    // ── Win rate ──

    #[test]
    fn winrate_all_winners() {
        let trades = vec![make_trade(50.0), make_trade(30.0)];
        assert!((winrate_pct(&trades) - 100.0).abs() < 1e-10);
    }

    #[test]
    fn winrate_mixed() {
        let trades = vec![
            make_trade(50.0),
            make_trade(-20.0),
            make_trade(30.0),
            make_trade(-10.0),
        ];
        assert!((winrate_pct(&trades) - 50.0).abs() < 1e-10);
        assert_eq!(won(&trades), 2);
    }

    #[test]
    fn winrate_breakeven_is_not_a_win() {
        let trades = vec![make_trade(0.0), make_trade(10.0)];
        assert_eq!(won(&trades), 1);
        assert!((winrate_pct(&trades) - 50.0).abs() < 1e-10);
    }

    #[test]
    fn winrate_empty_is_zero() {
        assert_eq!(winrate_pct(&[]), 0.0);
    }

    // ── Max drawdown ──

    #[test]
    fn drawdown_known_value() {
        let eq = vec![10_000.0, 11_000.0, 9_000.0, 9_500.0];
        // Peak 11k, trough 9k -> (11k-9k)/11k * 100
        let expected = 2_000.0 / 11_000.0 * 100.0;
        assert!((max_drawdown_pct(&eq, 10_000.0) - expected).abs() < 1e-10);
    }

    #[test]
    fn drawdown_seeded_with_initial_capital() {
        // The curve never reaches the starting capital: the whole dip
        // counts against the initial peak.
        let eq = vec![9_500.0, 9_800.0];
        let expected = 500.0 / 10_000.0 * 100.0;
        assert!((max_drawdown_pct(&eq, 10_000.0) - expected).abs() < 1e-10);
    }

    #[test]
    fn drawdown_monotonic_increase_is_zero() {
        let eq: Vec<f64> = (0..50).map(|i| 10_000.0 + i as f64 * 10.0).collect();
        assert_eq!(max_drawdown_pct(&eq, 10_000.0), 0.0);
    }

    #[test]
    fn drawdown_constant_is_zero() {
        let eq = vec![10_000.0; 50];
        assert_eq!(max_drawdown_pct(&eq, 10_000.0), 0.0);
    }

    #[test]
    fn drawdown_empty_is_zero() {
        assert_eq!(max_drawdown_pct(&[], 10_000.0), 0.0);
    }

    #[test]
    fn drawdown_bounded_by_100() {
        let eq = vec![10_000.0, 0.0];
        let dd = max_drawdown_pct(&eq, 10_000.0);
        assert!((0.0..=100.0).contains(&dd));
        assert!((dd - 100.0).abs() < 1e-10);
    }

    // ── End capital ──

    #[test]
    fn end_capital_last_point() {
        let eq = vec![10_000.0, 10_040.0, 9_990.0];
        assert_eq!(end_capital(&eq, 10_000.0), 9_990.0);
    }

    #[test]
    fn end_capital_empty_falls_back_to_initial() {
        assert_eq!(end_capital(&[], 10_000.0), 10_000.0);
    }
}
