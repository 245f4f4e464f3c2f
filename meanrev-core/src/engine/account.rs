//! Account — position and risk manager for one run.
//!
//! Owns the live position, the cash balance, and the trade tape. Opening
//! while positioned or closing while flat is a strategy defect, surfaced
//! as [`InvariantViolation`] and fatal to the run.

use crate::domain::{Position, PositionSide, TradeOutcome, TradeRecord};
use chrono::NaiveDate;
use thiserror::Error;

/// Position state machine violation — a strategy bug, never recovered.
#[derive(Debug, Error)]
pub enum InvariantViolation {
    #[error("attempted to open a position while already positioned ({date})")]
    OpenWhilePositioned { date: NaiveDate },

    #[error("attempted to close a position while flat ({date})")]
    CloseWhileFlat { date: NaiveDate },
}

#[derive(Debug, Clone)]
pub struct Account {
    cash: f64,
    stake: f64,
    position: Position,
    trades: Vec<TradeRecord>,
}

impl Account {
    pub fn new(initial_capital: f64, stake: f64) -> Self {
        Self {
            cash: initial_capital,
            stake,
            position: Position::Flat,
            trades: Vec::new(),
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    /// Current equity: cash plus unrealized pnl of any open position.
    pub fn equity(&self, price: f64) -> f64 {
        self.cash + self.position.unrealized_pnl(price)
    }

    /// Open a fixed-stake position at `price`.
    pub fn open(
        &mut self,
        side: PositionSide,
        date: NaiveDate,
        price: f64,
        stop_price: f64,
        target_price: f64,
    ) -> Result<(), InvariantViolation> {
        if !self.position.is_flat() {
            return Err(InvariantViolation::OpenWhilePositioned { date });
        }
        self.position = Position::Open {
            side,
            entry_date: date,
            entry_price: price,
            size: self.stake,
            stop_price,
            target_price,
        };
        Ok(())
    }

    /// Close the open position at `price`, realize pnl, emit a trade.
    pub fn close(&mut self, date: NaiveDate, price: f64) -> Result<TradeRecord, InvariantViolation> {
        let Position::Open {
            side,
            entry_date,
            entry_price,
            size,
            ..
        } = self.position
        else {
            return Err(InvariantViolation::CloseWhileFlat { date });
        };

        let pnl = (price - entry_price) * size * side.sign();
        self.cash += pnl;
        self.position = Position::Flat;
        let record = TradeRecord {
            entry_date,
            exit_date: date,
            side,
            entry_price,
            exit_price: price,
            size,
            pnl,
            outcome: TradeOutcome::from_pnl(pnl),
        };
        self.trades.push(record.clone());
        Ok(record)
    }

    pub fn into_trades(self) -> Vec<TradeRecord> {
        self.trades
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn open_then_close_long_realizes_pnl() {
        let mut account = Account::new(10_000.0, 10.0);
        account
            .open(PositionSide::Long, date(2), 100.0, 98.0, 104.0)
            .unwrap();
        assert!(!account.position().is_flat());
        assert_eq!(account.cash(), 10_000.0);

        let trade = account.close(date(5), 104.0).unwrap();
        assert_eq!(trade.pnl, 40.0);
        assert_eq!(trade.outcome, TradeOutcome::Win);
        assert_eq!(account.cash(), 10_040.0);
        assert!(account.position().is_flat());
    }

    #[test]
    fn short_pnl_is_inverted() {
        let mut account = Account::new(10_000.0, 10.0);
        account
            .open(PositionSide::Short, date(2), 100.0, 102.0, 96.0)
            .unwrap();
        let trade = account.close(date(3), 96.0).unwrap();
        assert_eq!(trade.pnl, 40.0);
        assert_eq!(account.cash(), 10_040.0);
    }

    #[test]
    fn breakeven_trade_outcome() {
        let mut account = Account::new(10_000.0, 10.0);
        account
            .open(PositionSide::Long, date(2), 100.0, 98.0, 104.0)
            .unwrap();
        let trade = account.close(date(3), 100.0).unwrap();
        assert_eq!(trade.outcome, TradeOutcome::Breakeven);
        assert_eq!(account.cash(), 10_000.0);
    }

    #[test]
    fn equity_includes_unrealized_pnl() {
        let mut account = Account::new(10_000.0, 10.0);
        assert_eq!(account.equity(123.0), 10_000.0);

        account
            .open(PositionSide::Long, date(2), 100.0, 98.0, 104.0)
            .unwrap();
        assert_eq!(account.equity(103.0), 10_030.0);
        assert_eq!(account.equity(97.0), 9_970.0);
    }

    #[test]
    fn double_open_is_invariant_violation() {
        let mut account = Account::new(10_000.0, 10.0);
        account
            .open(PositionSide::Long, date(2), 100.0, 98.0, 104.0)
            .unwrap();
        let err = account
            .open(PositionSide::Short, date(3), 101.0, 103.0, 97.0)
            .unwrap_err();
        assert!(matches!(err, InvariantViolation::OpenWhilePositioned { .. }));
    }

    #[test]
    fn close_while_flat_is_invariant_violation() {
        let mut account = Account::new(10_000.0, 10.0);
        let err = account.close(date(2), 100.0).unwrap_err();
        assert!(matches!(err, InvariantViolation::CloseWhileFlat { .. }));
    }

    #[test]
    fn trades_accumulate_in_order() {
        let mut account = Account::new(10_000.0, 10.0);
        account
            .open(PositionSide::Long, date(2), 100.0, 98.0, 104.0)
            .unwrap();
        account.close(date(3), 104.0).unwrap();
        account
            .open(PositionSide::Short, date(4), 104.0, 106.0, 100.0)
            .unwrap();
        account.close(date(5), 106.0).unwrap();

        let trades = account.into_trades();
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].outcome, TradeOutcome::Win);
        assert_eq!(trades[1].outcome, TradeOutcome::Loss);
        assert!(trades[0].exit_date <= trades[1].entry_date);
    }
}
