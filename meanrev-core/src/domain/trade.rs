//! TradeRecord — a completed round-trip trade.

use super::position::PositionSide;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Classification of a closed trade by realized pnl sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeOutcome {
    Win,
    Loss,
    Breakeven,
}

impl TradeOutcome {
    pub fn from_pnl(pnl: f64) -> Self {
        if pnl > 0.0 {
            TradeOutcome::Win
        } else if pnl < 0.0 {
            TradeOutcome::Loss
        } else {
            TradeOutcome::Breakeven
        }
    }
}

/// A complete round-trip trade: entry → exit. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub side: PositionSide,
    pub entry_price: f64,
    pub exit_price: f64,
    pub size: f64,
    pub pnl: f64,
    pub outcome: TradeOutcome,
}

impl TradeRecord {
    pub fn is_winner(&self) -> bool {
        self.outcome == TradeOutcome::Win
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trade(pnl: f64) -> TradeRecord {
        TradeRecord {
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            exit_date: NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(),
            side: PositionSide::Long,
            entry_price: 100.0,
            exit_price: 100.0 + pnl / 10.0,
            size: 10.0,
            pnl,
            outcome: TradeOutcome::from_pnl(pnl),
        }
    }

    #[test]
    fn outcome_from_pnl_sign() {
        assert_eq!(TradeOutcome::from_pnl(0.5), TradeOutcome::Win);
        assert_eq!(TradeOutcome::from_pnl(-0.5), TradeOutcome::Loss);
        assert_eq!(TradeOutcome::from_pnl(0.0), TradeOutcome::Breakeven);
    }

    #[test]
    fn is_winner() {
        assert!(sample_trade(50.0).is_winner());
        assert!(!sample_trade(-50.0).is_winner());
        assert!(!sample_trade(0.0).is_winner());
    }

    #[test]
    fn trade_serialization_roundtrip() {
        let trade = sample_trade(35.0);
        let json = serde_json::to_string(&trade).unwrap();
        let deser: TradeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(trade, deser);
    }
}
