//! Position state for a single-instrument, fixed-stake engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    /// +1.0 for long, -1.0 for short. Multiplies price moves into pnl.
    pub fn sign(&self) -> f64 {
        match self {
            PositionSide::Long => 1.0,
            PositionSide::Short => -1.0,
        }
    }
}

/// The live position of one backtest run.
///
/// Encoded as an enum so that "flat has no entry/stop/target" holds by
/// construction, and a position can never be long and short at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    Flat,
    Open {
        side: PositionSide,
        entry_date: NaiveDate,
        entry_price: f64,
        size: f64,
        stop_price: f64,
        target_price: f64,
    },
}

impl Position {
    pub fn is_flat(&self) -> bool {
        matches!(self, Position::Flat)
    }

    pub fn side(&self) -> Option<PositionSide> {
        match self {
            Position::Flat => None,
            Position::Open { side, .. } => Some(*side),
        }
    }

    /// Unrealized pnl at the given price. Zero when flat.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        match self {
            Position::Flat => 0.0,
            Position::Open {
                side,
                entry_price,
                size,
                ..
            } => (price - entry_price) * size * side.sign(),
        }
    }
}
