//! Domain types: bars, positions, trades.

pub mod bar;
pub mod position;
pub mod trade;

pub use bar::{validate_bars, Bar, DataError};
pub use position::{Position, PositionSide};
pub use trade::{TradeOutcome, TradeRecord};
