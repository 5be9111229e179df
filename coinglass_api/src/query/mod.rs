mod common;
pub use self::common::{HistoryQuery, HistoryWindow, Interval, LiquidationRange, Query};
mod ohlc;
pub use self::ohlc::{AggregatedOhlcQuery, OhlcHistoryQuery};

mod liquidation;
pub use self::liquidation::LiquidationQuery;

mod market;
pub use self::market::SymbolQuery;
