//! Unofficial client for the Coinglass v3 futures market-data API.
//!
//! Every endpoint method returns normalized tables (see [`table`]) rather
//! than raw JSON.

mod client;
mod errors;
mod query;
pub mod response;
pub mod table;
pub mod types;
pub mod validation;
pub use self::client::Client;
pub use self::errors::Error;
pub use self::query::{
    AggregatedOhlcQuery, HistoryQuery, HistoryWindow, Interval, LiquidationQuery,
    LiquidationRange, OhlcHistoryQuery, Query, SymbolQuery,
};
pub use self::table::{Cell, CompositeKey, MultiKeyTable, Table, TimeUnit};
