//! CLI subcommand implementations.

pub mod exchanges;
pub mod liquidation;
pub mod markets;
pub mod ohlc;
