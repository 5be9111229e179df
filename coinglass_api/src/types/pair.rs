//! Instrument listing types.

use serde::{Deserialize, Serialize};

/// One trading pair listed by an exchange, from `supported-exchange-pairs`.
///
/// Fields are optional: listings occasionally omit or null out an asset, and
/// one incomplete entry should not fail the whole listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExchangePair {
    /// Exchange-specific instrument identifier (e.g. `BTCUSDT`, `BTC-USDT-SWAP`).
    pub instrument_id: Option<String>,
    /// Base asset, e.g. `BTC`.
    pub base_asset: Option<String>,
    /// Quote asset, e.g. `USDT`.
    pub quote_asset: Option<String>,
}
