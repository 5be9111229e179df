use url::Url;

use crate::{validation, Error};

use super::{common::LiquidationRange, Query};

/// Parameters of `liquidation/map` and `liquidation/heatmap`.
#[derive(Clone, Debug)]
pub struct LiquidationQuery {
    pub exchange: String,
    /// Exchange pair, e.g. `BTCUSDT`.
    pub symbol: String,
    pub range: LiquidationRange,
}

impl LiquidationQuery {
    pub fn new(exchange: &str, symbol: &str) -> Self {
        Self {
            exchange: exchange.to_string(),
            symbol: symbol.to_string(),
            range: LiquidationRange::default(),
        }
    }

    pub fn with_range(mut self, range: LiquidationRange) -> Self {
        self.range = range;
        self
    }
}

impl Query for LiquidationQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("exchange", &self.exchange)
            .append_pair("symbol", &self.symbol)
            .append_pair("range", self.range.as_str());
        url
    }

    fn validate(&self) -> Result<(), Error> {
        validation::validate_exchange(&self.exchange)?;
        validation::validate_symbol(&self.symbol)
    }
}
