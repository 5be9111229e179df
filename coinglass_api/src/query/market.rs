use url::Url;

use crate::{validation, Error};

use super::Query;

/// Single optional `symbol` filter, used by the exchange-list endpoints.
#[derive(Clone, Debug, Default)]
pub struct SymbolQuery {
    /// Coin, e.g. `BTC`. `None` asks for every coin where the endpoint allows it.
    pub symbol: Option<String>,
}

impl SymbolQuery {
    pub fn new(symbol: &str) -> Self {
        Self::default().with_symbol(symbol)
    }

    pub fn with_symbol(mut self, symbol: &str) -> Self {
        self.symbol = Some(symbol.to_string());
        self
    }
}

impl Query for SymbolQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        if let Some(symbol) = &self.symbol {
            url.query_pairs_mut().append_pair("symbol", symbol.as_str());
        };
        url
    }

    fn validate(&self) -> Result<(), Error> {
        match &self.symbol {
            Some(symbol) => validation::validate_symbol(symbol),
            None => Ok(()),
        }
    }
}
