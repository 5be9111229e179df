use url::Url;

use crate::{validation, Error};

use super::{
    common::{HistoryWindow, Interval},
    HistoryQuery, Query,
};

/// Parameters of the per-exchange-pair history endpoints
/// (`openInterest/ohlc-history`, `fundingRate/ohlc-history`).
#[derive(Clone, Debug)]
pub struct OhlcHistoryQuery {
    pub exchange: String,
    /// Exchange pair, e.g. `BTCUSDT`.
    pub symbol: String,
    pub interval: Interval,
    pub window: HistoryWindow,
}

impl OhlcHistoryQuery {
    pub fn new(exchange: &str, symbol: &str, interval: Interval) -> Self {
        Self {
            exchange: exchange.to_string(),
            symbol: symbol.to_string(),
            interval,
            window: HistoryWindow::default(),
        }
    }

    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }
}

impl Query for OhlcHistoryQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("exchange", &self.exchange)
            .append_pair("symbol", &self.symbol)
            .append_pair("interval", self.interval.as_str());
        self.window.add_to_url(&url)
    }

    fn validate(&self) -> Result<(), Error> {
        validation::validate_exchange(&self.exchange)?;
        validation::validate_symbol(&self.symbol)?;
        self.window.validate()
    }
}

impl HistoryQuery for OhlcHistoryQuery {
    fn get_window(&mut self) -> &mut HistoryWindow {
        &mut self.window
    }
}

/// Parameters of the coin-level aggregated history endpoint
/// (`openInterest/ohlc-aggregated-history`).
#[derive(Clone, Debug)]
pub struct AggregatedOhlcQuery {
    /// Coin, e.g. `BTC`.
    pub symbol: String,
    pub interval: Interval,
    pub window: HistoryWindow,
}

impl AggregatedOhlcQuery {
    pub fn new(symbol: &str, interval: Interval) -> Self {
        Self {
            symbol: symbol.to_string(),
            interval,
            window: HistoryWindow::default(),
        }
    }
}

impl Query for AggregatedOhlcQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("symbol", &self.symbol)
            .append_pair("interval", self.interval.as_str());
        self.window.add_to_url(&url)
    }

    fn validate(&self) -> Result<(), Error> {
        validation::validate_symbol(&self.symbol)?;
        self.window.validate()
    }
}

impl HistoryQuery for AggregatedOhlcQuery {
    fn get_window(&mut self) -> &mut HistoryWindow {
        &mut self.window
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use crate::query::{HistoryQuery, Interval, OhlcHistoryQuery, Query};

    #[test]
    fn test_ohlc_history_query() {
        let url = Url::parse("https://example.com/openInterest/ohlc-history").unwrap();
        let url = OhlcHistoryQuery::new("Binance", "BTCUSDT", Interval::H1)
            .with_limit(10)
            .with_start_time(1_700_000_000)
            .with_end_time(1_700_003_600)
            .add_to_url(&url);

        assert_eq!(
            url.query(),
            Some("exchange=Binance&symbol=BTCUSDT&interval=1h&limit=10&startTime=1700000000&endTime=1700003600")
        );
    }

    #[test]
    fn test_ohlc_history_query_validation() {
        assert!(OhlcHistoryQuery::new("Binance", "BTCUSDT", Interval::H1)
            .validate()
            .is_ok());
        assert!(OhlcHistoryQuery::new("", "BTCUSDT", Interval::H1)
            .validate()
            .is_err());
        assert!(OhlcHistoryQuery::new("Binance", "BTCUSDT", Interval::H1)
            .with_start_time(10)
            .with_end_time(5)
            .validate()
            .is_err());
    }
}
