//! HTTP client for the Coinglass v3 futures API.

use std::time::Duration;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::{
    query::{AggregatedOhlcQuery, LiquidationQuery, OhlcHistoryQuery, Query, SymbolQuery},
    response,
    table::{self, Cell, MultiKeyTable, Table, TimeUnit},
    types::ExchangePair,
    Error,
};

/// Request timeout for Coinglass API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying the API key.
const API_KEY_HEADER: &str = "CG-API-KEY";

/// Column of a coin listing that arrives as bare symbols.
const COIN_COLUMN: &str = "symbol";

/// Raw time field of the OHLC history endpoints.
const OHLC_TIME_FIELD: &str = "t";

/// HTTP client for the Coinglass v3 futures API.
///
/// Holds a pooled `reqwest::Client`; each endpoint method performs exactly
/// one request and one reshape of the response. Nothing is retried: callers
/// that hit [`Error::RateLimited`] should back off and call again.
pub struct Client {
    client: reqwest::Client,
    api_key: String,
    /// Base URL for the API. Defaults to `https://open-api-v3.coinglass.com/api/futures/`.
    base_api_url: String,
}

impl Client {
    /// Creates a new client pointing at the production Coinglass API.
    pub fn new(api_key: &str) -> Result<Self, Error> {
        Self::with_base_url("https://open-api-v3.coinglass.com/api/futures/", api_key)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str, api_key: &str) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        let mut base_api_url = base_url.to_string();
        if !base_api_url.ends_with('/') {
            base_api_url.push('/');
        }
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_api_url,
        })
    }

    fn get_url(&self, endpoint: &str, query: Option<&impl Query>) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", &self.base_api_url, endpoint).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })?;
        Ok(match query {
            Some(query) => query.add_to_url(&url),
            None => url,
        })
    }

    /// Validates the query, sends the request and returns the parsed body.
    async fn get<Q>(&self, endpoint: &str, query: Option<&Q>) -> Result<Value, Error>
    where
        Q: Query,
    {
        if let Some(query) = query {
            query.validate()?;
        }
        let url = self.get_url(endpoint, query)?;
        tracing::debug!("GET {}", url);

        let resp = self
            .client
            .get(url)
            .header("accept", "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        // The API reports its own failures inside a JSON envelope, whatever
        // the HTTP status; only bodies that are not JSON fail here.
        match serde_json::from_str::<Value>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) if !status.is_success() => {
                let snippet = truncate_body(&body);
                tracing::error!("Request failed with status {}: {} ({})", status, snippet, e);
                Err(Error::HttpStatus {
                    status: status.as_u16(),
                    body: snippet,
                })
            }
            Err(e) => {
                let snippet = truncate_body(&body);
                tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
                Err(Error::RequestFailed)
            }
        }
    }

    /// Sends the request and returns the checked `data` payload.
    async fn get_data<Q>(&self, endpoint: &str, query: Option<&Q>) -> Result<Value, Error>
    where
        Q: Query,
    {
        let response = self.get(endpoint, query).await?;
        response::check(response)
    }

    /// Lists the coins the futures API covers.
    ///
    /// The listing comes either as bare symbols, which land in a single
    /// `symbol` column, or as flat records, which become one column per key.
    pub async fn supported_coins(&self) -> Result<Table, Error> {
        let data = self.get_data::<SymbolQuery>("supported-coins", None).await?;
        let table = coin_table(&data)?;
        tracing::debug!("supported coins: {} rows", table.len());
        Ok(table)
    }

    /// Lists the trading pairs of each exchange, keyed by exchange name in
    /// the order the API returns them.
    pub async fn supported_exchange_pairs(
        &self,
    ) -> Result<IndexMap<String, Vec<ExchangePair>>, Error> {
        let data = self
            .get_data::<SymbolQuery>("supported-exchange-pairs", None)
            .await?;
        IndexMap::<String, Vec<ExchangePair>>::deserialize(&data)
            .map_err(|e| Error::MalformedPayload(format!("supported exchange pairs: {}", e)))
    }

    /// Open interest OHLC candles of one exchange pair, indexed by time.
    pub async fn ohlc_history(&self, query: &OhlcHistoryQuery) -> Result<Table, Error> {
        let data = self
            .get_data("openInterest/ohlc-history", Some(query))
            .await?;
        ohlc_table(&data, "open interest OHLC history")
    }

    /// Open interest OHLC candles aggregated over all exchanges for a coin.
    pub async fn ohlc_aggregated_history(
        &self,
        query: &AggregatedOhlcQuery,
    ) -> Result<Table, Error> {
        let data = self
            .get_data("openInterest/ohlc-aggregated-history", Some(query))
            .await?;
        ohlc_table(&data, "aggregated open interest OHLC history")
    }

    /// Funding rate OHLC candles of one exchange pair, indexed by time.
    pub async fn funding_rate_ohlc_history(
        &self,
        query: &OhlcHistoryQuery,
    ) -> Result<Table, Error> {
        let data = self
            .get_data("fundingRate/ohlc-history", Some(query))
            .await?;
        ohlc_table(&data, "funding rate OHLC history")
    }

    /// Current open interest of a coin, one row per exchange.
    pub async fn open_interest_exchange_list(&self, symbol: &str) -> Result<Table, Error> {
        let query = SymbolQuery::new(symbol);
        let data = self
            .get_data("openInterest/exchange-list", Some(&query))
            .await?;
        let table = table::to_table(
            table::as_records(&data, "open interest exchange list")?,
            None,
            TimeUnit::Auto,
            false,
        )?;
        tracing::debug!("open interest exchange list: {} rows", table.len());
        Ok(table)
    }

    /// Current funding rates, one column per coin and one row per
    /// (margin type, exchange, metric).
    pub async fn funding_rate_exchange_list(
        &self,
        query: &SymbolQuery,
    ) -> Result<MultiKeyTable, Error> {
        let data = self
            .get_data("fundingRate/exchange-list", Some(query))
            .await?;
        let table = table::to_multi_key_table(
            table::as_records(&data, "funding rate exchange list")?,
            "symbol",
        )?;
        tracing::debug!(
            "funding rate exchange list: {} keys x {} coins",
            table.row_count(),
            table.column_count()
        );
        Ok(table)
    }

    /// Liquidation levels of one exchange pair plus the last traded price.
    ///
    /// Columns are `liqprice, liqusd, leverage, none`.
    pub async fn liquidation_map(&self, query: &LiquidationQuery) -> Result<(Table, f64), Error> {
        let data = self.get_data("liquidation/map", Some(query)).await?;
        let (table, last_price) = table::to_liquidation_table(&data)?;
        tracing::debug!("liquidation map: {} rows, last price {}", table.len(), last_price);
        Ok((table, last_price))
    }

    /// Liquidation heatmap of one exchange pair.
    ///
    /// Returns the liquidations (`time, price, liqusd`, indexed by time) and
    /// the price ticks (`t, o, h, l, c, reserved`) the heatmap is drawn over.
    pub async fn liquidation_heatmap(
        &self,
        query: &LiquidationQuery,
    ) -> Result<(Table, Table), Error> {
        let data = self.get_data("liquidation/heatmap", Some(query)).await?;
        let (liquidations, prices) = table::to_heatmap_tables(&data)?;
        tracing::debug!(
            "liquidation heatmap: {} liquidations over {} ticks",
            liquidations.len(),
            prices.len()
        );
        Ok((liquidations, prices))
    }
}

fn coin_table(data: &Value) -> Result<Table, Error> {
    let records = table::as_records(data, "supported coins")?;
    if !records.iter().all(Value::is_string) {
        return table::to_table(records, None, TimeUnit::Auto, false);
    }
    let rows = records.iter().map(|r| vec![Cell::from(r)]).collect();
    Ok(Table::from_parts(vec![COIN_COLUMN.to_string()], rows, false))
}

fn ohlc_table(data: &Value, what: &str) -> Result<Table, Error> {
    let table = table::to_table(
        table::as_records(data, what)?,
        Some(OHLC_TIME_FIELD),
        TimeUnit::Auto,
        true,
    )?;
    tracing::debug!("{}: {} rows", what, table.len());
    Ok(table)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
