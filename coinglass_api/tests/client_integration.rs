use coinglass_api::{
    AggregatedOhlcQuery, Cell, Client, CompositeKey, Error, HistoryQuery, Interval, LiquidationQuery,
    LiquidationRange, OhlcHistoryQuery, SymbolQuery,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

async fn mount_fixture(server: &MockServer, endpoint: &str, fixture: &str) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .and(header("CG-API-KEY", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture(fixture)))
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> Client {
    Client::with_base_url(&server.uri(), API_KEY).unwrap()
}

#[tokio::test]
async fn supported_coins_success() {
    let mock_server = MockServer::start().await;
    mount_fixture(&mock_server, "/supported-coins", "supported_coins.json").await;

    let coins = client(&mock_server).supported_coins().await.unwrap();
    assert_eq!(coins.columns(), ["symbol"]);
    let symbols: Vec<&str> = coins
        .column("symbol")
        .unwrap()
        .into_iter()
        .filter_map(Cell::as_str)
        .collect();
    assert_eq!(symbols, ["BTC", "ETH", "SOL", "XRP"]);
}

#[tokio::test]
async fn supported_coins_as_records() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/supported-coins"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"success": true, "code": "0", "data": [{"symbol": "BTC"}, {"symbol": "ETH"}]}"#,
        ))
        .mount(&mock_server)
        .await;

    let coins = client(&mock_server).supported_coins().await.unwrap();
    assert_eq!(coins.columns(), ["symbol"]);
    assert_eq!(coins.len(), 2);
    assert_eq!(coins.get(1, "symbol").and_then(Cell::as_str), Some("ETH"));
}

#[tokio::test]
async fn supported_exchange_pairs_keep_exchange_order() {
    let mock_server = MockServer::start().await;
    mount_fixture(&mock_server, "/supported-exchange-pairs", "exchange_pairs.json").await;

    let pairs = client(&mock_server).supported_exchange_pairs().await.unwrap();
    assert_eq!(pairs.keys().collect::<Vec<_>>(), ["Binance", "OKX"]);
    assert_eq!(pairs["Binance"].len(), 2);
    assert_eq!(pairs["OKX"][0].instrument_id.as_deref(), Some("BTC-USDT-SWAP"));
    // an entry with a null quote asset does not fail the listing
    assert_eq!(pairs["OKX"][1].quote_asset, None);
    assert_eq!(pairs["OKX"][1].base_asset.as_deref(), Some("ETH"));
}

#[tokio::test]
async fn ohlc_history_sends_params_and_indexes_by_time() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/openInterest/ohlc-history"))
        .and(query_param("exchange", "Binance"))
        .and(query_param("symbol", "BTCUSDT"))
        .and(query_param("interval", "1h"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("oi_ohlc.json")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let query = OhlcHistoryQuery::new("Binance", "BTCUSDT", Interval::H1).with_limit(3);
    let table = client(&mock_server).ohlc_history(&query).await.unwrap();

    assert_eq!(table.columns(), ["time", "o", "h", "l", "c"]);
    assert_eq!(table.key(), Some("time"));
    assert_eq!(table.len(), 3);
    let times: Vec<i64> = table
        .time_index()
        .unwrap()
        .iter()
        .map(|t| t.timestamp())
        .collect();
    assert_eq!(times, [1_700_000_000, 1_700_003_600, 1_700_007_200]);
    // string prices are cast to numbers
    assert_eq!(table.get(0, "o"), Some(&Cell::Number(31250.5)));
    assert_eq!(table.get(1, "h"), Some(&Cell::Number(31420.75)));
}

#[tokio::test]
async fn aggregated_history_sends_no_exchange() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/openInterest/ohlc-aggregated-history"))
        .and(query_param("symbol", "BTC"))
        .and(query_param("interval", "4h"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("oi_ohlc.json")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let query = AggregatedOhlcQuery::new("BTC", Interval::H4);
    let table = client(&mock_server)
        .ohlc_aggregated_history(&query)
        .await
        .unwrap();
    assert_eq!(table.key(), Some("time"));
    assert_eq!(table.get(2, "c"), Some(&Cell::Number(31150.0)));
}

#[tokio::test]
async fn funding_rate_ohlc_history_uses_its_own_endpoint() {
    let mock_server = MockServer::start().await;
    mount_fixture(&mock_server, "/fundingRate/ohlc-history", "oi_ohlc.json").await;

    let query = OhlcHistoryQuery::new("Binance", "BTCUSDT", Interval::H8);
    let table = client(&mock_server)
        .funding_rate_ohlc_history(&query)
        .await
        .unwrap();
    assert_eq!(table.len(), 3);
}

#[tokio::test]
async fn open_interest_exchange_list_fills_missing_with_null() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/openInterest/exchange-list"))
        .and(query_param("symbol", "BTC"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("oi_exchange_list.json")),
        )
        .mount(&mock_server)
        .await;

    let table = client(&mock_server)
        .open_interest_exchange_list("BTC")
        .await
        .unwrap();
    assert_eq!(table.key(), None);
    assert_eq!(
        table.columns(),
        [
            "exchange",
            "symbol",
            "openInterest",
            "openInterestByCoin",
            "openInterestChangePercent24h"
        ]
    );
    assert_eq!(table.get(2, "openInterestChangePercent24h"), Some(&Cell::Null));
    assert_eq!(table.get(1, "exchange").and_then(Cell::as_str), Some("Binance"));
}

#[tokio::test]
async fn funding_rate_exchange_list_builds_composite_keys() {
    let mock_server = MockServer::start().await;
    mount_fixture(&mock_server, "/fundingRate/exchange-list", "funding_exchange_list.json").await;

    let table = client(&mock_server)
        .funding_rate_exchange_list(&SymbolQuery::default())
        .await
        .unwrap();
    assert_eq!(table.groups().collect::<Vec<_>>(), ["BTC", "ETH"]);
    assert_eq!(table.row_count(), 6);
    assert_eq!(
        table.get("ETH", &CompositeKey::new("uMarginList", "Binance", "rate")),
        Some(&Cell::Number(0.012))
    );
    assert_eq!(
        table.get("ETH", &CompositeKey::new("uMarginList", "OKX", "rate")),
        None
    );
}

#[tokio::test]
async fn liquidation_map_success() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/liquidation/map"))
        .and(query_param("range", "3d"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("liquidation_map.json")),
        )
        .mount(&mock_server)
        .await;

    let query = LiquidationQuery::new("Binance", "BTCUSDT").with_range(LiquidationRange::D3);
    let (table, last_price) = client(&mock_server).liquidation_map(&query).await.unwrap();

    assert_eq!(last_price, 37000.5);
    assert_eq!(table.columns(), ["liqprice", "liqusd", "leverage", "none"]);
    assert_eq!(table.len(), 3);
    assert_eq!(table.get(2, "liqprice"), Some(&Cell::Number(37480.7)));
    assert_eq!(table.get(0, "none"), Some(&Cell::Null));
}

#[tokio::test]
async fn liquidation_heatmap_success() {
    let mock_server = MockServer::start().await;
    mount_fixture(&mock_server, "/liquidation/heatmap", "liquidation_heatmap.json").await;

    let query = LiquidationQuery::new("Binance", "BTCUSDT");
    let (liquidations, prices) = client(&mock_server)
        .liquidation_heatmap(&query)
        .await
        .unwrap();

    assert_eq!(liquidations.columns(), ["time", "price", "liqusd"]);
    assert_eq!(liquidations.len(), 3);
    let times: Vec<i64> = liquidations
        .time_index()
        .unwrap()
        .iter()
        .map(|t| t.timestamp())
        .collect();
    assert_eq!(times, [1_700_000_000, 1_700_003_600, 1_700_003_600]);
    assert_eq!(liquidations.get(1, "price"), Some(&Cell::Number(37500.0)));
    assert_eq!(prices.columns(), ["t", "o", "h", "l", "c", "reserved"]);
    assert_eq!(prices.len(), 2);
}

#[tokio::test]
async fn rate_limit_is_reported() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/supported-coins"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"code": "50001", "msg": "Too Many Requests", "success": false}"#,
        ))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).supported_coins().await.unwrap_err();
    assert!(matches!(err, Error::RateLimited));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn api_failure_carries_code_and_message() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/liquidation/map"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"code": "40001", "msg": "Upgrade plan", "success": false}"#,
        ))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .liquidation_map(&LiquidationQuery::new("Binance", "BTCUSDT"))
        .await
        .unwrap_err();
    match err {
        Error::Request { code, msg } => {
            assert_eq!(code, "40001");
            assert_eq!(msg, "Upgrade plan");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn success_without_data_is_no_data() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/supported-coins"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"code": "0", "success": true}"#),
        )
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).supported_coins().await.unwrap_err();
    assert!(matches!(err, Error::NoData));
}

#[tokio::test]
async fn json_error_without_envelope_is_communication_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/supported-coins"))
        .respond_with(ResponseTemplate::new(401).set_body_string(
            r#"{"status": 401, "error": "Unauthorized"}"#,
        ))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).supported_coins().await.unwrap_err();
    match err {
        Error::Communication { status, error } => {
            assert_eq!(status, "401");
            assert_eq!(error, "Unauthorized");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn server_error_with_plain_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/supported-coins"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).supported_coins().await.unwrap_err();
    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 502);
            assert_eq!(body, "Bad Gateway");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_json_on_success_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/supported-coins"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).supported_coins().await.unwrap_err();
    assert!(matches!(err, Error::RequestFailed));
}

#[tokio::test]
async fn unexpected_payload_shape_is_malformed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/openInterest/ohlc-history"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"code": "0", "success": true, "data": {"t": 1700000000}}"#,
        ))
        .mount(&mock_server)
        .await;

    let query = OhlcHistoryQuery::new("Binance", "BTCUSDT", Interval::H1);
    let err = client(&mock_server).ohlc_history(&query).await.unwrap_err();
    assert!(matches!(err, Error::MalformedPayload(_)));
}

#[tokio::test]
async fn invalid_parameters_never_reach_the_network() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let query = OhlcHistoryQuery::new("Binance", "BTC USDT", Interval::H1);
    assert!(matches!(
        client.ohlc_history(&query).await,
        Err(Error::InvalidParameter(_))
    ));
    let query = OhlcHistoryQuery::new("Binance", "BTCUSDT", Interval::H1).with_limit(0);
    assert!(matches!(
        client.ohlc_history(&query).await,
        Err(Error::InvalidParameter(_))
    ));
    assert!(matches!(
        client.open_interest_exchange_list("").await,
        Err(Error::InvalidParameter(_))
    ));
}
