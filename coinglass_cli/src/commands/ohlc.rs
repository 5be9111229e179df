//! The `ohlc` subcommand: open interest and funding rate candles.

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use coinglass_api::{AggregatedOhlcQuery, Client, HistoryQuery, Interval, OhlcHistoryQuery};

use crate::output::{print_table, OutputFormat};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Series {
    /// Open interest of one exchange pair
    OpenInterest,
    /// Open interest aggregated over all exchanges (needs only --symbol)
    Aggregated,
    /// Funding rate of one exchange pair
    FundingRate,
}

#[derive(Args)]
pub struct OhlcArgs {
    /// Which candle series to fetch
    #[arg(long, value_enum, default_value = "open-interest")]
    pub series: Series,

    /// Exchange name, e.g. Binance (not used by the aggregated series)
    #[arg(long)]
    pub exchange: Option<String>,

    /// Exchange pair (e.g. BTCUSDT), or coin (e.g. BTC) for the aggregated series
    #[arg(long)]
    pub symbol: String,

    /// Candle interval: 1m, 3m, 5m, 15m, 30m, 1h, 4h, 6h, 8h, 12h, 1d, 1w
    #[arg(long, default_value = "4h")]
    pub interval: String,

    /// Maximum number of candles (1-4500)
    #[arg(long, default_value = "1000")]
    pub limit: u32,

    /// Window start, epoch seconds
    #[arg(long)]
    pub start_time: Option<i64>,

    /// Window end, epoch seconds
    #[arg(long)]
    pub end_time: Option<i64>,
}

fn window<Q: HistoryQuery>(query: Q, args: &OhlcArgs) -> Q {
    let mut query = query.with_limit(args.limit);
    if let Some(start) = args.start_time {
        query = query.with_start_time(start);
    }
    if let Some(end) = args.end_time {
        query = query.with_end_time(end);
    }
    query
}

pub async fn run(args: &OhlcArgs, client: &Client, format: OutputFormat) -> Result<()> {
    let interval: Interval = args.interval.parse()?;

    let table = match args.series {
        Series::Aggregated => {
            let query = window(AggregatedOhlcQuery::new(&args.symbol, interval), args);
            client.ohlc_aggregated_history(&query).await?
        }
        series => {
            let Some(exchange) = args.exchange.as_deref() else {
                bail!("--exchange is required for the {:?} series", series);
            };
            let query = window(OhlcHistoryQuery::new(exchange, &args.symbol, interval), args);
            if series == Series::FundingRate {
                client.funding_rate_ohlc_history(&query).await?
            } else {
                client.ohlc_history(&query).await?
            }
        }
    };

    tracing::info!("{} candles", table.len());
    print_table(&table, format)
}
