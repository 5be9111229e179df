//! The `liquidation-map` and `heatmap` subcommands.

use anyhow::Result;
use clap::Args;
use coinglass_api::{Client, LiquidationQuery, LiquidationRange};
use serde_json::json;

use crate::output::{print_json, print_table, OutputFormat};

#[derive(Args)]
pub struct LiquidationArgs {
    /// Exchange name, e.g. Binance
    #[arg(long)]
    pub exchange: String,

    /// Exchange pair, e.g. BTCUSDT
    #[arg(long)]
    pub symbol: String,

    /// Look-back range: 12h, 24h, 3d, 7d, 30d, 90d, 180d, 1y
    #[arg(long, default_value = "24h")]
    pub range: String,
}

impl LiquidationArgs {
    fn query(&self) -> Result<LiquidationQuery> {
        let range: LiquidationRange = self.range.parse()?;
        Ok(LiquidationQuery::new(&self.exchange, &self.symbol).with_range(range))
    }
}

pub async fn run_map(args: &LiquidationArgs, client: &Client, format: OutputFormat) -> Result<()> {
    let (levels, last_price) = client.liquidation_map(&args.query()?).await?;
    match format {
        OutputFormat::Json => print_json(&json!({"lastPrice": last_price, "levels": levels})),
        OutputFormat::Csv => print_table(&levels, format)?,
        _ => {
            println!("Last price: {}", last_price);
            print_table(&levels, format)?;
        }
    }
    Ok(())
}

#[derive(Args)]
pub struct HeatmapArgs {
    #[command(flatten)]
    pub target: LiquidationArgs,

    /// Print the price ticks instead of the liquidations
    #[arg(long)]
    pub prices: bool,
}

pub async fn run_heatmap(args: &HeatmapArgs, client: &Client, format: OutputFormat) -> Result<()> {
    let (liquidations, prices) = client.liquidation_heatmap(&args.target.query()?).await?;
    tracing::info!(
        "{} liquidations over {} price ticks",
        liquidations.len(),
        prices.len()
    );
    if args.prices {
        print_table(&prices, format)
    } else {
        print_table(&liquidations, format)
    }
}
