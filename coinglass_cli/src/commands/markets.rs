//! The `coins` and `pairs` subcommands: what the futures API covers.

use anyhow::Result;
use clap::Args;
use coinglass_api::Client;

use crate::output::{print_grid, print_json, print_table, Grid, OutputFormat};

pub async fn run_coins(client: &Client, format: OutputFormat) -> Result<()> {
    let coins = client.supported_coins().await?;
    tracing::info!("{} supported coins", coins.len());
    print_table(&coins, format)
}

#[derive(Args)]
pub struct PairsArgs {
    /// Only list pairs of this exchange (case-insensitive)
    #[arg(long)]
    pub exchange: Option<String>,

    /// Only list pairs with this base asset, e.g. BTC
    #[arg(long)]
    pub base: Option<String>,
}

pub async fn run_pairs(args: &PairsArgs, client: &Client, format: OutputFormat) -> Result<()> {
    let mut pairs = client.supported_exchange_pairs().await?;
    if let Some(exchange) = &args.exchange {
        pairs.retain(|name, _| name.eq_ignore_ascii_case(exchange));
    }
    if let Some(base) = &args.base {
        for list in pairs.values_mut() {
            list.retain(|p| {
                p.base_asset
                    .as_deref()
                    .is_some_and(|b| b.eq_ignore_ascii_case(base))
            });
        }
        pairs.retain(|_, list| !list.is_empty());
    }

    match format {
        OutputFormat::Json => print_json(&pairs),
        _ => {
            let mut grid = Grid::new(["Exchange", "Instrument", "Base", "Quote"]);
            for (exchange, list) in &pairs {
                for pair in list {
                    grid.push(vec![
                        exchange.clone(),
                        pair.instrument_id.clone().unwrap_or_default(),
                        pair.base_asset.clone().unwrap_or_default(),
                        pair.quote_asset.clone().unwrap_or_default(),
                    ]);
                }
            }
            print_grid(&grid, format)?;
        }
    }
    Ok(())
}
