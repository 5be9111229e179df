//! Per-exchange snapshots: `open-interest` and `funding`.

use anyhow::Result;
use clap::Args;
use coinglass_api::{Client, SymbolQuery};

use crate::output::{print_table, OutputFormat};

#[derive(Args)]
pub struct OpenInterestArgs {
    /// Coin, e.g. BTC
    #[arg(long)]
    pub symbol: String,
}

pub async fn run_open_interest(
    args: &OpenInterestArgs,
    client: &Client,
    format: OutputFormat,
) -> Result<()> {
    let table = client.open_interest_exchange_list(&args.symbol).await?;
    print_table(&table, format)
}

#[derive(Args)]
pub struct FundingArgs {
    /// Restrict to one coin, e.g. BTC
    #[arg(long)]
    pub symbol: Option<String>,
}

pub async fn run_funding(args: &FundingArgs, client: &Client, format: OutputFormat) -> Result<()> {
    let mut query = SymbolQuery::default();
    if let Some(symbol) = &args.symbol {
        query = query.with_symbol(symbol);
    }
    let rates = client.funding_rate_exchange_list(&query).await?;
    tracing::info!(
        "{} coins across {} exchange rows",
        rates.column_count(),
        rates.row_count()
    );
    print_table(&rates.to_table(), format)
}
