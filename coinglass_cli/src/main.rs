mod commands;
mod config;
mod output;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use coinglass_api::Client;

use crate::config::Config;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "coinglass")]
#[command(about = "Query futures market data from Coinglass")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported coins
    Coins,
    /// List supported trading pairs per exchange
    Pairs(commands::markets::PairsArgs),
    /// Open interest or funding rate candles
    Ohlc(commands::ohlc::OhlcArgs),
    /// Current open interest per exchange
    OpenInterest(commands::exchanges::OpenInterestArgs),
    /// Current funding rates per exchange
    Funding(commands::exchanges::FundingArgs),
    /// Liquidation levels of an exchange pair
    LiquidationMap(commands::liquidation::LiquidationArgs),
    /// Liquidation heatmap of an exchange pair
    Heatmap(commands::liquidation::HeatmapArgs),
}

fn parse_format(output: &str) -> Result<OutputFormat> {
    Ok(match output.to_ascii_lowercase().as_str() {
        "table" => OutputFormat::Table,
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "markdown" | "md" => OutputFormat::Markdown,
        other => bail!("unknown output format '{}'. Valid values: table, json, csv, markdown", other),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("coinglass=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = parse_format(&cli.output)?;

    let config = Config::from_env().context("loading configuration")?;
    let client = match &config.base_url {
        Some(base_url) => Client::with_base_url(base_url, &config.api_key),
        None => Client::new(&config.api_key),
    }
    .context("building HTTP client")?;

    match &cli.command {
        Commands::Coins => commands::markets::run_coins(&client, format).await?,
        Commands::Pairs(args) => commands::markets::run_pairs(args, &client, format).await?,
        Commands::Ohlc(args) => commands::ohlc::run(args, &client, format).await?,
        Commands::OpenInterest(args) => {
            commands::exchanges::run_open_interest(args, &client, format).await?
        }
        Commands::Funding(args) => commands::exchanges::run_funding(args, &client, format).await?,
        Commands::LiquidationMap(args) => {
            commands::liquidation::run_map(args, &client, format).await?
        }
        Commands::Heatmap(args) => commands::liquidation::run_heatmap(args, &client, format).await?,
    }

    Ok(())
}
