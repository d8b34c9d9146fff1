//! UMD CLI binary.
//!
//! Provides a command-line interface for the UMD cross-sectional momentum
//! backtester.

mod cmd;
mod config;
mod data;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::{path::PathBuf, process};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "umd")]
#[command(about = "Cross-sectional momentum (up-minus-down) backtester", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full strategy and report performance
    Backtest {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        strategy: StrategyArgs,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show month-end returns
    Returns {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Show momentum ranks
    Ranks {
        #[command(flatten)]
        source: SourceArgs,

        /// JSON strategy configuration file (only the momentum window is used)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Where prices come from.
#[derive(Args, Debug, Clone)]
struct SourceArgs {
    /// Ticker symbols
    #[arg(
        short,
        long,
        value_delimiter = ',',
        default_value = "BTC-USD,ETH-USD,BNB-USD,ADA-USD"
    )]
    symbols: Vec<String>,

    /// Start date (YYYY-MM-DD, defaults to 2024-01-01 when fetching)
    #[arg(long)]
    start: Option<String>,

    /// End date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    end: Option<String>,

    /// Wide CSV of daily prices (date,SYM1,SYM2,...) instead of Yahoo Finance
    #[arg(long)]
    prices: Option<PathBuf>,
}

/// Strategy configuration and overrides.
#[derive(Args, Debug, Clone)]
struct StrategyArgs {
    /// JSON strategy configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of quantile buckets
    #[arg(short, long)]
    quantiles: Option<usize>,

    /// Transaction cost per unit of turnover (0.002 = 20 bps)
    #[arg(long)]
    cost: Option<f64>,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays the report
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Backtest {
            source,
            strategy,
            format,
        } => {
            let config = config::load(strategy.config.as_deref(), strategy.quantiles, strategy.cost)?;
            cmd::backtest::run_backtest(&source, config, &format).await?;
        }
        Commands::Returns { source } => {
            cmd::returns::show_returns(&source).await?;
        }
        Commands::Ranks { source, config } => {
            let config = config::load(config.as_deref(), None, None)?;
            cmd::ranks::show_ranks(&source, config).await?;
        }
    }

    Ok(())
}
