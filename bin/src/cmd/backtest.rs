//! Backtest command implementation.

use crate::{
    SourceArgs,
    cmd::{pct_cell, render_table},
    data,
};
use anyhow::{Result, anyhow};
use serde::Serialize;
use umd_eval::{BacktestResult, PerformanceStats, StrategyConfig, StrategyReport, UmdStrategy};
use umd_traits::Date;

/// Serialized form of a run for `--format json`.
#[derive(Serialize)]
struct Summary<'a> {
    symbols: &'a [String],
    start: Option<Date>,
    end: Option<Date>,
    config: &'a StrategyConfig,
    performance: &'a PerformanceStats,
    backtest: &'a BacktestResult,
}

/// Run the UMD strategy over the loaded prices and report performance.
pub(crate) async fn run_backtest(source: &SourceArgs, config: StrategyConfig, format: &str) -> Result<()> {
    if format != "text" && format != "json" {
        return Err(anyhow!("unknown format `{format}` (expected text or json)"));
    }

    let prices = data::load_prices(source).await?;
    let strategy = UmdStrategy::new(config)?;
    let report = strategy.run(&prices)?;

    if format == "json" {
        let summary = Summary {
            symbols: report.returns.symbols(),
            start: report.returns.dates().first().copied(),
            end: report.returns.dates().last().copied(),
            config: strategy.config(),
            performance: &report.performance,
            backtest: &report.backtest,
        };
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| anyhow!("JSON serialization error: {e}"))?;
        println!("{json}");
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &StrategyReport) {
    let perf = &report.performance;
    let bt = &report.backtest;

    println!("Monthly Returns:");
    print!("{}", render_table(&report.returns, pct_cell));
    println!();

    println!("Annualized Return: {:.2}%", perf.annualized_return * 100.0);
    println!("Annualized Volatility: {:.2}%", perf.annualized_volatility * 100.0);
    match perf.sharpe_ratio {
        Some(sharpe) => println!("Sharpe Ratio: {sharpe:.2}"),
        None => println!("Sharpe Ratio: N/A"),
    }
    println!("Maximum Drawdown: {:.2}%", perf.max_drawdown * 100.0);
    println!();

    println!("Trading Metrics:");
    println!("  Periods:           {:>10}", perf.n_periods);
    println!("  Total Return:      {:>10.2}%", perf.total_return * 100.0);
    println!("  Final Drawdown:    {:>10.2}%", perf.final_drawdown * 100.0);
    println!("  Avg Turnover:      {:>10.2}%", bt.avg_turnover * 100.0);
    println!("  Total Txn Costs:   {:>10.2}%", bt.total_transaction_costs * 100.0);
}
