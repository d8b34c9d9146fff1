//! Ranks command implementation.

use crate::{SourceArgs, cmd::render_table, data};
use anyhow::Result;
use umd_eval::StrategyConfig;
use umd_signals::{momentum::UmdMomentum, monthly_returns};

/// Print the momentum rank table (1 = strongest formation-period return).
pub(crate) async fn show_ranks(source: &SourceArgs, config: StrategyConfig) -> Result<()> {
    let prices = data::load_prices(source).await?;
    let returns = monthly_returns(&prices)?;

    let signal = UmdMomentum::new(config.momentum);
    let ranks = signal.rank(&returns)?;

    println!(
        "Momentum Ranks (lookback {}, skip {}):",
        config.momentum.lookback_periods, config.momentum.skip_periods
    );
    print!(
        "{}",
        render_table(&ranks, |rank| match rank.value() {
            Some(r) => r.to_string(),
            None => "-".to_string(),
        })
    );

    Ok(())
}
