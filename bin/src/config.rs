//! Strategy configuration loading for the UMD CLI.

use anyhow::{Context, Result};
use std::{fs, path::Path};
use tracing::debug;
use umd_eval::StrategyConfig;

/// Load a strategy configuration from an optional JSON file and apply flag
/// overrides. Fields missing from the file take their defaults.
pub(crate) fn load(
    path: Option<&Path>,
    quantiles: Option<usize>,
    cost: Option<f64>,
) -> Result<StrategyConfig> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            parse(&text).with_context(|| format!("invalid config {}", path.display()))?
        }
        None => StrategyConfig::default(),
    };

    if let Some(q) = quantiles {
        config.portfolio.num_quantiles = q;
    }
    if let Some(c) = cost {
        config.backtest.transaction_cost_per_trade = c;
    }

    config.validate()?;
    debug!(?config, "strategy configuration");
    Ok(config)
}

fn parse(text: &str) -> Result<StrategyConfig> {
    Ok(serde_json::from_str(text)?)
}
