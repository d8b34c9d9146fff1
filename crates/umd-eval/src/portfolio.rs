//! Long/short portfolio formation from cross-sectional ranks.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use umd_traits::{Panel, RankTable, Result, UmdError, WeightTable};

/// Portfolio formation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    /// Number of quantile buckets; the top bucket goes long, the bottom short
    pub num_quantiles: usize,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self { num_quantiles: 5 }
    }
}

impl PortfolioConfig {
    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`UmdError::InvalidConfig`] if `num_quantiles` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.num_quantiles == 0 {
            return Err(UmdError::InvalidConfig(
                "num_quantiles must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Rank threshold for the long leg: `universe_size / num_quantiles`.
    #[must_use]
    pub fn top_quantile(&self, universe_size: usize) -> f64 {
        universe_size as f64 / self.num_quantiles as f64
    }
}

/// Maps ranks to equal-weighted long/short weights.
///
/// With `n` columns and `top = n / num_quantiles` (real division), an asset
/// goes long when `rank <= top` and short when `rank > n - top`. The long leg
/// sums to +1 and the short leg to -1; an empty leg contributes nothing, and
/// assets without a defined rank get zero weight.
///
/// The thresholds are plain comparisons against a possibly fractional `top`.
/// When `num_quantiles` exceeds the universe size, `top < 1` and no asset can
/// qualify for either leg, so every weight is zero.
///
/// # Errors
///
/// Returns [`UmdError::InvalidConfig`] if the configuration is invalid.
pub fn form_portfolio(ranks: &RankTable, config: &PortfolioConfig) -> Result<WeightTable> {
    config.validate()?;

    let (n_periods, n_assets) = ranks.values().dim();
    let top = config.top_quantile(n_assets);
    let bottom = n_assets as f64 - top;

    if n_assets > 0 && top < 1.0 {
        warn!(
            universe = n_assets,
            num_quantiles = config.num_quantiles,
            top_quantile = top,
            "quantile count exceeds universe size; no asset can enter either leg"
        );
    }

    let mut weights = Array2::zeros((n_periods, n_assets));
    let mut invested = 0usize;

    for (t, row) in ranks.values().outer_iter().enumerate() {
        let ranked = || row.iter().enumerate().filter_map(|(j, r)| r.value().map(|r| (j, r as f64)));
        let longs: Vec<usize> = ranked().filter(|&(_, r)| r <= top).map(|(j, _)| j).collect();
        let shorts: Vec<usize> = ranked().filter(|&(_, r)| r > bottom).map(|(j, _)| j).collect();

        if !longs.is_empty() {
            let w = 1.0 / longs.len() as f64;
            for j in longs {
                weights[[t, j]] += w;
            }
        }
        if !shorts.is_empty() {
            let w = -1.0 / shorts.len() as f64;
            for j in shorts {
                weights[[t, j]] += w;
            }
        }

        if weights.row(t).iter().any(|w| *w != 0.0) {
            invested += 1;
        }
    }

    debug!(
        periods = n_periods,
        invested_periods = invested,
        top_quantile = top,
        "formed long/short portfolio"
    );

    Panel::new(ranks.dates().to_vec(), ranks.symbols().to_vec(), weights)
}
