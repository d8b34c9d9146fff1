//! Performance metrics for a periodic net return series.
//!
//! This module provides:
//! - Equity curve and drawdown series
//! - Annualized return and volatility
//! - A guarded Sharpe ratio (undefined when volatility is zero)
//! - Maximum and final drawdown

use serde::{Deserialize, Serialize};
use umd_traits::stats::{MIN_STD_THRESHOLD, sample_std};

/// Configuration for metrics calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Number of return periods per year for annualization (12 for monthly)
    pub periods_per_year: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            periods_per_year: 12,
        }
    }
}

/// Aggregate performance statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceStats {
    /// Number of return periods
    pub n_periods: usize,
    /// Final equity minus one
    pub total_return: f64,
    /// Geometric annualized return
    pub annualized_return: f64,
    /// Sample standard deviation of returns, annualized
    pub annualized_volatility: f64,
    /// Annualized return over annualized volatility; `None` when volatility
    /// is zero or undefined
    pub sharpe_ratio: Option<f64>,
    /// Most negative drawdown (always <= 0)
    pub max_drawdown: f64,
    /// Drawdown at the last period
    pub final_drawdown: f64,
    /// Cumulative product of `1 + r`
    pub equity_curve: Vec<f64>,
    /// `equity / running peak - 1`, with the peak seeded at the starting equity of 1
    pub drawdowns: Vec<f64>,
}

impl PerformanceStats {
    /// Calculate performance statistics from a net return series.
    ///
    /// Empty input gives `NaN` statistics and no Sharpe ratio; `NaN` returns
    /// propagate through the equity curve.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use umd_eval::{PerformanceConfig, PerformanceStats};
    ///
    /// let stats = PerformanceStats::calculate(&result.net_returns, &PerformanceConfig::default());
    /// println!("Sharpe Ratio: {:.2}", stats.sharpe_ratio.unwrap_or(f64::NAN));
    /// ```
    pub fn calculate(returns: &[f64], config: &PerformanceConfig) -> Self {
        let ppy = config.periods_per_year as f64;
        let equity = equity_curve(returns);
        let drawdowns = drawdown_series(&equity);
        let final_equity = equity.last().copied().unwrap_or(f64::NAN);

        let annualized_return = annualized_return(final_equity, returns.len(), ppy);
        let annualized_volatility = sample_std(returns) * ppy.sqrt();

        Self {
            n_periods: returns.len(),
            total_return: final_equity - 1.0,
            annualized_return,
            annualized_volatility,
            sharpe_ratio: sharpe_ratio(annualized_return, annualized_volatility),
            max_drawdown: max_drawdown(&drawdowns),
            final_drawdown: drawdowns.last().copied().unwrap_or(f64::NAN),
            equity_curve: equity,
            drawdowns,
        }
    }
}

/// Cumulative product of `1 + r`; the implicit starting equity of 1 is not
/// included.
pub fn equity_curve(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0, |equity, r| {
            *equity *= 1.0 + r;
            Some(*equity)
        })
        .collect()
}

/// Drawdown of each equity value from its running peak.
///
/// The peak starts at 1, the equity before the first period, so a loss in
/// the very first period is a drawdown.
pub fn drawdown_series(equity: &[f64]) -> Vec<f64> {
    equity
        .iter()
        .scan(1.0_f64, |peak, &e| {
            *peak = peak.max(e);
            Some(e / *peak - 1.0)
        })
        .collect()
}

/// Minimum of a drawdown series, ignoring `NaN`; `NaN` when nothing is defined.
pub fn max_drawdown(drawdowns: &[f64]) -> f64 {
    drawdowns.iter().fold(f64::NAN, |worst, &dd| worst.min(dd))
}

/// Geometric annualization: `final_equity ^ (periods_per_year / n) - 1`.
pub fn annualized_return(final_equity: f64, n_periods: usize, periods_per_year: f64) -> f64 {
    if n_periods == 0 {
        return f64::NAN;
    }
    final_equity.powf(periods_per_year / n_periods as f64) - 1.0
}

/// Annualized return per unit of annualized volatility.
///
/// Returns `None` when volatility is undefined or below
/// [`MIN_STD_THRESHOLD`].
pub fn sharpe_ratio(annualized_return: f64, annualized_volatility: f64) -> Option<f64> {
    (annualized_volatility.is_finite() && annualized_volatility > MIN_STD_THRESHOLD)
        .then(|| annualized_return / annualized_volatility)
}
