//! Backtest simulation.
//!
//! Applies each period's weights to the *next* period's realized returns and
//! deducts a proportional cost on turnover.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use tracing::debug;
use umd_traits::{Date, Result, ReturnTable, UmdError, WeightTable};

/// Backtesting configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Cost charged per unit of turnover, as a fraction (0.002 = 20 bps)
    pub transaction_cost_per_trade: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            transaction_cost_per_trade: 0.002,
        }
    }
}

impl BacktestConfig {
    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`UmdError::InvalidConfig`] if the cost is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        let cost = self.transaction_cost_per_trade;
        if !cost.is_finite() || cost < 0.0 {
            return Err(UmdError::InvalidConfig(format!(
                "transaction_cost_per_trade must be a non-negative number, got {cost}"
            )));
        }
        Ok(())
    }
}

/// Backtesting results, one entry per period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Period dates
    pub dates: Vec<Date>,
    /// Lagged-weight portfolio returns before costs
    pub gross_returns: Vec<f64>,
    /// Two-sided turnover into each period's weights
    pub turnover: Vec<f64>,
    /// Transaction cost charged in each period
    pub transaction_costs: Vec<f64>,
    /// Gross return minus transaction cost
    pub net_returns: Vec<f64>,
    /// Average turnover over periods that had a prior portfolio
    pub avg_turnover: f64,
    /// Sum of transaction costs
    pub total_transaction_costs: f64,
}

/// Backtesting engine.
#[derive(Debug, Default)]
pub struct Backtest {
    config: BacktestConfig,
}

impl Backtest {
    /// Create a new backtest with configuration.
    pub const fn new(config: BacktestConfig) -> Self {
        Self { config }
    }

    /// Run the backtest.
    ///
    /// For period `t`:
    /// - gross return = weights of `t - 1` dotted with returns of `t`
    ///   (zero at `t = 0`, where no prior weights exist)
    /// - turnover = half the summed absolute weight change from `t - 1` to `t`
    ///   (zero at `t = 0`)
    /// - net return = gross return - turnover × cost per trade
    ///
    /// Non-finite returns contribute nothing to the gross return.
    ///
    /// # Errors
    ///
    /// Returns [`UmdError::InvalidData`] if the tables do not share dates and
    /// symbols, or [`UmdError::InvalidConfig`] for an invalid cost.
    pub fn run(&self, weights: &WeightTable, returns: &ReturnTable) -> Result<BacktestResult> {
        self.config.validate()?;

        if !weights.same_index(returns) {
            return Err(UmdError::InvalidData(
                "weight and return tables must share dates and symbols".to_string(),
            ));
        }

        let n_periods = returns.n_periods();
        let mut gross_returns = Vec::with_capacity(n_periods);
        let mut turnover = Vec::with_capacity(n_periods);

        for t in 0..n_periods {
            if t == 0 {
                gross_returns.push(0.0);
                turnover.push(0.0);
                continue;
            }
            let previous = weights.row(t - 1);
            gross_returns.push(portfolio_return(previous, returns.row(t)));
            turnover.push(calculate_turnover(previous, weights.row(t)));
        }

        let cost = self.config.transaction_cost_per_trade;
        let transaction_costs: Vec<f64> = turnover.iter().map(|to| to * cost).collect();
        let net_returns: Vec<f64> = gross_returns
            .iter()
            .zip(&transaction_costs)
            .map(|(gross, tc)| gross - tc)
            .collect();

        let avg_turnover = if n_periods > 1 {
            turnover[1..].iter().sum::<f64>() / (n_periods - 1) as f64
        } else {
            0.0
        };
        let total_transaction_costs = transaction_costs.iter().sum();

        debug!(
            periods = n_periods,
            avg_turnover,
            total_transaction_costs,
            "backtest complete"
        );

        Ok(BacktestResult {
            dates: returns.dates().to_vec(),
            gross_returns,
            turnover,
            transaction_costs,
            net_returns,
            avg_turnover,
            total_transaction_costs,
        })
    }
}

/// Calculate portfolio return given positions and asset returns.
fn portfolio_return(positions: ArrayView1<'_, f64>, returns: ArrayView1<'_, f64>) -> f64 {
    positions
        .iter()
        .zip(returns.iter())
        .map(|(&pos, &ret)| {
            if pos.is_finite() && ret.is_finite() {
                pos * ret
            } else {
                0.0
            }
        })
        .sum()
}

/// Two-sided turnover between old and new positions: `½ Σ |new - old|`.
pub fn calculate_turnover(old_positions: ArrayView1<'_, f64>, new_positions: ArrayView1<'_, f64>) -> f64 {
    old_positions
        .iter()
        .zip(new_positions.iter())
        .map(|(&old, &new)| (new - old).abs())
        .sum::<f64>()
        / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};
    use umd_traits::Panel;

    fn panel(values: Array2<f64>) -> Panel<f64> {
        let start = Date::from_ymd_opt(2024, 1, 31).unwrap();
        let dates = (0..values.nrows())
            .map(|i| start + chrono::Months::new(i as u32))
            .collect();
        let symbols = (0..values.ncols()).map(|j| format!("S{j}")).collect();
        Panel::new(dates, symbols, values).unwrap()
    }

    #[test]
    fn test_backtest_config_default() {
        let config = BacktestConfig::default();
        assert_eq!(config.transaction_cost_per_trade, 0.002);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_weights_are_lagged() {
        let weights = panel(array![[1.0, -1.0], [1.0, -1.0], [0.0, 0.0]]);
        let returns = panel(array![[0.9, -0.9], [0.1, 0.05], [0.2, 0.3]]);

        let result = Backtest::new(BacktestConfig {
            transaction_cost_per_trade: 0.0,
        })
        .run(&weights, &returns)
        .unwrap();

        // Period 0 has no prior weights, so its large returns are not earned.
        assert_eq!(result.gross_returns[0], 0.0);
        assert_relative_eq!(result.gross_returns[1], 0.05, epsilon = 1e-12);
        assert_relative_eq!(result.gross_returns[2], -0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_turnover_and_costs() {
        let weights = panel(array![[0.0, 0.0], [0.5, -0.5], [-0.5, 0.5]]);
        let returns = panel(array![[0.0, 0.0], [0.0, 0.0], [0.0, 0.0]]);

        let result = Backtest::default().run(&weights, &returns).unwrap();

        assert_eq!(result.turnover, vec![0.0, 0.5, 1.0]);
        assert_relative_eq!(result.transaction_costs[1], 0.001, epsilon = 1e-15);
        assert_relative_eq!(result.net_returns[2], -0.002, epsilon = 1e-15);
        assert_relative_eq!(result.avg_turnover, 0.75, epsilon = 1e-12);
        assert_relative_eq!(result.total_transaction_costs, 0.003, epsilon = 1e-15);
    }

    #[test]
    fn test_missing_returns_skipped() {
        let weights = panel(array![[0.5, -0.5], [0.5, -0.5]]);
        let returns = panel(array![[0.0, 0.0], [f64::NAN, 0.1]]);

        let result = Backtest::default().run(&weights, &returns).unwrap();
        assert_relative_eq!(result.gross_returns[1], -0.05, epsilon = 1e-12);
        assert!(result.net_returns.iter().all(|r| r.is_finite()));
    }

    #[test]
    fn test_turnover_bounded_by_gross_exposure() {
        let rows = [
            array![0.5, 0.5, -0.5, -0.5],
            array![-0.5, -0.5, 0.5, 0.5],
            array![1.0, 0.0, 0.0, -1.0],
            array![0.0, 0.0, 0.0, 0.0],
            array![0.0, 1.0, -1.0, 0.0],
        ];
        for old in &rows {
            for new in &rows {
                let to = calculate_turnover(old.view(), new.view());
                let exposure =
                    (old.iter().map(|w| w.abs()).sum::<f64>() + new.iter().map(|w| w.abs()).sum::<f64>()) / 2.0;
                assert!(to >= 0.0);
                assert!(to <= exposure + 1e-12);
            }
        }
        // Moving a single long leg trades at most the whole book.
        let to = calculate_turnover(array![1.0, 0.0].view(), array![0.0, 1.0].view());
        assert_relative_eq!(to, 1.0);
    }

    #[test]
    fn test_index_mismatch() {
        let weights = panel(array![[0.0, 0.0]]);
        let returns = panel(array![[0.0, 0.0], [0.0, 0.0]]);
        let result = Backtest::default().run(&weights, &returns);
        assert!(matches!(result, Err(UmdError::InvalidData(_))));
    }

    #[test]
    fn test_negative_cost_rejected() {
        let weights = panel(array![[0.0]]);
        let result = Backtest::new(BacktestConfig {
            transaction_cost_per_trade: -0.01,
        })
        .run(&weights, &weights);
        assert!(matches!(result, Err(UmdError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_tables() {
        let empty = panel(Array2::zeros((0, 3)));
        let result = Backtest::default().run(&empty, &empty).unwrap();
        assert!(result.net_returns.is_empty());
        assert_eq!(result.avg_turnover, 0.0);
    }
}
