//! End-to-end UMD strategy: returns, ranks, weights, backtest and statistics.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use umd_signals::{
    monthly_returns,
    momentum::{UmdMomentum, UmdMomentumConfig},
};
use umd_traits::{PriceTable, RankTable, Result, ReturnTable, UmdError, WeightTable};

use crate::{
    backtest::{Backtest, BacktestConfig, BacktestResult},
    metrics::{PerformanceConfig, PerformanceStats},
    portfolio::{PortfolioConfig, form_portfolio},
};

/// Configuration for every stage of the strategy.
///
/// Missing fields in a serialized config fall back to their defaults, so
/// `{"portfolio": {"num_quantiles": 2}}` is a complete configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Formation window
    pub momentum: UmdMomentumConfig,
    /// Quantile buckets
    pub portfolio: PortfolioConfig,
    /// Transaction costs
    pub backtest: BacktestConfig,
    /// Annualization
    pub performance: PerformanceConfig,
}

impl StrategyConfig {
    /// Checks every stage's configuration.
    ///
    /// # Errors
    ///
    /// Returns the first [`UmdError::InvalidConfig`] encountered.
    pub fn validate(&self) -> Result<()> {
        self.momentum.validate()?;
        self.portfolio.validate()?;
        self.backtest.validate()?;
        if self.performance.periods_per_year == 0 {
            return Err(UmdError::InvalidConfig(
                "periods_per_year must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything produced by one strategy run.
#[derive(Debug, Clone)]
pub struct StrategyReport {
    /// Month-end returns
    pub returns: ReturnTable,
    /// Momentum ranks
    pub ranks: RankTable,
    /// Long/short weights
    pub weights: WeightTable,
    /// Per-period backtest series
    pub backtest: BacktestResult,
    /// Summary statistics of the net returns
    pub performance: PerformanceStats,
}

/// The UMD momentum strategy.
#[derive(Debug, Clone)]
pub struct UmdStrategy {
    config: StrategyConfig,
    signal: UmdMomentum,
}

impl UmdStrategy {
    /// Creates a strategy after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if any stage's configuration is invalid.
    pub fn new(config: StrategyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            signal: UmdMomentum::new(config.momentum),
        })
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Runs the full pipeline on daily prices.
    ///
    /// # Errors
    ///
    /// Propagates errors from return aggregation and the later stages.
    pub fn run(&self, prices: &PriceTable) -> Result<StrategyReport> {
        let returns = monthly_returns(prices)?;
        self.run_on_returns(returns)
    }

    /// Runs ranking, portfolio formation, backtest and evaluation on
    /// precomputed periodic returns.
    ///
    /// # Errors
    ///
    /// Propagates errors from the individual stages.
    pub fn run_on_returns(&self, returns: ReturnTable) -> Result<StrategyReport> {
        let min_history = self.signal.min_history();
        if returns.n_periods() < min_history {
            warn!(
                periods = returns.n_periods(),
                required = min_history,
                "not enough history for a momentum score; all weights will be zero"
            );
        }

        let ranks = self.signal.rank(&returns)?;
        let weights = form_portfolio(&ranks, &self.config.portfolio)?;
        let backtest = Backtest::new(self.config.backtest).run(&weights, &returns)?;
        let performance = PerformanceStats::calculate(&backtest.net_returns, &self.config.performance);

        info!(
            periods = performance.n_periods,
            assets = returns.n_assets(),
            annualized_return = performance.annualized_return,
            max_drawdown = performance.max_drawdown,
            "strategy run complete"
        );

        Ok(StrategyReport {
            returns,
            ranks,
            weights,
            backtest,
            performance,
        })
    }
}
