//! Portfolio formation, backtesting and evaluation for UMD momentum.
//!
//! This crate covers the second half of the pipeline:
//! - Portfolio: quantile long/short weights from cross-sectional ranks
//! - Backtest: lagged weights against realized returns with turnover costs
//! - Metrics: annualized return, volatility, Sharpe ratio and drawdowns
//! - Strategy: the whole pipeline from daily prices to a report
//!
//! # Example
//!
//! ```rust,ignore
//! use umd_eval::{StrategyConfig, UmdStrategy};
//!
//! let strategy = UmdStrategy::new(StrategyConfig::default())?;
//! let report = strategy.run(&prices)?;
//! println!("{:.2}%", report.performance.annualized_return * 100.0);
//! ```

pub mod backtest;
pub mod metrics;
pub mod portfolio;
pub mod strategy;

// Re-export main types
pub use backtest::{Backtest, BacktestConfig, BacktestResult, calculate_turnover};
pub use metrics::{PerformanceConfig, PerformanceStats};
pub use portfolio::{PortfolioConfig, form_portfolio};
pub use strategy::{StrategyConfig, StrategyReport, UmdStrategy};
