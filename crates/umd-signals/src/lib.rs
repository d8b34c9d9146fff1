//! Signal construction for the UMD momentum backtester.
//!
//! This crate covers the first half of the pipeline:
//! - Returns: daily closes to month-end simple returns
//! - Momentum: formation-period cumulative returns, skipping recent periods
//! - Ranking: cross-sectional ranks with a first-seen tie-break
//!
//! # Example
//!
//! ```ignore
//! use umd_signals::{monthly_returns, momentum::UmdMomentum};
//!
//! let returns = monthly_returns(&prices)?;
//! let ranks = UmdMomentum::default().rank(&returns)?;
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod momentum;
pub mod rank;
pub mod returns;

// Re-export key functions
pub use rank::rank_cross_section;
pub use returns::{month_end_prices, monthly_returns};
