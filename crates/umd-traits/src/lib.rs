#![doc(issue_tracker_base_url = "https://github.com/factordynamics/umd/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and trait definitions for the UMD momentum backtester.
//!
//! This crate provides the shared vocabulary of the workspace: date-indexed
//! panels (prices, returns, ranks, weights), the explicit [`Observation`]
//! cell state used instead of NaN signalling, the [`Signal`] trait for
//! cross-sectional score sources, and the common error type.

/// The version of the umd-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod signal;
pub mod stats;
pub mod types;

// Re-exports
pub use error::{Result, UmdError};
pub use signal::Signal;
pub use types::{
    CE_TO_UNIX_EPOCH_DAYS, Date, Observation, Panel, PriceTable, RankTable, ReturnTable,
    ScoreTable, Symbol, WeightTable, month_end,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
