//! Momentum signals based on compounded periodic returns.
//!
//! The UMD signal scores each asset by its cumulative return over a formation
//! window that ends a few periods before the scoring date, skipping the most
//! recent periods to avoid short-term reversal effects.

mod umd;

pub use umd::{UmdMomentum, UmdMomentumConfig};
