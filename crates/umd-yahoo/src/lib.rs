//! Yahoo Finance chart API client for UMD.
//!
//! This crate fetches daily closing prices from Yahoo Finance's public v8
//! chart endpoint and assembles them into a [`PriceTable`](umd_traits::PriceTable).
//! No API key is required.
//!
//! # Usage
//!
//! ```rust,ignore
//! use umd_yahoo::YahooClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = YahooClient::new()?;
//!     let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!     let end = chrono::Utc::now().date_naive();
//!
//!     // Daily closes for a single symbol
//!     let closes = client.daily_closes("BTC-USD", start, end).await?;
//!
//!     // An outer-joined table for a universe
//!     let prices = client.price_table(&["BTC-USD", "ETH-USD"], start, end).await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::YahooClient;
pub use error::YahooError;
pub use types::*;

/// Result type for Yahoo operations.
pub type Result<T> = std::result::Result<T, YahooError>;
