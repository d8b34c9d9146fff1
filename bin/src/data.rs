//! Data loading utilities for the UMD CLI.

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, Utc};
use polars::prelude::{CsvReadOptions, SerReader};
use std::{fs, io::Cursor, path::Path};
use tracing::info;
use umd_traits::{PriceTable, UmdError};
use umd_yahoo::YahooClient;

use crate::SourceArgs;

/// First date fetched from Yahoo when `--start` is not given.
const DEFAULT_START: &str = "2024-01-01";

/// Load daily prices from the CSV file or from Yahoo Finance.
pub(crate) async fn load_prices(source: &SourceArgs) -> Result<PriceTable> {
    let start = source.start.as_deref().map(parse_date).transpose()?;
    let end = source.end.as_deref().map(parse_date).transpose()?;

    if let Some(path) = &source.prices {
        let prices = read_price_csv(path)?;
        let prices = restrict_dates(prices, start, end)?;
        info!(
            path = %path.display(),
            rows = prices.n_periods(),
            assets = prices.n_assets(),
            "loaded prices from file"
        );
        return Ok(prices);
    }

    let start = match start {
        Some(start) => start,
        None => parse_date(DEFAULT_START)?,
    };
    let end = end.unwrap_or_else(|| Utc::now().date_naive());

    let client = YahooClient::new().map_err(UmdError::from)?;
    let symbols: Vec<&str> = source.symbols.iter().map(String::as_str).collect();
    Ok(client.price_table(&symbols, start, end).await?)
}

/// Parse a date string in YYYY-MM-DD format.
pub(crate) fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| anyhow!(UmdError::InvalidDate(format!("{date_str}: {e}"))))
}

/// Read a wide price file: a `date` column followed by one column per symbol.
fn read_price_csv(path: &Path) -> Result<PriceTable> {
    let bytes = fs::read(path).with_context(|| format!("failed to open {}", path.display()))?;
    parse_price_csv(bytes).with_context(|| format!("invalid price file {}", path.display()))
}

/// Parse wide CSV prices with ISO dates. Empty cells are missing prices; rows
/// may appear in any date order.
fn parse_price_csv(bytes: Vec<u8>) -> Result<PriceTable> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .map_parse_options(|opts| opts.with_try_parse_dates(true))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;

    Ok(PriceTable::from_frame(&df)?)
}

/// Keep only rows within `[start, end]`.
fn restrict_dates(
    prices: PriceTable,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<PriceTable> {
    if start.is_none() && end.is_none() {
        return Ok(prices);
    }

    let keep: Vec<usize> = prices
        .dates()
        .iter()
        .enumerate()
        .filter(|(_, d)| start.is_none_or(|s| **d >= s) && end.is_none_or(|e| **d <= e))
        .map(|(i, _)| i)
        .collect();

    let dates = keep.iter().map(|&i| prices.dates()[i]).collect();
    let values = prices.values().select(ndarray::Axis(0), &keep);
    Ok(PriceTable::new(dates, prices.symbols().to_vec(), values)?)
}
