//! Data types for Yahoo Finance chart API responses.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Result, error::YahooError};

/// Top-level chart API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    /// Chart payload.
    pub chart: Chart,
}

/// Chart payload: either a result list or an error.
#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    /// Series data, one entry per requested symbol.
    pub result: Option<Vec<ChartData>>,
    /// Error reported by the API.
    pub error: Option<ChartError>,
}

/// Error object returned inside a chart response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    /// Error code (e.g. "Not Found").
    pub code: String,
    /// Human-readable description.
    pub description: String,
}

/// Series data for one symbol.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartData {
    /// Bar timestamps in seconds since the Unix epoch.
    pub timestamp: Option<Vec<i64>>,
    /// Price indicators aligned with `timestamp`.
    pub indicators: Indicators,
}

/// Price indicators.
#[derive(Debug, Clone, Deserialize)]
pub struct Indicators {
    /// Raw quote series.
    pub quote: Vec<QuoteData>,
    /// Split and dividend adjusted closes, when requested.
    #[serde(default)]
    pub adjclose: Option<Vec<AdjCloseData>>,
}

/// Raw quote series. Only closes are used.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteData {
    /// Raw closing prices.
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

/// Adjusted close series.
#[derive(Debug, Clone, Deserialize)]
pub struct AdjCloseData {
    /// Adjusted closing prices.
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

/// One daily closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyClose {
    /// Trading date (UTC).
    pub date: NaiveDate,
    /// Adjusted close, or the raw close when no adjusted value exists.
    pub close: f64,
}

impl ChartResponse {
    /// Extracts daily closes for `symbol`.
    ///
    /// The adjusted close is preferred and the raw close is the fallback.
    /// Bars with neither are skipped, as are repeated dates (Yahoo can append
    /// a live bar that shares the last session's date).
    ///
    /// # Errors
    ///
    /// Returns [`YahooError::SymbolNotFound`] or [`YahooError::Api`] when the
    /// API reports an error, [`YahooError::ResponseFormat`] when the payload is
    /// malformed, and [`YahooError::NoData`] when no bar has a price.
    pub fn into_daily_closes(self, symbol: &str) -> Result<Vec<DailyClose>> {
        let Some(results) = self.chart.result else {
            return Err(match self.chart.error {
                Some(err) if err.code == "Not Found" => YahooError::SymbolNotFound(symbol.to_string()),
                Some(err) => YahooError::Api(format!("{}: {}", err.code, err.description)),
                None => YahooError::ResponseFormat("empty result with no error".to_string()),
            });
        };

        let data = results
            .into_iter()
            .next()
            .ok_or_else(|| YahooError::ResponseFormat("result array is empty".to_string()))?;

        let Some(timestamps) = data.timestamp else {
            return Err(YahooError::NoData(symbol.to_string()));
        };

        let closes = data
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|q| q.close)
            .unwrap_or_default();
        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose)
            .unwrap_or_default();

        let mut bars: Vec<DailyClose> = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| YahooError::ResponseFormat(format!("invalid timestamp: {ts}")))?;

            let adj = adj_closes.get(i).copied().flatten();
            let raw = closes.get(i).copied().flatten();
            let Some(close) = adj.or(raw).filter(|c| c.is_finite()) else {
                continue;
            };

            match bars.last_mut() {
                Some(last) if last.date == date => last.close = close,
                Some(last) if last.date > date => {
                    return Err(YahooError::ResponseFormat(format!(
                        "timestamps out of order at {date}"
                    )));
                }
                _ => bars.push(DailyClose { date, close }),
            }
        }

        if bars.is_empty() {
            return Err(YahooError::NoData(symbol.to_string()));
        }

        Ok(bars)
    }
}
