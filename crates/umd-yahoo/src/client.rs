//! Yahoo Finance chart API client implementation.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use tracing::{debug, info, warn};
use umd_traits::PriceTable;

use crate::{
    Result,
    error::YahooError,
    types::{ChartResponse, DailyClose},
};

/// Base URL for the v8 chart API.
const YAHOO_BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

/// Yahoo rejects requests without a browser-like user agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Yahoo Finance chart API client.
#[derive(Debug, Clone)]
pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl YahooClient {
    /// Create a new client against the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: YAHOO_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different chart endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the chart URL for a symbol and inclusive date range.
    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let period1 = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        // period2 is exclusive; the end of `end` is the start of the next day.
        let period2 = end
            .succ_opt()
            .unwrap_or(end)
            .and_time(chrono::NaiveTime::MIN)
            .and_utc()
            .timestamp();
        format!(
            "{}/{symbol}?period1={period1}&period2={period2}&interval=1d&includeAdjustedClose=true",
            self.base_url
        )
    }

    /// Get daily closes for a symbol between `start` and `end` inclusive.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Yahoo ticker (e.g., "BTC-USD")
    /// * `start` - First date
    /// * `end` - Last date
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API reports an error, or
    /// the response holds no prices.
    pub async fn daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClose>> {
        if start > end {
            return Err(YahooError::Api(format!(
                "start date {start} is after end date {end}"
            )));
        }

        let url = self.chart_url(symbol, start, end);
        debug!(%url, "requesting chart");
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(YahooError::SymbolNotFound(symbol.to_string()));
        }

        let text = response.text().await?;
        if !status.is_success() {
            // Error bodies usually carry a chart error with a better message.
            if let Ok(chart) = serde_json::from_str::<ChartResponse>(&text)
                && let Err(e) = chart.into_daily_closes(symbol)
            {
                return Err(e);
            }
            return Err(YahooError::Api(format!("HTTP {status}: {text}")));
        }

        let chart: ChartResponse = serde_json::from_str(&text)?;
        let bars = chart.into_daily_closes(symbol)?;
        Ok(bars.into_iter().filter(|b| b.date >= start && b.date <= end).collect())
    }

    /// Get a price table for several symbols.
    ///
    /// Symbols are fetched one after another without retries. The per-symbol
    /// series are outer-joined on date and columns follow the order of
    /// `symbols`.
    ///
    /// # Errors
    ///
    /// Any fetch failure aborts the whole table and is reported as
    /// [`UmdError::DataUnavailable`](umd_traits::UmdError::DataUnavailable).
    pub async fn price_table(
        &self,
        symbols: &[&str],
        start: NaiveDate,
        end: NaiveDate,
    ) -> umd_traits::Result<PriceTable> {
        let mut series = Vec::with_capacity(symbols.len());

        for symbol in symbols {
            let bars = self.daily_closes(symbol, start, end).await.inspect_err(|e| {
                warn!(symbol, error = %e, "failed to fetch prices");
            })?;
            info!(
                symbol,
                bars = bars.len(),
                first = ?bars.first().map(|b| b.date),
                last = ?bars.last().map(|b| b.date),
                "fetched daily closes"
            );
            series.push(bars.into_iter().map(|b| (b.date, b.close)).collect());
        }

        PriceTable::from_series(symbols.iter().map(|s| (*s).to_string()).collect(), series)
    }
}
