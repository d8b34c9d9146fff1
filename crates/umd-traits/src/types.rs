//! Common types used throughout the UMD backtester.
//!
//! Every table in the pipeline is a [`Panel`]: rows are dates, columns are
//! asset symbols, cells are a per-table value type. Column order is part of a
//! panel's identity because it is the tie-break order for ranking.

use std::collections::{BTreeMap, HashSet};

use chrono::Datelike;
use ndarray::{Array2, ArrayView1, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{Result, UmdError};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A market symbol identifier, e.g. `"BTC-USD"`.
pub type Symbol = String;

/// Days between 0001-01-01 (CE) and 1970-01-01, the polars date epoch.
pub const CE_TO_UNIX_EPOCH_DAYS: i32 = 719_163;

/// Explicit state of a derived cell.
///
/// Derived tables use this instead of NaN so callers can assert on *why* a
/// value is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Observation<T> {
    /// Not enough periods of history exist yet.
    InsufficientHistory,
    /// A required input inside the window was missing.
    MissingData,
    /// A computed value.
    Value(T),
}

impl<T: Copy> Observation<T> {
    /// Returns the computed value, if any.
    pub fn value(&self) -> Option<T> {
        match *self {
            Self::Value(v) => Some(v),
            Self::InsufficientHistory | Self::MissingData => None,
        }
    }

    /// Returns whether this cell holds a computed value.
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Maps the computed value, preserving undefined states.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Observation<U> {
        match self {
            Self::Value(v) => Observation::Value(f(v)),
            Self::InsufficientHistory => Observation::InsufficientHistory,
            Self::MissingData => Observation::MissingData,
        }
    }
}

/// A date-indexed table of per-asset values.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel<T> {
    dates: Vec<Date>,
    symbols: Vec<Symbol>,
    values: Array2<T>,
}

/// Daily (or month-end) adjusted close prices; missing cells are `NaN`.
pub type PriceTable = Panel<f64>;

/// Simple periodic returns; missing cells are `NaN`.
pub type ReturnTable = Panel<f64>;

/// Formation-period scores produced by a [`Signal`](crate::Signal).
pub type ScoreTable = Panel<Observation<f64>>;

/// Cross-sectional ranks, 1 = best.
pub type RankTable = Panel<Observation<usize>>;

/// Signed portfolio weights.
pub type WeightTable = Panel<f64>;

impl<T> Panel<T> {
    /// Creates a panel, validating its shape and index.
    ///
    /// # Errors
    ///
    /// Returns [`UmdError::InvalidData`] if the value matrix does not have one
    /// row per date and one column per symbol, if dates are not strictly
    /// increasing, or if a symbol appears twice.
    pub fn new(dates: Vec<Date>, symbols: Vec<Symbol>, values: Array2<T>) -> Result<Self> {
        if values.nrows() != dates.len() || values.ncols() != symbols.len() {
            return Err(UmdError::InvalidData(format!(
                "panel values are {}x{} but index is {}x{}",
                values.nrows(),
                values.ncols(),
                dates.len(),
                symbols.len()
            )));
        }

        if let Some(w) = dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(UmdError::InvalidData(format!(
                "dates must be strictly increasing ({} then {})",
                w[0], w[1]
            )));
        }

        let mut seen = HashSet::with_capacity(symbols.len());
        if let Some(dup) = symbols.iter().find(|s| !seen.insert(s.as_str())) {
            return Err(UmdError::InvalidData(format!("duplicate symbol: {dup}")));
        }

        Ok(Self {
            dates,
            symbols,
            values,
        })
    }

    /// Row dates, strictly increasing.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Column symbols in table order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// The underlying value matrix.
    pub const fn values(&self) -> &Array2<T> {
        &self.values
    }

    /// Number of rows.
    pub fn n_periods(&self) -> usize {
        self.dates.len()
    }

    /// Number of columns.
    pub fn n_assets(&self) -> usize {
        self.symbols.len()
    }

    /// Returns whether the panel has no rows.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Returns row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds.
    pub fn row(&self, i: usize) -> ArrayView1<'_, T> {
        self.values.row(i)
    }

    /// Returns the column for `symbol`, if present.
    pub fn column(&self, symbol: &str) -> Option<ArrayView1<'_, T>> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .map(|j| self.values.column(j))
    }

    /// Returns whether `other` has the same dates and symbols.
    pub fn same_index<U>(&self, other: &Panel<U>) -> bool {
        self.dates == other.dates && self.symbols == other.symbols
    }

    /// Applies `f` to every cell, keeping the index.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Panel<U> {
        Panel {
            dates: self.dates.clone(),
            symbols: self.symbols.clone(),
            values: self.values.map(f),
        }
    }

    /// Consumes the panel and returns its parts.
    pub fn into_parts(self) -> (Vec<Date>, Vec<Symbol>, Array2<T>) {
        (self.dates, self.symbols, self.values)
    }
}

impl Panel<f64> {
    /// Creates a price table, additionally checking every present price.
    ///
    /// # Errors
    ///
    /// Returns [`UmdError::InvalidData`] if the index is invalid or a
    /// non-missing price is not finite and strictly positive.
    pub fn from_prices(dates: Vec<Date>, symbols: Vec<Symbol>, values: Array2<f64>) -> Result<Self> {
        let panel = Self::new(dates, symbols, values)?;

        for ((i, j), &price) in panel.values.indexed_iter() {
            if !price.is_nan() && !(price.is_finite() && price > 0.0) {
                return Err(UmdError::InvalidData(format!(
                    "price for {} on {} must be positive, got {price}",
                    panel.symbols[j], panel.dates[i]
                )));
            }
        }

        Ok(panel)
    }

    /// Builds a price table from one `(date, close)` series per symbol.
    ///
    /// Series are outer-joined on date: a date present for any symbol becomes
    /// a row, and symbols without an observation on that date get `NaN`.
    ///
    /// # Errors
    ///
    /// Returns [`UmdError::InvalidData`] if the number of series does not
    /// match the number of symbols, or if a price is invalid.
    pub fn from_series(symbols: Vec<Symbol>, series: Vec<Vec<(Date, f64)>>) -> Result<Self> {
        if symbols.len() != series.len() {
            return Err(UmdError::InvalidData(format!(
                "{} symbols but {} price series",
                symbols.len(),
                series.len()
            )));
        }

        let n_assets = symbols.len();
        let mut rows: BTreeMap<Date, Vec<f64>> = BTreeMap::new();
        for (j, points) in series.into_iter().enumerate() {
            for (date, close) in points {
                rows.entry(date).or_insert_with(|| vec![f64::NAN; n_assets])[j] = close;
            }
        }

        let dates: Vec<Date> = rows.keys().copied().collect();
        let flat: Vec<f64> = rows.into_values().flatten().collect();
        let values = Array2::from_shape_vec((dates.len(), n_assets), flat)?;

        Self::from_prices(dates, symbols, values)
    }

    /// Reads a wide frame: a `date` column plus one numeric column per symbol.
    ///
    /// Rows may come in any date order and are sorted. Nulls become `NaN`.
    /// Column order after `date` is preserved. Present prices are validated
    /// as in [`Panel::from_prices`].
    ///
    /// # Errors
    ///
    /// Returns an error if the `date` column is missing or not a date type,
    /// if there are no symbol columns, if a value column holds anything that
    /// is not a number, or if a price is invalid.
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let date_col = df
            .column("date")
            .map_err(|_| UmdError::InvalidData("missing `date` column".to_string()))?;

        let dates = date_col
            .as_materialized_series()
            .date()?
            .into_iter()
            .map(|d: Option<i32>| {
                d.and_then(|d| Date::from_num_days_from_ce_opt(d + CE_TO_UNIX_EPOCH_DAYS))
                    .ok_or_else(|| UmdError::InvalidDate("null or out-of-range date".to_string()))
            })
            .collect::<Result<Vec<Date>>>()?;

        let symbols: Vec<Symbol> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .filter(|s| s != "date")
            .collect();
        if symbols.is_empty() {
            return Err(UmdError::InvalidData(
                "expected a `date` column followed by symbol columns".to_string(),
            ));
        }

        let mut values = Array2::from_elem((dates.len(), symbols.len()), f64::NAN);
        for (j, symbol) in symbols.iter().enumerate() {
            let series = df
                .column(symbol)?
                .as_materialized_series()
                .strict_cast(&DataType::Float64)?;
            for (i, v) in series.f64()?.into_iter().enumerate() {
                values[[i, j]] = v.unwrap_or(f64::NAN);
            }
        }

        let mut order: Vec<usize> = (0..dates.len()).collect();
        order.sort_by_key(|&i| dates[i]);
        let dates = order.iter().map(|&i| dates[i]).collect();
        let values = values.select(Axis(0), &order);

        Self::from_prices(dates, symbols, values)
    }
}

/// Returns the last calendar day of `date`'s month.
///
/// # Errors
///
/// Returns [`UmdError::InvalidDate`] at the end of chrono's date range.
pub fn month_end(date: Date) -> Result<Date> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    Date::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .ok_or_else(|| UmdError::InvalidDate(format!("no month end for {date}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd_opt(y, m, day).unwrap()
    }

    fn syms(names: &[&str]) -> Vec<Symbol> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_panel_new() {
        let panel = Panel::new(
            vec![d(2024, 1, 1), d(2024, 1, 2)],
            syms(&["BTC-USD", "ETH-USD"]),
            array![[1.0, 2.0], [3.0, 4.0]],
        )
        .unwrap();

        assert_eq!(panel.n_periods(), 2);
        assert_eq!(panel.n_assets(), 2);
        assert_eq!(panel.column("ETH-USD").unwrap().to_vec(), vec![2.0, 4.0]);
        assert!(panel.column("ADA-USD").is_none());
    }

    #[test]
    fn test_panel_rejects_shape_mismatch() {
        let result = Panel::new(vec![d(2024, 1, 1)], syms(&["A", "B"]), array![[1.0]]);
        assert!(matches!(result, Err(UmdError::InvalidData(_))));
    }

    #[test]
    fn test_panel_rejects_unsorted_dates() {
        let result = Panel::new(
            vec![d(2024, 1, 2), d(2024, 1, 1)],
            syms(&["A"]),
            array![[1.0], [2.0]],
        );
        assert!(matches!(result, Err(UmdError::InvalidData(_))));
    }

    #[test]
    fn test_panel_rejects_duplicate_symbols() {
        let result = Panel::new(vec![d(2024, 1, 1)], syms(&["A", "A"]), array![[1.0, 2.0]]);
        assert!(matches!(result, Err(UmdError::InvalidData(_))));
    }

    #[test]
    fn test_from_prices_rejects_non_positive() {
        let result = PriceTable::from_prices(vec![d(2024, 1, 1)], syms(&["A"]), array![[0.0]]);
        assert!(result.is_err());

        let ok = PriceTable::from_prices(vec![d(2024, 1, 1)], syms(&["A"]), array![[f64::NAN]]);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_from_series_outer_join() {
        let prices = PriceTable::from_series(
            syms(&["A", "B"]),
            vec![
                vec![(d(2024, 1, 2), 11.0), (d(2024, 1, 1), 10.0)],
                vec![(d(2024, 1, 2), 20.0), (d(2024, 1, 3), 21.0)],
            ],
        )
        .unwrap();

        assert_eq!(
            prices.dates(),
            &[d(2024, 1, 1), d(2024, 1, 2), d(2024, 1, 3)]
        );
        let a = prices.column("A").unwrap();
        assert_eq!(a[0], 10.0);
        assert_eq!(a[1], 11.0);
        assert!(a[2].is_nan());
        assert!(prices.column("B").unwrap()[0].is_nan());
    }

    #[test]
    fn test_from_frame_keeps_column_order() {
        let df = df! {
            "date" => &[d(2024, 2, 29), d(2024, 1, 31)],
            "ETH-USD" => &[None, Some(2000.0)],
            "BTC-USD" => &[Some(60000.0), Some(40000.0)],
        }
        .unwrap();

        let panel = PriceTable::from_frame(&df).unwrap();
        assert_eq!(panel.symbols(), &syms(&["ETH-USD", "BTC-USD"])[..]);
        assert_eq!(panel.dates(), &[d(2024, 1, 31), d(2024, 2, 29)]);
        assert_eq!(panel.row(0).to_vec(), vec![2000.0, 40000.0]);
        assert!(panel.row(1)[0].is_nan());
    }

    #[test]
    fn test_from_frame_rejects_bad_columns() {
        let text = df! {
            "date" => &[d(2024, 1, 31)],
            "A" => &["abc"],
        }
        .unwrap();
        assert!(PriceTable::from_frame(&text).is_err());

        let negative = df! {
            "date" => &[d(2024, 1, 31)],
            "A" => &[-5.0],
        }
        .unwrap();
        assert!(matches!(
            PriceTable::from_frame(&negative),
            Err(UmdError::InvalidData(_))
        ));

        let no_dates = df! { "A" => &[1.0] }.unwrap();
        assert!(matches!(
            PriceTable::from_frame(&no_dates),
            Err(UmdError::InvalidData(_))
        ));

        let no_symbols = df! { "date" => &[d(2024, 1, 31)] }.unwrap();
        assert!(matches!(
            PriceTable::from_frame(&no_symbols),
            Err(UmdError::InvalidData(_))
        ));
    }

    #[test]
    fn test_observation_helpers() {
        let v: Observation<f64> = Observation::Value(0.5);
        assert_eq!(v.value(), Some(0.5));
        assert!(v.is_value());
        assert_eq!(v.map(|x| x * 2.0), Observation::Value(1.0));

        let missing: Observation<f64> = Observation::MissingData;
        assert_eq!(missing.value(), None);
        assert_eq!(missing.map(|x| x * 2.0), Observation::MissingData);
    }

    #[test]
    fn test_month_end() {
        assert_eq!(month_end(d(2024, 2, 10)).unwrap(), d(2024, 2, 29));
        assert_eq!(month_end(d(2023, 2, 1)).unwrap(), d(2023, 2, 28));
        assert_eq!(month_end(d(2024, 12, 31)).unwrap(), d(2024, 12, 31));
        assert_eq!(month_end(d(2024, 4, 30)).unwrap(), d(2024, 4, 30));
    }
}
