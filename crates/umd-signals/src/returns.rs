//! Month-end return aggregation.
//!
//! Daily closes are sampled at each calendar month end (the last observation
//! on or before that day) and converted to simple returns between consecutive
//! month ends.

use ndarray::{Array2, s};
use tracing::debug;
use umd_traits::{Date, PriceTable, Result, ReturnTable, UmdError, month_end};

/// Samples `prices` at every calendar month end.
///
/// Labels run from the month of the first price date through the month of the
/// last one, so a trailing partial month is included. Each label takes the
/// last price row dated on or before it; a month without any rows repeats the
/// previous month-end row. Missing cells are not filled from earlier rows.
///
/// # Errors
///
/// Returns [`UmdError::InvalidDate`] if a month end falls outside chrono's
/// date range.
pub fn month_end_prices(prices: &PriceTable) -> Result<PriceTable> {
    let n_assets = prices.n_assets();
    let (Some(&first), Some(&last)) = (prices.dates().first(), prices.dates().last()) else {
        return PriceTable::new(
            Vec::new(),
            prices.symbols().to_vec(),
            Array2::from_elem((0, n_assets), f64::NAN),
        );
    };

    let labels = month_end_labels(first, last)?;
    let dates = prices.dates();
    let mut values = Array2::from_elem((labels.len(), n_assets), f64::NAN);
    let mut cursor = 0;

    for (i, label) in labels.iter().enumerate() {
        while cursor < dates.len() && dates[cursor] <= *label {
            cursor += 1;
        }
        // The first label is never before the first date, so cursor >= 1.
        values.row_mut(i).assign(&prices.row(cursor - 1));
    }

    PriceTable::new(labels, prices.symbols().to_vec(), values)
}

/// Converts daily closes to month-end simple returns.
///
/// The first month end has no prior period and is dropped, so the result
/// starts at the second month end. A missing price on either side of a
/// period gives a `NaN` return. Fewer than two month ends yield an empty
/// table.
///
/// # Errors
///
/// See [`month_end_prices`].
pub fn monthly_returns(prices: &PriceTable) -> Result<ReturnTable> {
    let monthly = month_end_prices(prices)?;
    let n_periods = monthly.n_periods();
    let symbols = monthly.symbols().to_vec();

    if n_periods < 2 {
        debug!(months = n_periods, "not enough month ends for returns");
        return ReturnTable::new(
            Vec::new(),
            symbols,
            Array2::from_elem((0, monthly.n_assets()), f64::NAN),
        );
    }

    let levels = monthly.values();
    let returns = &levels.slice(s![1.., ..]) / &levels.slice(s![..-1, ..]) - 1.0;
    let dates = monthly.dates()[1..].to_vec();

    debug!(
        daily_rows = prices.n_periods(),
        months = dates.len(),
        assets = symbols.len(),
        "aggregated month-end returns"
    );

    ReturnTable::new(dates, symbols, returns)
}

fn month_end_labels(first: Date, last: Date) -> Result<Vec<Date>> {
    let final_label = month_end(last)?;
    let mut label = month_end(first)?;
    let mut labels = vec![label];

    while label < final_label {
        let next_day = label
            .succ_opt()
            .ok_or_else(|| UmdError::InvalidDate(format!("no day after {label}")))?;
        label = month_end(next_day)?;
        labels.push(label);
    }

    Ok(labels)
}
