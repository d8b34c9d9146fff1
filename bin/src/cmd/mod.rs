//! CLI subcommand modules.
//!
//! This module contains the implementations for all umd CLI subcommands.

pub(crate) mod backtest;
pub(crate) mod ranks;
pub(crate) mod returns;

use std::fmt::Write;
use umd_traits::Panel;

/// Render a panel as an aligned text table, one row per date.
pub(crate) fn render_table<T>(panel: &Panel<T>, cell: impl Fn(&T) -> String) -> String {
    let width = panel
        .symbols()
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(10);

    let mut out = format!("{:<10}", "date");
    for symbol in panel.symbols() {
        let _ = write!(out, "  {symbol:>width$}");
    }
    out.push('\n');

    for (date, row) in panel.dates().iter().zip(panel.values().outer_iter()) {
        let _ = write!(out, "{date}");
        for value in row {
            let _ = write!(out, "  {:>width$}", cell(value));
        }
        out.push('\n');
    }
    out
}

/// Percentage cell; missing values print as `NaN`.
pub(crate) fn pct_cell(value: &f64) -> String {
    if value.is_finite() { format!("{:.2}%", value * 100.0) } else { "NaN".to_string() }
}
