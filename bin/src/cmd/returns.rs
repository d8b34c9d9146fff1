//! Returns command implementation.

use crate::{
    SourceArgs,
    cmd::{pct_cell, render_table},
    data,
};
use anyhow::Result;
use umd_signals::monthly_returns;

/// Print the month-end return table.
pub(crate) async fn show_returns(source: &SourceArgs) -> Result<()> {
    let prices = data::load_prices(source).await?;
    let returns = monthly_returns(&prices)?;

    println!("Monthly Returns:");
    print!("{}", render_table(&returns, pct_cell));

    Ok(())
}
