//! Cross-sectional ranking of score panels.

use std::cmp::Ordering;

use ndarray::Array2;
use umd_traits::{Observation, Panel, RankTable, Result, ScoreTable};

/// Ranks every row of `scores` in descending order; rank 1 is the best score.
///
/// Only assets with a defined score take part in a row's ranking, so the
/// defined ranks of a row always form a permutation of `1..=k`. Undefined
/// scores keep their state (`InsufficientHistory` or `MissingData`).
///
/// Ties are broken by column order: among equal scores the asset that comes
/// first in the panel gets the better rank.
///
/// # Errors
///
/// Propagates index validation errors from [`Panel::new`].
pub fn rank_cross_section(scores: &ScoreTable) -> Result<RankTable> {
    let values = scores.values();
    let (n_periods, n_assets) = values.dim();
    let mut ranks = Array2::from_elem((n_periods, n_assets), Observation::InsufficientHistory);

    for (t, row) in values.outer_iter().enumerate() {
        let mut defined: Vec<(usize, f64)> = Vec::with_capacity(n_assets);
        for (j, score) in row.iter().enumerate() {
            match *score {
                Observation::Value(s) => defined.push((j, s)),
                Observation::MissingData => ranks[[t, j]] = Observation::MissingData,
                Observation::InsufficientHistory => {}
            }
        }

        // Stable sort keeps column order for ties.
        defined.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        for (position, (j, _)) in defined.into_iter().enumerate() {
            ranks[[t, j]] = Observation::Value(position + 1);
        }
    }

    Panel::new(scores.dates().to_vec(), scores.symbols().to_vec(), ranks)
}
