//! UMD (up-minus-down) momentum: trailing compounded return, skipping the most
//! recent periods.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;
use umd_traits::{
    Observation, Panel, RankTable, Result, ReturnTable, ScoreTable, Signal, UmdError,
    stats::compound_return,
};

use crate::rank::rank_cross_section;

/// Configuration for the UMD momentum signal.
///
/// For the row at period `t` the formation window covers periods
/// `[t - lookback_periods, t - skip_periods]` inclusive. The defaults give the
/// classic 12-2 window on monthly data: 11 periods ending two periods before
/// `t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UmdMomentumConfig {
    /// Periods back to the start of the formation window (default: 12)
    pub lookback_periods: usize,

    /// Periods back to the end of the formation window (default: 2)
    pub skip_periods: usize,
}

impl Default for UmdMomentumConfig {
    fn default() -> Self {
        Self {
            lookback_periods: 12,
            skip_periods: 2,
        }
    }
}

impl UmdMomentumConfig {
    /// Checks that the formation window is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`UmdError::InvalidConfig`] if `lookback_periods` does not
    /// exceed `skip_periods`.
    pub fn validate(&self) -> Result<()> {
        if self.lookback_periods <= self.skip_periods {
            return Err(UmdError::InvalidConfig(format!(
                "lookback_periods ({}) must exceed skip_periods ({})",
                self.lookback_periods, self.skip_periods
            )));
        }
        Ok(())
    }
}

/// UMD momentum signal.
///
/// Scores each asset by `Π(1 + r) - 1` over its formation window. Rows with
/// fewer than `lookback_periods + 1` periods of history are
/// [`Observation::InsufficientHistory`]; an asset with a missing return inside
/// its window is [`Observation::MissingData`] while the rest of the row is
/// still scored.
///
/// # Example
///
/// ```ignore
/// use umd_signals::momentum::UmdMomentum;
///
/// let signal = UmdMomentum::default();
/// let ranks = signal.rank(&monthly_returns)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct UmdMomentum {
    config: UmdMomentumConfig,
}

impl UmdMomentum {
    /// Create a new UMD momentum signal with the given configuration.
    #[must_use]
    pub const fn new(config: UmdMomentumConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &UmdMomentumConfig {
        &self.config
    }

    /// Number of periods in the formation window.
    #[must_use]
    pub const fn formation_periods(&self) -> usize {
        self.config.lookback_periods - self.config.skip_periods + 1
    }

    /// Periods of history needed before the first defined score.
    #[must_use]
    pub const fn min_history(&self) -> usize {
        self.config.lookback_periods + 1
    }

    /// Scores `returns` and ranks every row, best first.
    ///
    /// # Errors
    ///
    /// Returns [`UmdError::InvalidConfig`] if the window is empty.
    pub fn rank(&self, returns: &ReturnTable) -> Result<RankTable> {
        let scores = self.scores(returns)?;
        rank_cross_section(&scores)
    }
}

impl Signal for UmdMomentum {
    fn name(&self) -> &str {
        "umd_momentum"
    }

    fn scores(&self, returns: &ReturnTable) -> Result<ScoreTable> {
        self.config.validate()?;

        let lookback = self.config.lookback_periods;
        let skip = self.config.skip_periods;
        let values = returns.values();
        let (n_periods, n_assets) = values.dim();

        let mut scores = Array2::from_elem((n_periods, n_assets), Observation::InsufficientHistory);
        let mut missing = 0usize;

        for t in lookback..n_periods {
            let window = (t - lookback)..=(t - skip);
            for j in 0..n_assets {
                let window_returns = window.clone().map(|s| values[[s, j]]);
                scores[[t, j]] = match compound_return(window_returns) {
                    Some(score) => Observation::Value(score),
                    None => {
                        missing += 1;
                        Observation::MissingData
                    }
                };
            }
        }

        debug!(
            signal = self.name(),
            periods = n_periods,
            assets = n_assets,
            scored_from = lookback,
            missing,
            "computed formation-period scores"
        );

        Panel::new(returns.dates().to_vec(), returns.symbols().to_vec(), scores)
    }

    fn lookback(&self) -> usize {
        self.config.lookback_periods
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Months;
    use umd_traits::Date;

    fn returns_panel(rows: Vec<Vec<f64>>, symbols: &[&str]) -> ReturnTable {
        let start = Date::from_ymd_opt(2023, 1, 31).unwrap();
        let dates = (0..rows.len())
            .map(|i| start + Months::new(i as u32))
            .collect::<Vec<_>>();
        let n_assets = symbols.len();
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        Panel::new(
            dates,
            symbols.iter().map(|s| s.to_string()).collect(),
            Array2::from_shape_vec((flat.len() / n_assets, n_assets), flat).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = UmdMomentumConfig::default();
        assert_eq!(config.lookback_periods, 12);
        assert_eq!(config.skip_periods, 2);

        let signal = UmdMomentum::default();
        assert_eq!(signal.formation_periods(), 11);
        assert_eq!(signal.min_history(), 13);
        assert_eq!(signal.lookback(), 12);
        assert_eq!(signal.name(), "umd_momentum");
    }

    #[test]
    fn test_invalid_config() {
        let signal = UmdMomentum::new(UmdMomentumConfig {
            lookback_periods: 2,
            skip_periods: 2,
        });
        let returns = returns_panel(vec![vec![0.0]; 3], &["A"]);
        assert!(matches!(
            signal.scores(&returns),
            Err(UmdError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_insufficient_history() {
        let returns = returns_panel(vec![vec![0.01, 0.02]; 12], &["A", "B"]);
        let scores = UmdMomentum::default().scores(&returns).unwrap();

        assert!(
            scores
                .values()
                .iter()
                .all(|s| *s == Observation::InsufficientHistory)
        );
    }

    #[test]
    fn test_window_skips_recent_periods() {
        // 13 rows: only row 12 is scored, over rows 0..=10.
        let mut rows = vec![vec![0.0, 0.0]; 13];
        rows[0][1] = 0.2; // t - 12: inside the window
        rows[10][0] = 0.1; // t - 2: inside the window
        rows[11][0] = 5.0; // t - 1: skipped
        rows[12][1] = 5.0; // t: skipped
        let returns = returns_panel(rows, &["A", "B"]);

        let scores = UmdMomentum::default().scores(&returns).unwrap();
        assert_eq!(scores.row(11)[0], Observation::InsufficientHistory);
        assert_relative_eq!(scores.row(12)[0].value().unwrap(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(scores.row(12)[1].value().unwrap(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_window_compounds() {
        let returns = returns_panel(vec![vec![0.01]; 13], &["A"]);
        let scores = UmdMomentum::default().scores(&returns).unwrap();
        assert_relative_eq!(
            scores.row(12)[0].value().unwrap(),
            1.01_f64.powi(11) - 1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_missing_return_in_window() {
        let mut rows = vec![vec![0.01, 0.02]; 14];
        rows[5][0] = f64::NAN;
        let returns = returns_panel(rows, &["A", "B"]);

        let scores = UmdMomentum::default().scores(&returns).unwrap();
        assert_eq!(scores.row(12)[0], Observation::MissingData);
        assert!(scores.row(12)[1].is_value());
        // Row 13 still covers row 5 (window 1..=11).
        assert_eq!(scores.row(13)[0], Observation::MissingData);
    }

    #[test]
    fn test_constant_returns_rank_in_column_order() {
        let returns = returns_panel(vec![vec![0.01; 4]; 14], &["BTC", "ETH", "BNB", "ADA"]);
        let ranks = UmdMomentum::default().rank(&returns).unwrap();

        for t in 12..14 {
            let row: Vec<usize> = ranks.row(t).iter().map(|r| r.value().unwrap()).collect();
            assert_eq!(row, vec![1, 2, 3, 4]);
        }
        for t in 0..12 {
            assert!(ranks.row(t).iter().all(|r| !r.is_value()));
        }
    }

    #[test]
    fn test_consistent_winner_ranks_first() {
        let rows: Vec<Vec<f64>> = (0..20)
            .map(|i| {
                let base = 0.001 * (i % 3) as f64;
                vec![base, base - 0.01, base + 0.03, base - 0.02]
            })
            .collect();
        let returns = returns_panel(rows, &["A", "B", "WIN", "D"]);

        let ranks = UmdMomentum::default().rank(&returns).unwrap();
        for t in 12..20 {
            assert_eq!(ranks.row(t)[2], Observation::Value(1));
        }
    }
}
