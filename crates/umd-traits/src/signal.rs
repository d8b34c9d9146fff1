//! Signal trait for cross-sectional score sources.
//!
//! A [`Signal`] turns a return panel into a score panel of the same shape.
//! Each row is scored using only information available at that row, and
//! rows without enough history are marked
//! [`Observation::InsufficientHistory`](crate::Observation) rather than
//! guessed.

use crate::{Result, ReturnTable, ScoreTable};

/// A cross-sectional signal that scores every asset in every period.
///
/// Implementations should be thread-safe (`Send + Sync`) so they can be
/// shared behind a `Box<dyn Signal>`.
///
/// # Example
///
/// ```no_run
/// use umd_traits::{Observation, Result, ReturnTable, ScoreTable, Signal};
///
/// struct LastReturn;
///
/// impl Signal for LastReturn {
///     fn name(&self) -> &str {
///         "last_return"
///     }
///
///     fn scores(&self, returns: &ReturnTable) -> Result<ScoreTable> {
///         Ok(returns.map(|r| {
///             if r.is_finite() {
///                 Observation::Value(*r)
///             } else {
///                 Observation::MissingData
///             }
///         }))
///     }
///
///     fn lookback(&self) -> usize {
///         0
///     }
/// }
/// ```
pub trait Signal: Send + Sync {
    /// Returns the name of this signal, used in logs and reports.
    fn name(&self) -> &str;

    /// Scores every asset in every period of `returns`.
    ///
    /// The result has the same dates and symbols as the input; higher scores
    /// are better.
    ///
    /// # Errors
    ///
    /// Returns an error if the signal's configuration is invalid for the input.
    fn scores(&self, returns: &ReturnTable) -> Result<ScoreTable>;

    /// Number of prior periods a row needs before it can be scored.
    fn lookback(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Date, Observation, Panel};
    use ndarray::array;

    struct ConstantSignal;

    impl Signal for ConstantSignal {
        fn name(&self) -> &str {
            "constant"
        }

        fn scores(&self, returns: &ReturnTable) -> Result<ScoreTable> {
            Ok(returns.map(|_| Observation::Value(1.0)))
        }

        fn lookback(&self) -> usize {
            0
        }
    }

    #[test]
    fn test_signal_scores_keep_index() {
        let returns = Panel::new(
            vec![Date::from_ymd_opt(2024, 1, 31).unwrap()],
            vec!["A".to_string(), "B".to_string()],
            array![[0.01, 0.02]],
        )
        .unwrap();

        let scores = ConstantSignal.scores(&returns).unwrap();
        assert!(scores.same_index(&returns));
        assert_eq!(scores.row(0)[1], Observation::Value(1.0));
        assert_eq!(ConstantSignal.name(), "constant");
        assert_eq!(ConstantSignal.lookback(), 0);
    }

    #[test]
    fn test_signal_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Box<dyn Signal>>();
    }
}
