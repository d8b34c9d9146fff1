//! Statistical utility functions shared by the signal and evaluation crates.

/// Minimum threshold for standard deviation to avoid division by zero.
/// Values below this threshold are treated as zero variance.
pub const MIN_STD_THRESHOLD: f64 = 1e-10;

/// Arithmetic mean. Returns `NaN` for empty input; `NaN` inputs propagate.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (N-1 denominator, Bessel's correction).
///
/// Returns `NaN` for fewer than two values; `NaN` inputs propagate.
///
/// # Examples
///
/// ```
/// use umd_traits::stats::sample_std;
///
/// let std = sample_std(&[1.0, 2.0, 3.0, 4.0, 5.0]);
/// assert!((std - 2.5_f64.sqrt()).abs() < 1e-12);
/// ```
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }

    let m = mean(values);
    let variance = values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Compounded return of a sequence of simple returns: `Π(1 + r) - 1`.
///
/// Returns `None` if any return is not finite.
pub fn compound_return<I>(returns: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    returns
        .into_iter()
        .try_fold(1.0, |acc, r| r.is_finite().then(|| acc * (1.0 + r)))
        .map(|growth| growth - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
        assert!(mean(&[]).is_nan());
        assert!(mean(&[1.0, f64::NAN]).is_nan());
    }

    #[test]
    fn test_sample_std() {
        let std = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_relative_eq!(std, (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_sample_std_degenerate() {
        assert!(sample_std(&[]).is_nan());
        assert!(sample_std(&[1.0]).is_nan());
        assert_eq!(sample_std(&[0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_compound_return() {
        let r = compound_return([0.1, -0.1]).unwrap();
        assert_relative_eq!(r, -0.01, epsilon = 1e-12);
        assert_eq!(compound_return(std::iter::empty::<f64>()), Some(0.0));
    }

    #[test]
    fn test_compound_return_missing() {
        assert!(compound_return([0.1, f64::NAN, 0.2]).is_none());
    }
}
