//! Error types for the UMD backtester.
//!
//! Every fallible operation in the library crates returns [`UmdError`].
//! Failures of the external price feed are collapsed into a single
//! [`UmdError::DataUnavailable`] class so callers can tell them apart from
//! malformed input or configuration.

use thiserror::Error;

/// The main error type for UMD operations.
#[derive(Debug, Error)]
pub enum UmdError {
    /// Error due to invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error due to an invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error when data is insufficient for the requested operation.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Error when a date is out of range or invalid.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// The external price feed could not deliver data.
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for UmdError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for UmdError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

impl From<ndarray::ShapeError> for UmdError {
    fn from(e: ndarray::ShapeError) -> Self {
        Self::InvalidData(format!("panel shape mismatch: {e}"))
    }
}

/// A specialized Result type for UMD operations.
pub type Result<T> = std::result::Result<T, UmdError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UmdError::DataUnavailable("timeout".to_string());
        assert_eq!(err.to_string(), "Data unavailable: timeout");

        let err = UmdError::InvalidConfig("num_quantiles must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: num_quantiles must be positive"
        );
    }

    #[test]
    fn test_error_from_string() {
        let err: UmdError = "boom".into();
        assert!(matches!(err, UmdError::Other(_)));
    }

    #[test]
    fn test_shape_error_is_invalid_data() {
        let shape_err = ndarray::Array2::<f64>::from_shape_vec((2, 2), vec![1.0]).unwrap_err();
        let err = UmdError::from(shape_err);
        assert!(matches!(err, UmdError::InvalidData(_)));
    }
}
