//! Error types for the Term statistics engine.
//!
//! All fallible operations in this crate return [`StatsError`]. Every failure is
//! raised synchronously at the call site; computations are deterministic, so a
//! retry with the same input reproduces the same error.

use thiserror::Error;

/// The main error type for the statistics engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// No valid numeric entries remained after filtering null and NaN values.
    #[error("No valid numeric data available for analysis")]
    DataEmpty,

    /// Too few observations for the requested computation.
    #[error("Insufficient data: at least {required} points required, got {actual}")]
    InsufficientData {
        /// Minimum number of points required
        required: usize,
        /// Number of points supplied
        actual: usize,
    },

    /// Moving-average window is zero or longer than the series.
    #[error("Invalid window size {window} for series of length {len}")]
    InvalidWindow {
        /// Requested window size
        window: usize,
        /// Length of the input series
        len: usize,
    },

    /// Smoothing factor outside `[0, 1]`.
    #[error("Smoothing factor must be within [0, 1], got {0}")]
    InvalidAlpha(f64),

    /// Malformed input, such as a non-finite value where a number is required.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error related to configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A type alias for `Result<T, StatsError>`.
///
/// # Examples
///
/// ```rust
/// use term_stats::error::{Result, StatsError};
///
/// fn non_empty(values: &[f64]) -> Result<()> {
///     if values.is_empty() {
///         return Err(StatsError::DataEmpty);
///     }
///     Ok(())
/// }
///
/// assert!(non_empty(&[]).is_err());
/// ```
pub type Result<T> = std::result::Result<T, StatsError>;

impl StatsError {
    /// Creates a new invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Creates a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an insufficient data error.
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// Returns a short, stable name for the error kind.
    ///
    /// Used as a structured field when failures are reported to a diagnostic sink.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DataEmpty => "data_empty",
            Self::InsufficientData { .. } => "insufficient_data",
            Self::InvalidWindow { .. } => "invalid_window",
            Self::InvalidAlpha(_) => "invalid_alpha",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Configuration(_) => "configuration",
            Self::Serialization(_) => "serialization",
        }
    }
}

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Ensures every value is finite, naming the first offending position.
pub(crate) fn ensure_finite<I>(values: I, what: &str) -> Result<()>
where
    I: IntoIterator<Item = f64>,
{
    match values.into_iter().position(|v| !v.is_finite()) {
        Some(index) => Err(StatsError::invalid_argument(format!(
            "{what} at index {index} is not a finite number"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_empty_message() {
        let err = StatsError::DataEmpty;
        assert_eq!(
            err.to_string(),
            "No valid numeric data available for analysis"
        );
        assert_eq!(err.kind(), "data_empty");
    }

    #[test]
    fn test_insufficient_data_message() {
        let err = StatsError::insufficient_data(2, 1);
        assert_eq!(
            err.to_string(),
            "Insufficient data: at least 2 points required, got 1"
        );
    }

    #[test]
    fn test_invalid_window_message() {
        let err = StatsError::InvalidWindow { window: 0, len: 5 };
        assert_eq!(err.to_string(), "Invalid window size 0 for series of length 5");
        assert_eq!(err.kind(), "invalid_window");
    }

    #[test]
    fn test_invalid_alpha_message() {
        let err = StatsError::InvalidAlpha(1.5);
        assert_eq!(err.to_string(), "Smoothing factor must be within [0, 1], got 1.5");
    }

    #[test]
    fn test_serde_json_conversion() {
        let parse_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: StatsError = parse_error.into();
        assert!(matches!(err, StatsError::Serialization(_)));
    }

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite([1.0, 2.0], "value").is_ok());

        let err = ensure_finite([1.0, f64::NAN, 3.0], "value").unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }
}
