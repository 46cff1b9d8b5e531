//! Error types for the indicator engine.
//!
//! Every transform either returns a complete output or one of these errors.
//! Nothing is retried and no partial series is ever returned.

use thiserror::Error;

/// Errors raised by indicator transforms.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    /// The window is zero or longer than the series it slides over.
    #[error("invalid window {window} for a series of length {len}")]
    InvalidWindow { window: usize, len: usize },

    /// The series is too short for a composite indicator's fixed windows.
    #[error("insufficient data for {indicator}: required {required} values, got {actual}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        actual: usize,
    },

    /// A stochastic window where the highest high equals the lowest low.
    #[error("degenerate high-low range in stochastic window starting at day {index}")]
    DegenerateRange { index: usize },

    /// A mean or recursion step left the finite range of `f64`.
    #[error("{indicator} produced a non-finite value at output index {index}")]
    NumericOverflow { indicator: &'static str, index: usize },

    /// The EMA seed is NaN or infinite.
    #[error("EMA seed must be finite, got {seed}")]
    NonFiniteSeed { seed: f64 },

    /// Parallel price series disagree on length.
    #[error("series '{series}' has length {actual}, expected {expected}")]
    LengthMismatch {
        series: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Convenience alias for indicator results.
pub type Result<T> = std::result::Result<T, IndicatorError>;
