//! Error types for spectral analysis.

use thiserror::Error;

/// Errors raised by spectral estimation and fitting.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// Inputs that must share a frequency grid or sample count do not.
    #[error("length mismatch: {what} has {found} values, expected {expected}")]
    LengthMismatch {
        /// Which input is out of step.
        what: &'static str,
        /// Expected number of values.
        expected: usize,
        /// Actual number of values.
        found: usize,
    },

    /// The FFT length must be at least 2.
    #[error("invalid FFT length {0}")]
    InvalidFftLength(usize),

    /// Overlap must lie in `[0, 1)`.
    #[error("invalid segment overlap {0}; expected 0 <= overlap < 1")]
    InvalidOverlap(f64),

    /// Sample rate must be positive and finite.
    #[error("invalid sample rate {0} Hz")]
    InvalidSampleRate(f64),

    /// No samples were supplied.
    #[error("signal is empty")]
    EmptySignal,

    /// Least squares needs two distinct abscissae.
    #[error("not enough distinct points for a fit ({0} given)")]
    InsufficientData(usize),
}

/// Convenience result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
