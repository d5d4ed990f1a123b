//! Error types for response modeling.

use thiserror::Error;

use crate::transfer::TransferDomain;
use crate::units::Unit;

/// Errors raised while building or evaluating instrument responses.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResponseError {
    /// Normalization needs a positive, finite reference frequency.
    #[error("normalization is undefined at reference frequency {0} Hz")]
    UndefinedReferenceFrequency(f64),

    /// The pole/zero domain has no Laplace variable.
    #[error("cannot evaluate {0} poles and zeros as an analog response")]
    UnsupportedDomain(TransferDomain),

    /// Sinc synthesis was asked for an empty or zero-order filter.
    #[error("invalid sinc filter parameters: order {order}, length {length}")]
    InvalidSincParameters {
        /// Requested sinc order.
        order: usize,
        /// Requested boxcar length.
        length: usize,
    },

    /// A chain with no stages has no response.
    #[error("response chain has no stages")]
    EmptyChain,

    /// Adjacent stages do not agree on their shared unit.
    #[error("stage {sequence} outputs {output} but stage {} expects {input}", .sequence + 1)]
    UnitMismatch {
        /// Sequence number of the upstream stage.
        sequence: u32,
        /// Output unit of the upstream stage.
        output: Unit,
        /// Input unit of the downstream stage.
        input: Unit,
    },

    /// Analog stages in one chain were normalized at different frequencies.
    #[error(
        "stage {sequence} is normalized at {found} Hz but the chain uses {expected} Hz"
    )]
    ReferenceFrequencyMismatch {
        /// Sequence number of the offending stage.
        sequence: u32,
        /// Reference frequency shared by earlier stages.
        expected: f64,
        /// Reference frequency of the offending stage.
        found: f64,
    },

    /// Polynomial stages may only appear as the first (sensor) stage.
    #[error("polynomial stage at sequence {0}; only the sensor stage may be polynomial")]
    MisplacedPolynomial(u32),

    /// A polynomial response has no complex frequency response.
    #[error("stage '{0}' is non-linear and has no frequency response")]
    NonLinearStage(String),

    /// The overall polynomial could not be derived from the digitizer gain.
    #[error("cannot derive polynomial sensitivity: {0}")]
    PolynomialDerivation(String),

    /// A sequence range outside `1..=N` was requested.
    #[error("stage range {first}..={last} is outside 1..={len}")]
    StageRange {
        /// First requested sequence number.
        first: u32,
        /// Last requested sequence number.
        last: u32,
        /// Number of stages in the chain.
        len: usize,
    },

    /// The chain has nothing that can be written as SAC poles and zeros.
    #[error("chain has no normalized pole-zero stage to export")]
    NoPoleZeroStage,

    /// The chain's sensitivity is polynomial or could not be derived.
    #[error("chain has no scalar sensitivity")]
    NoScalarSensitivity,
}

/// Convenience result type for response operations.
pub type Result<T> = std::result::Result<T, ResponseError>;
