//! Error types for the decode pipeline
//!
//! Two scopes exist. [`Error`] is fatal to a whole call and only arises from
//! structurally invalid input or a violated access contract. [`DecodeError`]
//! belongs to a single symbol candidate and is recorded in that candidate's
//! result without affecting its siblings.

use thiserror::Error;

/// Call-fatal errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Pixel buffer does not match the declared dimensions, or a dimension is zero.
    #[error("invalid dimensions: {width}x{height} with {len} samples")]
    InvalidDimensions {
        /// Declared width
        width: usize,
        /// Declared height
        height: usize,
        /// Number of samples supplied
        len: usize,
    },

    /// Pixel access outside the image.
    #[error("pixel ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        /// Requested column
        x: usize,
        /// Requested row
        y: usize,
        /// Image width
        width: usize,
        /// Image height
        height: usize,
    },
}

/// Per-candidate decode failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Module count along the finder edges does not map to a version 1-40,
    /// or the two edges disagree.
    #[error("unrecognized symbol version")]
    UnrecognizedVersion,

    /// Both format information copies are beyond BCH correction.
    #[error("format information is uncorrectable")]
    FormatError,

    /// A Reed-Solomon block holds more errors than it can correct.
    #[error("data codewords are uncorrectable")]
    UncorrectableData,

    /// The corrected bit stream has an invalid mode or overruns its length.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl DecodeError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPayload(reason.into())
    }
}

/// Result alias for call-fatal operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
