//! Error types for HistGrid

use thiserror::Error;

/// HistGrid error type
#[derive(Error, Debug)]
pub enum Error {
    /// A selector component is out of bounds for its axis.
    #[error("index {value} out of bounds for axis {axis} with size {size}")]
    IndexConstraint {
        /// Offending grid axis.
        axis: usize,
        /// Offending selector value.
        value: i64,
        /// Size of that axis.
        size: usize,
    },

    /// A selector addresses more grid axes than the grid has.
    #[error("selector addresses {given} axes but the grid has rank {rank}")]
    SelectorRank {
        /// Grid rank.
        rank: usize,
        /// Number of axis-consuming selector components.
        given: usize,
    },

    /// An array does not have the shape the operation requires.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Required shape.
        expected: Vec<usize>,
        /// Shape that was supplied.
        got: Vec<usize>,
    },

    /// Two histograms differ in shape or bin edges.
    #[error("incompatible histograms: {0}")]
    IncompatibleHistogram(String),

    /// Unknown bin position method for mean/std.
    #[error("unsupported statistic method: '{0}'")]
    UnsupportedMethod(String),

    /// Unknown persistence format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A bin count would exceed `u32::MAX`.
    #[error("count overflow while merging histograms")]
    CountOverflow,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// `true` for the index/shape constraint family (bad selector or batch shape).
    pub fn is_index_constraint(&self) -> bool {
        matches!(
            self,
            Error::IndexConstraint { .. } | Error::SelectorRank { .. } | Error::ShapeMismatch { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
