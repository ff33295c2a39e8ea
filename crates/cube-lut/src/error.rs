//! LUT error types.

use thiserror::Error;

/// Result type for LUT operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors that can occur when reading or writing LUT files.
#[derive(Debug, Error)]
pub enum LutError {
    /// Malformed line content while parsing a LUT file.
    #[error("parse error: {0}")]
    Parse(String),

    /// Declared table size does not match the number of data rows.
    #[error("table size mismatch: declared sizes require {expected} rows, found {found}")]
    TableSizeMismatch {
        /// Row count implied by the size directives
        expected: usize,
        /// Row count actually present in the file
        found: usize,
    },

    /// Domain is not expressible in the format (channels do not share
    /// a single pair of endpoints).
    #[error("{stage} domain is not uniform: the format requires one min and one max shared by all channels")]
    NonUniformDomain {
        /// Which stage failed validation ("shaper" or "cube")
        stage: &'static str,
    },

    /// Table size outside the range the format allows.
    #[error("{stage} size {size} out of range [{min}, {max}]")]
    SizeOutOfRange {
        /// Which stage failed validation ("shaper" or "cube")
        stage: &'static str,
        /// The offending size
        size: usize,
        /// Smallest allowed size
        min: usize,
        /// Largest allowed size
        max: usize,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
