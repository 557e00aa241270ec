//! Error types for study storage and sampling.

use std::path::PathBuf;

use crate::store::Direction;

/// Errors raised by the study store or while sampling parameters.
#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    /// An I/O error occurred while reading or writing study files.
    #[error("study I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A study or trial record could not be (de)serialized.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the failure.
        reason: String,
    },

    /// An existing study was opened with a different direction.
    #[error("study '{name}' was created to {stored}, cannot reopen it to {requested}")]
    DirectionMismatch {
        /// The study name.
        name: String,
        /// Direction stored with the study.
        stored: Direction,
        /// Direction requested by this worker.
        requested: Direction,
    },

    /// A categorical parameter was sampled from an empty choice list.
    #[error("parameter '{name}' has no choices")]
    EmptyChoices {
        /// The parameter name.
        name: String,
    },

    /// An integer parameter was sampled from an empty or unrepresentable range.
    #[error("parameter '{name}' has invalid range [{low}, {high}]")]
    InvalidRange {
        /// The parameter name.
        name: String,
        /// Lower bound.
        low: i64,
        /// Upper bound.
        high: i64,
    },
}
