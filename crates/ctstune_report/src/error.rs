//! Error types for report parsing.

use std::path::PathBuf;

/// Errors raised while reading or configuring a report parser.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The report file could not be read.
    #[error("failed to read report {path}: {source}")]
    Io {
        /// The report path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A configured marker produced an invalid pattern.
    #[error("invalid report pattern: {0}")]
    Pattern(#[from] regex::Error),
}
