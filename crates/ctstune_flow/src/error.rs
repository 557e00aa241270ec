//! Error types for per-trial flow artifacts.

use std::path::PathBuf;

/// Errors raised while preparing a trial's files.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// Writing a per-trial artifact failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The path being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
