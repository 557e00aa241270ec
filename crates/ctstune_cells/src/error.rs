//! Error types for catalog loading.

use std::path::PathBuf;

/// Errors raised while loading a cell catalog.
///
/// Both variants are fatal at startup: no trial can run without a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CellError {
    /// The catalog file could not be read.
    #[error("failed to read cell catalog {path}: {source}")]
    Io {
        /// The catalog path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The catalog file contained no cell names.
    #[error("cell catalog {path} is empty")]
    EmptyCatalog {
        /// The catalog path.
        path: PathBuf,
    },
}
