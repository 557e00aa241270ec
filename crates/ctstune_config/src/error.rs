//! Errors raised while reading a worker configuration.

/// Why a `ctstune.toml` could not be turned into a [`TunerConfig`].
///
/// [`TunerConfig`]: crate::TunerConfig
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file named by `--config` could not be read.
    #[error("cannot read ctstune configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The file is not valid TOML or has keys of the wrong type.
    #[error("malformed ctstune configuration: {0}")]
    ParseError(String),

    /// A flow, study or report setting that names something was left empty.
    #[error("setting `{0}` must not be empty")]
    MissingField(String),

    /// Search bounds, objective terms or report offsets are inconsistent.
    #[error("invalid tuning setting: {0}")]
    ValidationError(String),
}
