//! Parsing and validation of `ctstune.toml` worker configuration files.
//!
//! Every setting has a default, so the file is optional. The CLI loads this
//! configuration first and applies its flags on top; the resulting
//! [`TunerConfig`] is then passed by value into the evaluator and the loop
//! driver. Nothing reads configuration from global state.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, validate_config};
pub use types::*;
