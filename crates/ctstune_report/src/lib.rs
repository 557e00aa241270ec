//! Extraction of clock latency and skew from CTS report text.
//!
//! Two policies are provided and kept deliberately separate:
//!
//! - [`SkewReportScanner`] scans every skew-group row of the target corner and
//!   keeps the row with the largest skew. This is what the optimizer uses: an
//!   early-mode corner or a minor skew group printed first must not win.
//! - [`FirstMatchParser`] matches one full-line pattern and returns the first
//!   hit. It is meant for quick manual inspection of a single report.
//!
//! Both return `None` when nothing matches; neither treats a malformed row as
//! fatal.

#![warn(missing_docs)]

pub mod error;
pub mod first_match;
pub mod scanner;

pub use error::ReportError;
pub use first_match::{FirstMatchParser, DEFAULT_CHECK_MARKER};
pub use scanner::{ColumnLayout, SkewReportScanner, DEFAULT_CORNER_MARKER, DEFAULT_GROUP_MARKER};
