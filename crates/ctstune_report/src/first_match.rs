//! Single-pattern, first-match report parser for manual inspection.

use std::path::Path;

use ctstune_common::MetricPair;
use regex::Regex;

use crate::error::ReportError;
use crate::scanner::DEFAULT_CORNER_MARKER;

/// Timing check suffix of the half-corner name.
pub const DEFAULT_CHECK_MARKER: &str = "setup.late";

/// Matches one line of a standalone CCOpt skew-group report.
///
/// The line must start with the corner marker and carry `:<check>` in the
/// half-corner name. Latency is the fourth field after the half-corner and
/// skew the ninth. Only the first matching line is used; unlike
/// [`SkewReportScanner`](crate::SkewReportScanner) this parser does not look
/// for the worst row.
#[derive(Debug, Clone)]
pub struct FirstMatchParser {
    pattern: Regex,
}

impl FirstMatchParser {
    /// Builds the parser for a corner marker and timing check.
    pub fn new(corner_marker: &str, check_marker: &str) -> Result<Self, ReportError> {
        let source = format!(
            r"(?m)^{}.*:{}\s+\S+\s+\S+\s+\S+\s+(\d+\.\d+)\s+\S+\s+\S+\s+\S+\s+\S+\s+(\d+\.\d+)",
            regex::escape(corner_marker),
            regex::escape(check_marker),
        );
        Ok(Self {
            pattern: Regex::new(&source)?,
        })
    }

    /// Parses report text, returning the first matching row.
    pub fn parse_str(&self, content: &str) -> Option<MetricPair> {
        let caps = self.pattern.captures(content)?;
        let latency = caps.get(1)?.as_str().parse().ok()?;
        let skew = caps.get(2)?.as_str().parse().ok()?;
        Some(MetricPair::new(latency, skew))
    }

    /// Reads and parses a report file.
    pub fn parse_file(&self, path: &Path) -> Result<Option<MetricPair>, ReportError> {
        let content = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.parse_str(&content))
    }
}

impl Default for FirstMatchParser {
    fn default() -> Self {
        Self::new(DEFAULT_CORNER_MARKER, DEFAULT_CHECK_MARKER)
            .expect("default markers form a valid pattern")
    }
}
