//! Max-skew scan over the skew-group summary rows of a clock log.

use std::path::Path;

use ctstune_common::MetricPair;
use tracing::debug;

use crate::error::ReportError;

/// Prefix of the half-corner name of the slow-slow setup corner.
pub const DEFAULT_CORNER_MARKER: &str = "ssgnp_";

/// Substring identifying rows of the clock skew groups.
pub const DEFAULT_GROUP_MARKER: &str = "CLK/";

/// Field positions relative to the half-corner token of a summary row.
///
/// The row reads `<half-corner> <skew group> <min id> <max id> <skew> ...`;
/// the max insertion delay is the latency. Leading fields such as log
/// timestamps are skipped because offsets are counted from the marker token,
/// not from the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Offset of the latency (max ID) field.
    pub latency_offset: usize,
    /// Offset of the skew field.
    pub skew_offset: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            latency_offset: 3,
            skew_offset: 4,
        }
    }
}

/// Scans a clock report for the worst-skew row of the target corner.
///
/// A row is a candidate when the line contains both the corner marker and
/// the group marker as substrings. Matching is by containment on purpose:
/// the tool's output format is fixed and corner names carry voltage and
/// temperature suffixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkewReportScanner {
    corner_marker: String,
    group_marker: String,
    layout: ColumnLayout,
}

impl Default for SkewReportScanner {
    fn default() -> Self {
        Self::new(DEFAULT_CORNER_MARKER, DEFAULT_GROUP_MARKER)
    }
}

impl SkewReportScanner {
    /// Creates a scanner with the default column layout.
    pub fn new(corner_marker: impl Into<String>, group_marker: impl Into<String>) -> Self {
        Self {
            corner_marker: corner_marker.into(),
            group_marker: group_marker.into(),
            layout: ColumnLayout::default(),
        }
    }

    /// Replaces the column layout.
    pub fn with_layout(mut self, layout: ColumnLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Returns the corner marker.
    pub fn corner_marker(&self) -> &str {
        &self.corner_marker
    }

    /// Returns the group marker.
    pub fn group_marker(&self) -> &str {
        &self.group_marker
    }

    /// Parses one line, returning its metrics if it is a well-formed row.
    pub fn parse_row(&self, line: &str) -> Option<MetricPair> {
        if !line.contains(&self.corner_marker) || !line.contains(&self.group_marker) {
            return None;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let base = tokens
            .iter()
            .position(|tok| tok.starts_with(&self.corner_marker))?;
        let field = |offset: usize| {
            tokens
                .get(base + offset)?
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
        };
        let latency = field(self.layout.latency_offset)?;
        let skew = field(self.layout.skew_offset)?;
        Some(MetricPair::new(latency, skew))
    }

    /// Scans report text and returns the metrics of the maximum-skew row.
    ///
    /// Ties keep the earlier row. Returns `None` if no row parses.
    pub fn scan_str(&self, content: &str) -> Option<MetricPair> {
        let mut best: Option<MetricPair> = None;
        let mut rows = 0usize;
        for metrics in content.lines().filter_map(|line| self.parse_row(line)) {
            rows += 1;
            if best.map_or(true, |b| metrics.skew > b.skew) {
                best = Some(metrics);
            }
        }
        debug!(rows, found = best.is_some(), "scanned skew-group rows");
        best
    }

    /// Reads and scans a report file.
    pub fn scan_file(&self, path: &Path) -> Result<Option<MetricPair>, ReportError> {
        let content = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.scan_str(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const REPORT: &str = "\
2026-01-27 14:12:02:DEBUG: Skew Group Structure:
2026-01-27 14:12:02:DEBUG: Half-corner                     Skew Group   Min ID   Max ID   Skew    Skew Band
2026-01-27 14:12:02:DEBUG: -------------------------------------------------------------------------------
2026-01-27 14:12:02:DEBUG: ssgnp_0p55v_m40c:hold.early     CLK/func     0.051    0.083    0.032   0.020
2026-01-27 14:12:02:DEBUG: ssgnp_0p55v_0c:setup.late       CLK/func     0.062    0.112    0.050   0.030
2026-01-27 14:12:02:DEBUG: ssgnp_0p55v_0c:setup.late       CLK/scan     0.041    0.071    0.030   0.010
2026-01-27 14:12:02:DEBUG: ffgnp_0p88v_125c:hold.early     CLK/func     0.021    0.031    0.090   0.010
";

    #[test]
    fn selects_maximum_skew_row() {
        let m = SkewReportScanner::default().scan_str(REPORT).unwrap();
        assert_eq!(m, MetricPair::new(0.112, 0.050));
    }

    #[test]
    fn latency_comes_from_max_skew_row_not_max_latency_row() {
        let report = "\
ssgnp_a:setup.late CLK/a 0.01 0.300 0.010
ssgnp_b:setup.late CLK/b 0.01 0.100 0.070
ssgnp_c:setup.late CLK/c 0.01 0.200 0.020
";
        let m = SkewReportScanner::default().scan_str(report).unwrap();
        assert_eq!(m, MetricPair::new(0.100, 0.070));
    }

    #[test]
    fn ties_keep_first_row() {
        let report = "\
ssgnp_a:setup.late CLK/a 0.01 0.090 0.040
ssgnp_b:setup.late CLK/b 0.01 0.120 0.040
";
        let m = SkewReportScanner::default().scan_str(report).unwrap();
        assert_eq!(m.latency, 0.090);
    }

    #[test]
    fn no_matching_rows() {
        let scanner = SkewReportScanner::default();
        assert_eq!(scanner.scan_str(""), None);
        assert_eq!(scanner.scan_str("nothing to see\nat all\n"), None);
        // corner marker without the group marker
        assert_eq!(scanner.scan_str("ssgnp_0p55v:setup.late grp 0.1 0.2 0.3\n"), None);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let report = "\
ssgnp_a:setup.late CLK/a 0.01 0.300
ssgnp_b:setup.late CLK/b 0.01 n/a 0.900
ssgnp_c:setup.late CLK/c 0.01 0.080 0.030
";
        let m = SkewReportScanner::default().scan_str(report).unwrap();
        assert_eq!(m, MetricPair::new(0.080, 0.030));
    }

    #[test]
    fn non_finite_fields_are_skipped() {
        let report = "\
ssgnp_a:setup.late CLK/a 0.01 0.100 NaN
ssgnp_b:setup.late CLK/b 0.01 0.120 0.090
ssgnp_c:setup.late CLK/c 0.01 inf 0.500
ssgnp_d:setup.late CLK/d 0.01 0.130 -inf
";
        let scanner = SkewReportScanner::default();
        assert_eq!(scanner.parse_row("ssgnp_a:setup.late CLK/a 0.01 0.100 nan"), None);
        let m = scanner.scan_str(report).unwrap();
        assert_eq!(m, MetricPair::new(0.120, 0.090));
    }

    #[test]
    fn marker_inside_token_is_not_an_anchor() {
        // both markers occur, but no token starts with the corner marker
        let report = "corner=ssgnp_x CLK/a 0.1 0.2 0.3 0.4\n";
        assert_eq!(SkewReportScanner::default().scan_str(report), None);
    }

    #[test]
    fn offsets_count_from_marker_token() {
        let scanner = SkewReportScanner::default();
        let plain = scanner.parse_row("ssgnp_x:setup.late CLK/a 0.01 0.10 0.05");
        let stamped =
            scanner.parse_row("2026-01-27 10:00:00:DEBUG: ssgnp_x:setup.late CLK/a 0.01 0.10 0.05");
        assert_eq!(plain, stamped);
        assert_eq!(plain, Some(MetricPair::new(0.10, 0.05)));
    }

    #[test]
    fn custom_layout() {
        let scanner = SkewReportScanner::default().with_layout(ColumnLayout {
            latency_offset: 4,
            skew_offset: 5,
        });
        let line = "2026-01-27 10:00:00:DEBUG: ssgnp_0p55v_0c:setup.late CLK/grpA id12 id7 0.0980 0.0512";
        assert_eq!(scanner.parse_row(line), Some(MetricPair::new(0.0980, 0.0512)));
    }

    #[test]
    fn custom_markers() {
        let scanner = SkewReportScanner::new("tt_", "clk_core/");
        let report = "tt_0p75v_25c:setup.late clk_core/main 0.02 0.07 0.011\n";
        assert_eq!(scanner.scan_str(report), Some(MetricPair::new(0.07, 0.011)));
    }

    #[test]
    fn scan_file_reads_report() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(REPORT.as_bytes()).unwrap();
        let m = SkewReportScanner::default().scan_file(file.path()).unwrap();
        assert_eq!(m, Some(MetricPair::new(0.112, 0.050)));
    }

    #[test]
    fn scan_missing_file_is_error() {
        let err = SkewReportScanner::default()
            .scan_file(Path::new("/nonexistent/clock.log"))
            .unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }
}
