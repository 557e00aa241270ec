//! Standard-cell identifiers and the attributes encoded in them.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Matches the drive-strength segment of a cell name: `D4`, `D12`, `D1P5`.
fn drive_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"D(\d+P\d+|\d+)").expect("valid drive-strength pattern"))
}

/// A buffer or inverter cell, identified by its library name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell(String);

impl Cell {
    /// Wraps a cell name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the cell name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the name contains `vt_class`.
    ///
    /// This is plain substring containment, so `LVT` also matches `ULVTLL`
    /// and `LVTLL` cells. The library naming is fixed by the foundry and the
    /// search space relies on exactly this behavior.
    pub fn matches_vt(&self, vt_class: &str) -> bool {
        self.0.contains(vt_class)
    }

    /// Returns `true` if the name starts with `prefix`.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Decodes the drive strength from the first `D<n>` or `D<n>P<m>` segment.
    ///
    /// `P` stands for the decimal point, so `BUFD1P5_LVT` has strength 1.5.
    /// Returns `None` when the name carries no such segment.
    pub fn drive_strength(&self) -> Option<f64> {
        let caps = drive_pattern().captures(&self.0)?;
        caps.get(1)?.as_str().replace('P', ".").parse().ok()
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell({})", self.0)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cell {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
