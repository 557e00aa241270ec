//! Clock-tree metrics recovered from a CTS report.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum clock latency and clock skew of one skew-group row, in ns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPair {
    /// Maximum insertion delay (the "Max ID" column).
    pub latency: f64,
    /// Skew of the same row.
    pub skew: f64,
}

impl MetricPair {
    /// Creates a metric pair from a latency and a skew value.
    pub fn new(latency: f64, skew: f64) -> Self {
        Self { latency, skew }
    }
}

impl fmt::Display for MetricPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "latency {} ns, skew {} ns", self.latency, self.skew)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let m = MetricPair::new(0.098, 0.0512);
        assert_eq!(m.to_string(), "latency 0.098 ns, skew 0.0512 ns");
    }

    #[test]
    fn serde_roundtrip() {
        let m = MetricPair::new(0.1, 0.05);
        let json = serde_json::to_string(&m).unwrap();
        let back: MetricPair = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }
}
