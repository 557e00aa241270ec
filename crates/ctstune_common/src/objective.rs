//! Scalar objective scoring with a soft skew constraint.

use crate::metrics::MetricPair;

/// Objective value reported for any configuration that could not be evaluated.
///
/// The optimizer minimizes, so `+inf` marks a trial as unusable without
/// aborting the search.
pub const INFEASIBLE: f64 = f64::INFINITY;

/// Default skew constraint in ns.
pub const DEFAULT_SKEW_CONSTRAINT: f64 = 0.06;

/// Default multiplier applied to the skew excess.
pub const DEFAULT_PENALTY_SCALE: f64 = 100.0;

/// Turns a [`MetricPair`] into the scalar the optimizer minimizes.
///
/// The objective is the latency. When the skew exceeds the constraint, the
/// excess multiplied by `penalty_scale` is added, which keeps the search
/// surface continuous while steering hard away from violations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectivePolicy {
    /// Maximum acceptable skew in ns.
    pub skew_constraint: f64,
    /// Penalty per ns of skew above the constraint.
    pub penalty_scale: f64,
}

impl Default for ObjectivePolicy {
    fn default() -> Self {
        Self {
            skew_constraint: DEFAULT_SKEW_CONSTRAINT,
            penalty_scale: DEFAULT_PENALTY_SCALE,
        }
    }
}

impl ObjectivePolicy {
    /// Creates a policy with the given constraint and the default penalty scale.
    pub fn with_constraint(skew_constraint: f64) -> Self {
        Self {
            skew_constraint,
            ..Self::default()
        }
    }

    /// Returns the penalty for `skew`, zero when the constraint is met.
    pub fn penalty(&self, skew: f64) -> f64 {
        if skew > self.skew_constraint {
            (skew - self.skew_constraint) * self.penalty_scale
        } else {
            0.0
        }
    }

    /// Scores a metric pair: latency plus the skew penalty, if any.
    pub fn score(&self, metrics: &MetricPair) -> f64 {
        metrics.latency + self.penalty(metrics.skew)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skew_within_constraint_is_latency() {
        let policy = ObjectivePolicy::default();
        for skew in [0.0, 0.03, 0.06] {
            let m = MetricPair::new(0.105, skew);
            assert_eq!(policy.score(&m), 0.105);
        }
    }

    #[test]
    fn skew_above_constraint_adds_penalty() {
        let policy = ObjectivePolicy::default();
        let m = MetricPair::new(0.1, 0.08);
        assert_eq!(policy.score(&m), 0.1 + (0.08 - 0.06) * 100.0);
        assert!((policy.penalty(0.08) - 2.0).abs() < 1e-9);
        assert!((policy.score(&m) - 2.1).abs() < 1e-9);
    }

    #[test]
    fn score_is_latency_plus_penalty() {
        let policy = ObjectivePolicy::default();
        for skew in [0.0, 0.06, 0.061, 0.2] {
            let m = MetricPair::new(0.5, skew);
            assert_eq!(policy.score(&m), 0.5 + policy.penalty(skew));
        }
    }

    #[test]
    fn custom_scale() {
        let policy = ObjectivePolicy {
            skew_constraint: 0.05,
            penalty_scale: 10.0,
        };
        assert!((policy.penalty(0.15) - 1.0).abs() < 1e-9);
        assert_eq!(policy.penalty(0.05), 0.0);
    }

    #[test]
    fn with_constraint_keeps_default_scale() {
        let policy = ObjectivePolicy::with_constraint(0.04);
        assert_eq!(policy.skew_constraint, 0.04);
        assert_eq!(policy.penalty_scale, DEFAULT_PENALTY_SCALE);
    }

    #[test]
    fn infeasible_is_positive_infinity() {
        assert!(INFEASIBLE.is_infinite());
        assert!(INFEASIBLE > 0.0);
    }
}
