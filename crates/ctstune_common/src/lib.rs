//! Shared data model for the ctstune clock-tree exploration workspace.
//!
//! This crate provides the types every other crate agrees on: the sampled
//! trial configuration, the per-trial artifact naming scheme, the metric pair
//! recovered from a clock report, and the objective scoring policy.

#![warn(missing_docs)]

pub mod metrics;
pub mod objective;
pub mod trial;

pub use metrics::MetricPair;
pub use objective::{ObjectivePolicy, INFEASIBLE};
pub use trial::{TrialConfig, TrialNaming};
