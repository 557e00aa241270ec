//! Optimization loop driver and a file-backed study store.
//!
//! The loop only talks to the optimizer through two small traits:
//! [`Optimizer`] hands out trials and receives their objective values, and
//! [`TrialSampler`] draws individual parameters for one trial. This keeps the
//! driver testable with a scripted optimizer and lets the search strategy be
//! swapped without touching the evaluation code.
//!
//! # Architecture
//!
//! - [`sampler`] - the capability traits
//! - [`space`] - the CTS search space and how a [`TrialConfig`] is sampled
//! - [`random`] - uniform random parameter draws
//! - [`store`] - [`FileStudy`], a study shared by worker processes through a directory
//! - [`driver`] - the ask / evaluate / tell loop
//!
//! [`TrialConfig`]: ctstune_common::TrialConfig

#![warn(missing_docs)]

pub mod driver;
pub mod error;
pub mod random;
pub mod sampler;
pub mod space;
pub mod store;

pub use driver::{best_outcome, optimize, TrialOutcome};
pub use error::StudyError;
pub use random::RandomSampler;
pub use sampler::{Optimizer, TrialSampler};
pub use space::SearchSpace;
pub use store::{Direction, FileStudy, FileTrial, ParamValue, TrialRecord, TrialState};
