//! One trial of the external place-and-route flow, from parameters to score.
//!
//! A trial runs in three steps:
//!
//! 1. [`configurator`] renders the cell-list override block and writes it,
//!    appended to the base template, to a per-trial override file.
//! 2. [`invoker`] launches the flow script with that file and captures its
//!    output to a per-trial log.
//! 3. [`evaluator`] ties both together, scans the resulting clock report and
//!    turns latency and skew into one objective value.
//!
//! Every failure inside a trial is absorbed into an infeasible (`+inf`)
//! objective; nothing here aborts the optimization loop.

#![warn(missing_docs)]

pub mod configurator;
pub mod error;
pub mod evaluator;
pub mod invoker;

pub use configurator::TrialConfigurator;
pub use error::FlowError;
pub use evaluator::{EvaluatorSettings, ObjectiveEvaluator, TrialEvaluation, TrialFailure};
pub use invoker::{FlowRunner, RunRequest, RunResult, RunStatus, ScriptRunner};
