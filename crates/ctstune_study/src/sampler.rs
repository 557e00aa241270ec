//! Capability traits between the loop driver and an optimizer.

use crate::error::StudyError;

/// Draws parameter values for one trial.
///
/// Each call records the drawn value under `name` on the trial. Sampling
/// the same name twice returns the first value.
pub trait TrialSampler {
    /// The trial number assigned by the optimizer.
    fn number(&self) -> u64;

    /// Picks one of `choices`.
    fn sample_categorical(&mut self, name: &str, choices: &[String]) -> Result<String, StudyError>;

    /// Picks an integer in `[low, high]`.
    fn sample_int(&mut self, name: &str, low: i64, high: i64) -> Result<i64, StudyError>;
}

/// A black-box optimizer driven in ask/tell style.
pub trait Optimizer {
    /// The trial handle returned by [`ask`](Optimizer::ask).
    type Trial: TrialSampler;

    /// Starts a new trial.
    fn ask(&mut self) -> Result<Self::Trial, StudyError>;

    /// Reports the objective value of a finished trial.
    ///
    /// Non-finite values mark the trial as infeasible.
    fn tell(&mut self, trial: Self::Trial, value: f64) -> Result<(), StudyError>;
}
