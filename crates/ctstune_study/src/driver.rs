//! The ask / evaluate / tell loop.

use ctstune_common::TrialConfig;
use tracing::{info, warn};

use crate::error::StudyError;
use crate::sampler::{Optimizer, TrialSampler};
use crate::space::SearchSpace;

/// A finished trial as seen by this worker.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialOutcome {
    /// The sampled configuration.
    pub config: TrialConfig,
    /// The objective value reported for it.
    pub value: f64,
}

/// Runs `n_trials` trials against `optimizer`.
///
/// Each trial samples a [`TrialConfig`] from `space`, evaluates it with
/// `evaluate` and reports the value back. Evaluation failures are expected
/// to come back as `+inf`; only optimizer and storage errors abort the loop.
/// A trial whose parameters cannot be sampled is reported as `+inf` before
/// the error is returned, so no claimed trial is left running.
pub fn optimize<O, F>(
    optimizer: &mut O,
    space: &SearchSpace,
    n_trials: u32,
    mut evaluate: F,
) -> Result<Vec<TrialOutcome>, StudyError>
where
    O: Optimizer,
    F: FnMut(&TrialConfig) -> f64,
{
    let mut outcomes = Vec::with_capacity(n_trials as usize);
    for _ in 0..n_trials {
        let mut trial = optimizer.ask()?;
        let config = match space.sample(&mut trial) {
            Ok(config) => config,
            Err(e) => {
                warn!(trial = trial.number(), error = %e, "parameter sampling failed");
                optimizer.tell(trial, f64::INFINITY)?;
                return Err(e);
            }
        };

        info!(
            trial = config.number,
            vt = %config.vt_class,
            min = config.min_drive,
            max = config.max_drive,
            "starting trial"
        );
        let value = evaluate(&config);
        if value.is_finite() {
            info!(trial = config.number, value, "trial finished");
        } else {
            info!(trial = config.number, "trial infeasible");
        }

        optimizer.tell(trial, value)?;
        outcomes.push(TrialOutcome { config, value });
    }
    Ok(outcomes)
}

/// Returns the outcome with the lowest finite value.
pub fn best_outcome(outcomes: &[TrialOutcome]) -> Option<&TrialOutcome> {
    outcomes
        .iter()
        .filter(|o| o.value.is_finite())
        .min_by(|a, b| a.value.total_cmp(&b.value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(number: u64, value: f64) -> TrialOutcome {
        TrialOutcome {
            config: TrialConfig {
                number,
                vt_class: "LVT".to_string(),
                min_drive: 1,
                max_drive: 4,
            },
            value,
        }
    }

    #[test]
    fn best_skips_infeasible() {
        let outcomes = vec![
            outcome(0, f64::INFINITY),
            outcome(1, 0.4),
            outcome(2, 0.2),
            outcome(3, 0.3),
        ];
        assert_eq!(best_outcome(&outcomes).unwrap().config.number, 2);
    }

    #[test]
    fn best_of_all_failed_is_none() {
        let outcomes = vec![outcome(0, f64::INFINITY), outcome(1, f64::NAN)];
        assert!(best_outcome(&outcomes).is_none());
        assert!(best_outcome(&[]).is_none());
    }
}
