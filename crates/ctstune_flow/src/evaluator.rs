//! Scoring one trial configuration end to end.

use std::fmt;
use std::path::PathBuf;

use ctstune_cells::{CellCatalog, SelectionPolicy};
use ctstune_common::{MetricPair, ObjectivePolicy, TrialConfig, TrialNaming, INFEASIBLE};
use ctstune_report::SkewReportScanner;
use tracing::{info, warn};

use crate::configurator::TrialConfigurator;
use crate::invoker::{FlowRunner, RunRequest, RunStatus};

/// Why a trial produced no usable metrics.
#[derive(Debug, Clone, PartialEq)]
pub enum TrialFailure {
    /// The override payload could not be written.
    Payload(String),
    /// The flow did not finish successfully.
    Run(RunStatus),
    /// The report was missing or unreadable.
    ReportUnreadable {
        /// Expected report location.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },
    /// The report held no usable skew row.
    NoMetrics {
        /// The scanned report.
        path: PathBuf,
    },
}

impl fmt::Display for TrialFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrialFailure::Payload(reason) => write!(f, "override payload not written: {reason}"),
            TrialFailure::Run(status) => write!(f, "flow {status}"),
            TrialFailure::ReportUnreadable { path, reason } => {
                write!(f, "report {} unreadable: {reason}", path.display())
            }
            TrialFailure::NoMetrics { path } => {
                write!(f, "no skew row found in {}", path.display())
            }
        }
    }
}

/// Outcome of evaluating one trial.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialEvaluation {
    /// The objective; `+inf` when `failure` is set.
    pub objective: f64,
    /// Latency and skew, when the report could be parsed.
    pub metrics: Option<MetricPair>,
    /// The failure, if any.
    pub failure: Option<TrialFailure>,
}

impl TrialEvaluation {
    fn failed(failure: TrialFailure) -> Self {
        Self {
            objective: INFEASIBLE,
            metrics: None,
            failure: Some(failure),
        }
    }
}

/// Settings of an [`ObjectiveEvaluator`] that do not change between trials.
#[derive(Debug, Clone)]
pub struct EvaluatorSettings {
    /// Per-trial naming scheme.
    pub naming: TrialNaming,
    /// Directory holding override files, logs and the flow workspace.
    pub work_dir: PathBuf,
    /// Flow workspace name.
    pub workspace: String,
    /// Flow hook the override block extends.
    pub callback_hook: String,
    /// Candidate selection constants.
    pub selection: SelectionPolicy,
    /// Report scanner.
    pub scanner: SkewReportScanner,
    /// Objective scoring.
    pub objective: ObjectivePolicy,
}

/// Maps a [`TrialConfig`] to an objective value by running the flow.
#[derive(Debug)]
pub struct ObjectiveEvaluator<R> {
    catalog: CellCatalog,
    base_template: String,
    runner: R,
    configurator: TrialConfigurator,
    settings: EvaluatorSettings,
}

impl<R: FlowRunner> ObjectiveEvaluator<R> {
    /// Creates an evaluator over a loaded catalog and base template.
    pub fn new(
        catalog: CellCatalog,
        base_template: String,
        runner: R,
        settings: EvaluatorSettings,
    ) -> Self {
        let configurator = TrialConfigurator::new(
            settings.naming.clone(),
            settings.work_dir.clone(),
            settings.callback_hook.clone(),
            settings.selection.banned_inverter_prefix.clone(),
        );
        Self {
            catalog,
            base_template,
            runner,
            configurator,
            settings,
        }
    }

    /// Returns the runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Builds the run request of trial `number`.
    pub fn request(&self, number: u64) -> RunRequest {
        let naming = &self.settings.naming;
        let work_dir = &self.settings.work_dir;
        RunRequest {
            number,
            run_name: naming.run_name(number),
            override_file: naming.override_file_name(number),
            log_path: naming.log_path(work_dir, number),
            report_path: naming.report_path(work_dir, &self.settings.workspace, number),
        }
    }

    /// Evaluates `trial`. Never fails: every problem yields `+inf`.
    pub fn evaluate(&mut self, trial: &TrialConfig) -> TrialEvaluation {
        let evaluation = self.evaluate_inner(trial);
        match (&evaluation.failure, &evaluation.metrics) {
            (Some(failure), _) => {
                warn!(trial = trial.number, %failure, "trial infeasible");
            }
            (None, Some(metrics)) => {
                info!(
                    trial = trial.number,
                    latency = metrics.latency,
                    skew = metrics.skew,
                    objective = evaluation.objective,
                    "trial scored"
                );
            }
            (None, None) => {}
        }
        evaluation
    }

    fn evaluate_inner(&mut self, trial: &TrialConfig) -> TrialEvaluation {
        let sets = self.settings.selection.select(&self.catalog, trial);
        if let Err(e) = self
            .configurator
            .write(&self.base_template, trial.number, &sets)
        {
            return TrialEvaluation::failed(TrialFailure::Payload(e.to_string()));
        }

        let request = self.request(trial.number);
        let result = self.runner.run(&request);
        if !result.status.is_success() {
            return TrialEvaluation::failed(TrialFailure::Run(result.status));
        }

        match self.settings.scanner.scan_file(&result.report_path) {
            Ok(Some(metrics)) => TrialEvaluation {
                objective: self.settings.objective.score(&metrics),
                metrics: Some(metrics),
                failure: None,
            },
            Ok(None) => TrialEvaluation::failed(TrialFailure::NoMetrics {
                path: result.report_path,
            }),
            Err(e) => TrialEvaluation::failed(TrialFailure::ReportUnreadable {
                path: result.report_path,
                reason: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_display() {
        assert_eq!(
            TrialFailure::Run(RunStatus::Exited(Some(1))).to_string(),
            "flow exited with status 1"
        );
        assert_eq!(
            TrialFailure::NoMetrics {
                path: PathBuf::from("clock.log")
            }
            .to_string(),
            "no skew row found in clock.log"
        );
        assert_eq!(
            TrialFailure::Payload("disk full".into()).to_string(),
            "override payload not written: disk full"
        );
    }

    #[test]
    fn failed_evaluation_is_infeasible() {
        let e = TrialEvaluation::failed(TrialFailure::Payload("x".into()));
        assert!(e.objective.is_infinite());
        assert!(e.metrics.is_none());
    }
}
