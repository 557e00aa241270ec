//! Sampled trial parameters and the per-trial artifact naming scheme.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// One sampled point of the CTS search space.
///
/// Produced by the optimizer at the start of a trial and never mutated
/// afterwards. `max_drive` is always at least `min_drive`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialConfig {
    /// Trial number assigned by the study store.
    pub number: u64,
    /// Voltage-threshold class matched as a substring of cell names.
    pub vt_class: String,
    /// Lowest drive strength allowed (inclusive).
    pub min_drive: u32,
    /// Highest drive strength allowed (inclusive).
    pub max_drive: u32,
}

impl TrialConfig {
    /// Returns the drive-strength window as floating-point bounds.
    pub fn drive_range(&self) -> (f64, f64) {
        (f64::from(self.min_drive), f64::from(self.max_drive))
    }
}

impl fmt::Display for TrialConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "trial #{}: vt={} drive=[{}, {}]",
            self.number, self.vt_class, self.min_drive, self.max_drive
        )
    }
}

/// Derives every per-trial file name from a run prefix and a trial number.
///
/// All artifacts carry the trial number so that independent workers sharing
/// one study never write to the same path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialNaming {
    run_prefix: String,
}

impl TrialNaming {
    /// Creates a naming scheme for the given run prefix.
    pub fn new(run_prefix: impl Into<String>) -> Self {
        Self {
            run_prefix: run_prefix.into(),
        }
    }

    /// Returns the run prefix.
    pub fn run_prefix(&self) -> &str {
        &self.run_prefix
    }

    /// Flow run name, e.g. `optuna_v1_trial_7`.
    pub fn run_name(&self, number: u64) -> String {
        format!("{}_trial_{number}", self.run_prefix)
    }

    /// File name of the generated override configuration.
    pub fn override_file_name(&self, number: u64) -> String {
        format!("vars_{}_trial_{number}.var", self.run_prefix)
    }

    /// Path of the override configuration inside `work_dir`.
    pub fn override_path(&self, work_dir: &Path, number: u64) -> PathBuf {
        work_dir.join(self.override_file_name(number))
    }

    /// Path of the captured flow output inside `work_dir`.
    pub fn log_path(&self, work_dir: &Path, number: u64) -> PathBuf {
        work_dir
            .join("logs")
            .join(format!("{}.log", self.run_name(number)))
    }

    /// Path of the clock report the flow produces for this trial.
    ///
    /// The layout `<workspace>/run/<run>/main/pnr/clock/logs/clock.log` is
    /// fixed by the flow scripts.
    pub fn report_path(&self, work_dir: &Path, workspace: &str, number: u64) -> PathBuf {
        work_dir
            .join(workspace)
            .join("run")
            .join(self.run_name(number))
            .join("main")
            .join("pnr")
            .join("clock")
            .join("logs")
            .join("clock.log")
    }
}
