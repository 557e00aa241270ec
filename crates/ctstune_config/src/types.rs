//! Configuration types deserialized from `ctstune.toml`.

use std::path::PathBuf;

use ctstune_cells::{SelectionPolicy, DEFAULT_BANNED_INVERTER_PREFIX, DEFAULT_MIN_CELL_COUNT};
use ctstune_common::objective::{DEFAULT_PENALTY_SCALE, DEFAULT_SKEW_CONSTRAINT};
use ctstune_common::{ObjectivePolicy, TrialNaming};
use ctstune_report::{
    ColumnLayout, SkewReportScanner, DEFAULT_CHECK_MARKER, DEFAULT_CORNER_MARKER,
    DEFAULT_GROUP_MARKER,
};
use serde::Deserialize;

/// Default ClockBuild pre-callback hook extended by the override block.
pub const DEFAULT_CALLBACK_HOOK: &str = "pnr.innovus.ClockBuildClockTreePreCallback";

/// The complete worker configuration.
///
/// Every section and key is optional in the file; missing values take the
/// defaults documented on each field.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TunerConfig {
    /// External flow invocation settings.
    pub flow: FlowConfig,
    /// Cell catalog files and selection constants.
    pub catalog: CatalogConfig,
    /// Search space and trial budget.
    pub search: SearchConfig,
    /// Objective scoring.
    pub objective: ObjectiveConfig,
    /// Report parsing markers and column layout.
    pub report: ReportConfig,
    /// Study identity and storage.
    pub study: StudyConfig,
}

impl TunerConfig {
    /// Returns the per-trial naming scheme.
    pub fn naming(&self) -> TrialNaming {
        TrialNaming::new(self.flow.run_prefix.clone())
    }

    /// Returns the objective policy.
    pub fn objective_policy(&self) -> ObjectivePolicy {
        ObjectivePolicy {
            skew_constraint: self.objective.skew_constraint,
            penalty_scale: self.objective.penalty_scale,
        }
    }

    /// Returns the candidate selection policy.
    pub fn selection_policy(&self) -> SelectionPolicy {
        SelectionPolicy {
            min_cell_count: self.catalog.min_cell_count,
            banned_inverter_prefix: self.catalog.banned_inverter_prefix.clone(),
        }
    }

    /// Returns the max-skew report scanner.
    pub fn scanner(&self) -> SkewReportScanner {
        SkewReportScanner::new(
            self.report.corner_marker.clone(),
            self.report.group_marker.clone(),
        )
        .with_layout(ColumnLayout {
            latency_offset: self.report.latency_offset,
            skew_offset: self.report.skew_offset,
        })
    }
}

/// How the external place-and-route flow is launched.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlowConfig {
    /// Flow wrapper script (default `./run_flow.sh`).
    pub script: PathBuf,
    /// Optional interpreter placed before the script, e.g. `bash`.
    pub interpreter: Option<String>,
    /// Flow workspace name.
    pub workspace: String,
    /// Block (top module) name.
    pub block: String,
    /// Source directory handed to the flow.
    pub source_dir: String,
    /// Base `.var` template that every override is appended to.
    pub base_config: PathBuf,
    /// Prefix of run names and override files.
    pub run_prefix: String,
    /// Directory holding override files, logs and the flow workspace.
    pub work_dir: PathBuf,
    /// Prefix joined to the override file name on the flow command line.
    ///
    /// The flow resolves the path from two levels below the work dir, hence
    /// the default `../../`.
    pub override_arg_prefix: String,
    /// Flow hook the override block is appended to.
    pub callback_hook: String,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            script: PathBuf::from("./run_flow.sh"),
            interpreter: None,
            workspace: "20260114_gcpu_smu_svd_pipe".to_string(),
            block: "gcpu_smu_svd_pipe".to_string(),
            source_dir: "/path/to/source/parent".to_string(),
            base_config: PathBuf::from("gcpu_smu_svd_pipe.var"),
            run_prefix: "optuna_v1".to_string(),
            work_dir: PathBuf::from("."),
            override_arg_prefix: "../../".to_string(),
            callback_hook: DEFAULT_CALLBACK_HOOK.to_string(),
        }
    }
}

/// Cell catalog files and the selection constants applied to them.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Usable clock buffers, one per line.
    pub buffers: PathBuf,
    /// Usable inverters, one per line.
    pub inverters: PathBuf,
    /// Failsafe floor for each candidate set.
    pub min_cell_count: usize,
    /// Prefix of general-purpose inverters excluded from the clock tree.
    pub banned_inverter_prefix: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            buffers: PathBuf::from("usable_buffers.list"),
            inverters: PathBuf::from("usable_inverters.list"),
            min_cell_count: DEFAULT_MIN_CELL_COUNT,
            banned_inverter_prefix: DEFAULT_BANNED_INVERTER_PREFIX.to_string(),
        }
    }
}

/// Search space bounds and trial budget of one worker.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Voltage-threshold classes to choose from.
    pub vt_classes: Vec<String>,
    /// Lower bound of the sampled minimum drive strength.
    pub min_drive_low: u32,
    /// Upper bound of the sampled minimum drive strength.
    pub min_drive_high: u32,
    /// Upper bound of the sampled maximum drive strength.
    pub max_drive_high: u32,
    /// Trials run by this worker.
    pub trials: u32,
    /// Seed for reproducible sampling.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            vt_classes: ["ULVTLL", "LVTLL", "LVT", "SVT"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_drive_low: 1,
            min_drive_high: 8,
            max_drive_high: 16,
            trials: 30,
            seed: None,
        }
    }
}

/// Objective scoring parameters.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObjectiveConfig {
    /// Maximum acceptable skew in ns.
    pub skew_constraint: f64,
    /// Penalty per ns of skew above the constraint.
    pub penalty_scale: f64,
}

impl Default for ObjectiveConfig {
    fn default() -> Self {
        Self {
            skew_constraint: DEFAULT_SKEW_CONSTRAINT,
            penalty_scale: DEFAULT_PENALTY_SCALE,
        }
    }
}

/// Report markers and field offsets.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Prefix of the target half-corner name.
    pub corner_marker: String,
    /// Substring identifying clock skew-group rows.
    pub group_marker: String,
    /// Timing check used by the first-match parser.
    pub check_marker: String,
    /// Latency field offset from the half-corner token.
    pub latency_offset: usize,
    /// Skew field offset from the half-corner token.
    pub skew_offset: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let layout = ColumnLayout::default();
        Self {
            corner_marker: DEFAULT_CORNER_MARKER.to_string(),
            group_marker: DEFAULT_GROUP_MARKER.to_string(),
            check_marker: DEFAULT_CHECK_MARKER.to_string(),
            latency_offset: layout.latency_offset,
            skew_offset: layout.skew_offset,
        }
    }
}

/// Study identity and storage location.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct StudyConfig {
    /// Study name shared by all workers of one exploration.
    pub name: String,
    /// Directory holding all studies.
    pub storage: PathBuf,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            name: "gcpu_smu_svd_pipe_no_INVD_parallel_v1".to_string(),
            storage: PathBuf::from(".ctstune/studies"),
        }
    }
}
