//! Rendering and writing of per-trial override payloads.

use std::path::{Path, PathBuf};

use ctstune_cells::{CandidateSets, Cell};
use ctstune_common::TrialNaming;
use tracing::debug;

use crate::error::FlowError;

/// Writes the override configuration of each trial.
///
/// The payload is the base template, a newline, then a block that appends
/// to the flow's clock-build callback and pins the allowed clock buffers and
/// inverters. The template is treated as opaque text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialConfigurator {
    naming: TrialNaming,
    work_dir: PathBuf,
    callback_hook: String,
    banned_inverter_prefix: String,
}

impl TrialConfigurator {
    /// Creates a configurator writing into `work_dir`.
    pub fn new(
        naming: TrialNaming,
        work_dir: impl Into<PathBuf>,
        callback_hook: impl Into<String>,
        banned_inverter_prefix: impl Into<String>,
    ) -> Self {
        Self {
            naming,
            work_dir: work_dir.into(),
            callback_hook: callback_hook.into(),
            banned_inverter_prefix: banned_inverter_prefix.into(),
        }
    }

    /// Renders the override block for trial `number`.
    pub fn render_block(&self, number: u64, sets: &CandidateSets) -> String {
        format!(
            "# --- ctstune Trial #{number} Overrides ---\n\
             bbappend {hook} {{\n    \
             puts \"INFO (ctstune): Enforcing clock inverters (no {banned}*) and buffers for trial {number}...\"\n    \
             set_ccopt_property inverter_cells {{{inverters}}}\n    \
             set_ccopt_property buffer_cells {{{buffers}}}\n\
             }}\n",
            hook = self.callback_hook,
            banned = self.banned_inverter_prefix,
            inverters = join_names(&sets.inverters.cells),
            buffers = join_names(&sets.buffers.cells),
        )
    }

    /// Returns the complete payload: `base`, a newline, then the block.
    pub fn payload(&self, base: &str, number: u64, sets: &CandidateSets) -> String {
        format!("{base}\n{}", self.render_block(number, sets))
    }

    /// Returns the path the payload of trial `number` is written to.
    pub fn override_path(&self, number: u64) -> PathBuf {
        self.naming.override_path(&self.work_dir, number)
    }

    /// Writes the payload of trial `number` and returns its path.
    pub fn write(
        &self,
        base: &str,
        number: u64,
        sets: &CandidateSets,
    ) -> Result<PathBuf, FlowError> {
        let path = self.override_path(number);
        if let Some(parent) = path.parent() {
            create_dir(parent)?;
        }
        std::fs::write(&path, self.payload(base, number, sets)).map_err(|source| {
            FlowError::Write {
                path: path.clone(),
                source,
            }
        })?;
        debug!(trial = number, path = %path.display(), "wrote override payload");
        Ok(path)
    }
}

fn join_names(cells: &[Cell]) -> String {
    cells.iter().map(Cell::name).collect::<Vec<_>>().join(" ")
}

fn create_dir(dir: &Path) -> Result<(), FlowError> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|source| FlowError::Write {
        path: dir.to_path_buf(),
        source,
    })
}
