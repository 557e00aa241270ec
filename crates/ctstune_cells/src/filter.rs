//! Per-trial candidate selection with a minimum-cardinality failsafe.

use ctstune_common::TrialConfig;
use tracing::debug;

use crate::catalog::{clock_inverter_pool, CellCatalog};
use crate::cell::Cell;

/// Smallest candidate set handed to the flow before the failsafe kicks in.
pub const DEFAULT_MIN_CELL_COUNT: usize = 6;

/// Name prefix of general-purpose inverters, never used in the clock tree.
pub const DEFAULT_BANNED_INVERTER_PREFIX: &str = "INV";

/// Keeps the cells of `vt_class` whose drive strength lies in `[min, max]`.
///
/// Cells without a decodable drive strength are dropped. The output keeps
/// the input order and the function has no hidden state, so repeated calls
/// with the same inputs give the same result.
pub fn filter_by_criteria(cells: &[Cell], vt_class: &str, min: f64, max: f64) -> Vec<Cell> {
    cells
        .iter()
        .filter(|cell| cell.matches_vt(vt_class))
        .filter(|cell| {
            cell.drive_strength()
                .is_some_and(|strength| min <= strength && strength <= max)
        })
        .cloned()
        .collect()
}

/// Outcome of selecting candidates for one cell family.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// The selected cells in catalog order.
    pub cells: Vec<Cell>,
    /// `true` if the drive-strength window was abandoned.
    pub used_failsafe: bool,
}

/// Filters `cells` and falls back to a VT-only selection below `floor`.
///
/// When the filtered set holds fewer than `floor` cells it is replaced by
/// the first `floor` cells matching `vt_class`, ignoring drive strength. A
/// too narrow window must never leave the flow with a degenerate cell list.
pub fn select_candidates(
    cells: &[Cell],
    vt_class: &str,
    min: f64,
    max: f64,
    floor: usize,
) -> Selection {
    let filtered = filter_by_criteria(cells, vt_class, min, max);
    if filtered.len() >= floor {
        return Selection {
            cells: filtered,
            used_failsafe: false,
        };
    }
    let fallback = cells
        .iter()
        .filter(|cell| cell.matches_vt(vt_class))
        .take(floor)
        .cloned()
        .collect();
    Selection {
        cells: fallback,
        used_failsafe: true,
    }
}

/// The buffer and inverter lists handed to one trial.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSets {
    /// Allowed clock buffers.
    pub buffers: Selection,
    /// Allowed clock inverters.
    pub inverters: Selection,
}

/// Overridable constants governing candidate selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPolicy {
    /// Failsafe floor for each family.
    pub min_cell_count: usize,
    /// Inverters whose name starts with this prefix are never candidates.
    pub banned_inverter_prefix: String,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            min_cell_count: DEFAULT_MIN_CELL_COUNT,
            banned_inverter_prefix: DEFAULT_BANNED_INVERTER_PREFIX.to_string(),
        }
    }
}

impl SelectionPolicy {
    /// Selects the candidate sets for a sampled trial.
    pub fn select(&self, catalog: &CellCatalog, trial: &TrialConfig) -> CandidateSets {
        let (min, max) = trial.drive_range();
        let buffers = select_candidates(
            catalog.buffers(),
            &trial.vt_class,
            min,
            max,
            self.min_cell_count,
        );
        let pool = clock_inverter_pool(catalog.inverters(), &self.banned_inverter_prefix);
        let inverters = select_candidates(&pool, &trial.vt_class, min, max, self.min_cell_count);

        debug!(
            trial = trial.number,
            buffers = buffers.cells.len(),
            buffer_failsafe = buffers.used_failsafe,
            inverters = inverters.cells.len(),
            inverter_failsafe = inverters.used_failsafe,
            "selected candidate cells"
        );
        CandidateSets { buffers, inverters }
    }
}
