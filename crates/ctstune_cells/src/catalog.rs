//! Line-oriented cell catalog files.

use std::path::Path;

use tracing::debug;

use crate::cell::Cell;
use crate::error::CellError;

/// The full buffer and inverter universe, read once at startup.
#[derive(Debug, Clone)]
pub struct CellCatalog {
    buffers: Vec<Cell>,
    inverters: Vec<Cell>,
}

impl CellCatalog {
    /// Creates a catalog from already-parsed lists.
    pub fn new(buffers: Vec<Cell>, inverters: Vec<Cell>) -> Self {
        Self { buffers, inverters }
    }

    /// Loads both catalog files.
    ///
    /// A missing or empty file is an error: there is nothing to explore.
    pub fn load(buffers_path: &Path, inverters_path: &Path) -> Result<Self, CellError> {
        let buffers = load_list(buffers_path)?;
        let inverters = load_list(inverters_path)?;
        debug!(
            buffers = buffers.len(),
            inverters = inverters.len(),
            "loaded cell catalog"
        );
        Ok(Self { buffers, inverters })
    }

    /// All usable buffers in catalog order.
    pub fn buffers(&self) -> &[Cell] {
        &self.buffers
    }

    /// All usable inverters in catalog order, including banned ones.
    pub fn inverters(&self) -> &[Cell] {
        &self.inverters
    }
}

fn load_list(path: &Path) -> Result<Vec<Cell>, CellError> {
    let content = std::fs::read_to_string(path).map_err(|source| CellError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cells = parse_cell_list(&content);
    if cells.is_empty() {
        return Err(CellError::EmptyCatalog {
            path: path.to_path_buf(),
        });
    }
    Ok(cells)
}

/// Parses one cell name per line, skipping blank lines.
pub fn parse_cell_list(content: &str) -> Vec<Cell> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Cell::new)
        .collect()
}

/// Returns the inverters eligible for the clock tree.
///
/// General-purpose inverters (names starting with `banned_prefix`) are
/// removed regardless of any sampled parameter; only dedicated clock
/// inverters remain. Catalog order is preserved.
pub fn clock_inverter_pool(inverters: &[Cell], banned_prefix: &str) -> Vec<Cell> {
    inverters
        .iter()
        .filter(|cell| !cell.has_prefix(banned_prefix))
        .cloned()
        .collect()
}
