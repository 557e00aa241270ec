//! `ctstune cells` - preview the candidate cells of one parameter set.

use ctstune_cells::{CellCatalog, Selection};
use ctstune_common::TrialConfig;

use crate::settings;
use crate::{CellsArgs, GlobalArgs};

/// Runs the `ctstune cells` command.
pub fn run(args: &CellsArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    if args.min > args.max {
        return Err(format!("--min ({}) exceeds --max ({})", args.min, args.max).into());
    }

    let mut config = settings::load(global)?;
    settings::apply_catalog_paths(&mut config, &args.buffers, &args.inverters);
    let catalog = CellCatalog::load(&config.catalog.buffers, &config.catalog.inverters)?;

    let trial = TrialConfig {
        number: 0,
        vt_class: args.vt.clone(),
        min_drive: args.min,
        max_drive: args.max,
    };
    let sets = config.selection_policy().select(&catalog, &trial);
    print_selection("buffers", &sets.buffers);
    print_selection("inverters", &sets.inverters);
    Ok(0)
}

fn print_selection(family: &str, selection: &Selection) {
    let note = if selection.used_failsafe {
        ", failsafe"
    } else {
        ""
    };
    println!("{family} ({}{note}):", selection.cells.len());
    for cell in &selection.cells {
        println!("  {cell}");
    }
}
