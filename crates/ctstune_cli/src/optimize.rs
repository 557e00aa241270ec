//! `ctstune optimize` - run trials as one worker of a shared study.
//!
//! 1. Merge configuration file and flags
//! 2. Load the cell catalog and the base template (fatal if missing)
//! 3. Open or create the study
//! 4. Run the ask / evaluate / tell loop
//! 5. Print the best trial of this worker and of the whole study

use ctstune_cells::CellCatalog;
use ctstune_flow::ObjectiveEvaluator;
use ctstune_study::{best_outcome, optimize, Direction, FileStudy, RandomSampler};
use tracing::info;

use crate::settings;
use crate::{GlobalArgs, OptimizeArgs};

/// Runs the `ctstune optimize` command.
///
/// Returns exit code 0 once all trials are recorded, whether or not any of
/// them was feasible.
pub fn run(args: &OptimizeArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut config = settings::load(global)?;
    settings::apply_optimize_args(&mut config, args)?;

    let catalog = CellCatalog::load(&config.catalog.buffers, &config.catalog.inverters)?;
    let base_template = std::fs::read_to_string(&config.flow.base_config).map_err(|e| {
        format!(
            "cannot read base template {}: {e}",
            config.flow.base_config.display()
        )
    })?;

    let mut study =
        FileStudy::load_or_create(&config.study.storage, &config.study.name, Direction::Minimize)?
            .with_sampler(RandomSampler::new(config.search.seed));
    info!(
        study = study.name(),
        storage = %config.study.storage.display(),
        trials = config.search.trials,
        "starting worker"
    );

    let mut evaluator = ObjectiveEvaluator::new(
        catalog,
        base_template,
        settings::script_runner(&config),
        settings::evaluator_settings(&config),
    );
    let space = settings::search_space(&config);
    let outcomes = optimize(&mut study, &space, config.search.trials, |trial| {
        evaluator.evaluate(trial).objective
    })?;

    let feasible = outcomes.iter().filter(|o| o.value.is_finite()).count();
    println!(
        "Finished {} trials ({} feasible) in study '{}'",
        outcomes.len(),
        feasible,
        study.name()
    );
    match best_outcome(&outcomes) {
        Some(best) => println!("Best of this worker: {} -> {:.4}", best.config, best.value),
        None => println!("Best of this worker: none feasible"),
    }
    if let Some(record) = study.best_trial()? {
        let params = record
            .params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ");
        if let Some(value) = record.value {
            println!("Best of study: trial #{} -> {value:.4} ({params})", record.number);
        }
    }
    Ok(0)
}
