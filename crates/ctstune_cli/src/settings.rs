//! Assembling the effective configuration: defaults, then file, then flags.

use std::path::{Path, PathBuf};

use ctstune_config::{ConfigError, TunerConfig};
use ctstune_flow::{EvaluatorSettings, ScriptRunner};
use ctstune_study::SearchSpace;
use tracing::debug;

use crate::{GlobalArgs, OptimizeArgs};

/// Configuration file picked up from the working directory when `--config`
/// is not given.
pub const DEFAULT_CONFIG_FILE: &str = "ctstune.toml";

/// Loads the configuration named by `--config`, or `ctstune.toml` if it
/// exists, or the built-in defaults.
pub fn load(global: &GlobalArgs) -> Result<TunerConfig, ConfigError> {
    let path = match &global.config {
        Some(path) => path.clone(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.is_file() {
                debug!("no configuration file, using defaults");
                return Ok(TunerConfig::default());
            }
            default
        }
    };
    debug!(path = %path.display(), "loading configuration");
    ctstune_config::load_config(&path)
}

/// Applies `optimize` flags on top of `config` and revalidates it.
pub fn apply_optimize_args(
    config: &mut TunerConfig,
    args: &OptimizeArgs,
) -> Result<(), ConfigError> {
    override_with(&mut config.flow.workspace, &args.wa_name);
    override_with(&mut config.flow.base_config, &args.base_var);
    override_with(&mut config.study.name, &args.study_name);
    override_with(&mut config.flow.run_prefix, &args.run_prefix);
    override_with(&mut config.flow.script, &args.script_path);
    override_with(&mut config.flow.block, &args.block_name);
    override_with(&mut config.flow.source_dir, &args.source_dir);
    override_with(&mut config.search.trials, &args.trials);
    override_with(&mut config.objective.skew_constraint, &args.skew_constraint);
    override_with(&mut config.study.storage, &args.storage);
    override_with(&mut config.catalog.buffers, &args.buffers);
    override_with(&mut config.catalog.inverters, &args.inverters);
    if args.seed.is_some() {
        config.search.seed = args.seed;
    }
    ctstune_config::validate_config(config)
}

/// Applies catalog path flags shared by several subcommands.
pub fn apply_catalog_paths(
    config: &mut TunerConfig,
    buffers: &Option<PathBuf>,
    inverters: &Option<PathBuf>,
) {
    override_with(&mut config.catalog.buffers, buffers);
    override_with(&mut config.catalog.inverters, inverters);
}

fn override_with<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

/// Builds the search space from the `[search]` section.
pub fn search_space(config: &TunerConfig) -> SearchSpace {
    SearchSpace {
        vt_classes: config.search.vt_classes.clone(),
        min_drive_low: config.search.min_drive_low,
        min_drive_high: config.search.min_drive_high,
        max_drive_high: config.search.max_drive_high,
    }
}

/// Builds the flow runner from the `[flow]` section.
pub fn script_runner(config: &TunerConfig) -> ScriptRunner {
    let flow = &config.flow;
    ScriptRunner {
        script: flow.script.clone(),
        interpreter: flow.interpreter.clone(),
        workspace: flow.workspace.clone(),
        block: flow.block.clone(),
        source_dir: flow.source_dir.clone(),
        work_dir: flow.work_dir.clone(),
        override_arg_prefix: flow.override_arg_prefix.clone(),
    }
}

/// Builds the evaluator settings.
pub fn evaluator_settings(config: &TunerConfig) -> EvaluatorSettings {
    EvaluatorSettings {
        naming: config.naming(),
        work_dir: config.flow.work_dir.clone(),
        workspace: config.flow.workspace.clone(),
        callback_hook: config.flow.callback_hook.clone(),
        selection: config.selection_policy(),
        scanner: config.scanner(),
        objective: config.objective_policy(),
    }
}

/// Returns the study storage and name, with optional flag overrides.
pub fn study_location<'a>(
    config: &'a TunerConfig,
    storage: &'a Option<PathBuf>,
    name: &'a Option<String>,
) -> (&'a Path, &'a str) {
    (
        storage.as_deref().unwrap_or(config.study.storage.as_path()),
        name.as_deref().unwrap_or(config.study.name.as_str()),
    )
}
