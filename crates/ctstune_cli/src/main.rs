//! ctstune CLI - clock-tree-synthesis design-space exploration.
//!
//! `ctstune optimize` runs one worker of a study: it samples cell-selection
//! parameters, drives the place-and-route flow script and records the
//! resulting objective in a study directory shared with other workers.
//! `ctstune inspect`, `ctstune cells` and `ctstune trials` look at a single
//! report, a candidate selection and a study's records respectively.

#![warn(missing_docs)]

mod cells;
mod inspect;
mod optimize;
mod settings;
mod trials;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// ctstune - CTS cell-selection tuning driver.
#[derive(Parser, Debug)]
#[command(name = "ctstune", version, about = "CTS design-space exploration driver")]
pub struct Cli {
    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (`-v` debug, `-vv` trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Path to a `ctstune.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run optimization trials as one worker of a study.
    Optimize(OptimizeArgs),
    /// Extract latency and skew from a clock report.
    Inspect(InspectArgs),
    /// Preview the candidate cells selected for given parameters.
    Cells(CellsArgs),
    /// List the recorded trials of a study.
    Trials(TrialsArgs),
}

/// Arguments for the `ctstune optimize` subcommand.
///
/// Every flag overrides the matching configuration value.
#[derive(Parser, Debug, Default)]
pub struct OptimizeArgs {
    /// Flow workspace name.
    #[arg(long)]
    pub wa_name: Option<String>,

    /// Base `.var` template the overrides are appended to.
    #[arg(long)]
    pub base_var: Option<PathBuf>,

    /// Study shared by all workers.
    #[arg(long)]
    pub study_name: Option<String>,

    /// Prefix of run names and override files.
    #[arg(long)]
    pub run_prefix: Option<String>,

    /// Flow wrapper script.
    #[arg(long)]
    pub script_path: Option<PathBuf>,

    /// Block (top module) name.
    #[arg(long)]
    pub block_name: Option<String>,

    /// Source directory handed to the flow.
    #[arg(long)]
    pub source_dir: Option<String>,

    /// Trials run by this worker.
    #[arg(long)]
    pub trials: Option<u32>,

    /// Maximum acceptable skew in ns.
    #[arg(long)]
    pub skew_constraint: Option<f64>,

    /// Directory holding study records.
    #[arg(long)]
    pub storage: Option<PathBuf>,

    /// Seed for reproducible sampling.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Usable clock buffer list.
    #[arg(long)]
    pub buffers: Option<PathBuf>,

    /// Usable inverter list.
    #[arg(long)]
    pub inverters: Option<PathBuf>,
}

/// Arguments for the `ctstune inspect` subcommand.
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Clock report to parse.
    pub report: PathBuf,

    /// Use the first matching row instead of the worst-skew row.
    #[arg(long)]
    pub first_match: bool,

    /// Also print the objective under this skew constraint.
    #[arg(long)]
    pub skew_constraint: Option<f64>,
}

/// Arguments for the `ctstune cells` subcommand.
#[derive(Parser, Debug)]
pub struct CellsArgs {
    /// Voltage-threshold class.
    #[arg(long)]
    pub vt: String,

    /// Minimum drive strength.
    #[arg(long)]
    pub min: u32,

    /// Maximum drive strength.
    #[arg(long)]
    pub max: u32,

    /// Usable clock buffer list.
    #[arg(long)]
    pub buffers: Option<PathBuf>,

    /// Usable inverter list.
    #[arg(long)]
    pub inverters: Option<PathBuf>,
}

/// Arguments for the `ctstune trials` subcommand.
#[derive(Parser, Debug)]
pub struct TrialsArgs {
    /// Study to list.
    #[arg(long)]
    pub study_name: Option<String>,

    /// Directory holding study records.
    #[arg(long)]
    pub storage: Option<PathBuf>,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Only log warnings and errors.
    pub quiet: bool,
    /// Verbosity level.
    pub verbose: u8,
    /// Optional path to a config file.
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// Returns the default log filter for these flags.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(global.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Optimize(ref args) => optimize::run(args, &global),
        Command::Inspect(ref args) => inspect::run(args, &global),
        Command::Cells(ref args) => cells::run(args, &global),
        Command::Trials(ref args) => trials::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
