//! `ctstune inspect` - extract metrics from one clock report.

use ctstune_common::ObjectivePolicy;
use ctstune_report::FirstMatchParser;

use crate::settings;
use crate::{GlobalArgs, InspectArgs};

/// Runs the `ctstune inspect` command.
///
/// Returns exit code 0 if metrics were found, 1 otherwise.
pub fn run(args: &InspectArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = settings::load(global)?;

    let metrics = if args.first_match {
        FirstMatchParser::new(&config.report.corner_marker, &config.report.check_marker)?
            .parse_file(&args.report)?
    } else {
        config.scanner().scan_file(&args.report)?
    };

    let Some(metrics) = metrics else {
        eprintln!("no clock metrics found in {}", args.report.display());
        return Ok(1);
    };

    println!("latency: {:.4} ns", metrics.latency);
    println!("skew:    {:.4} ns", metrics.skew);
    if let Some(skew_constraint) = args.skew_constraint {
        let policy = ObjectivePolicy {
            skew_constraint,
            penalty_scale: config.objective.penalty_scale,
        };
        println!("objective: {:.4}", policy.score(&metrics));
    }
    Ok(0)
}
