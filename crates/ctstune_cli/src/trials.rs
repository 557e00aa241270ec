//! `ctstune trials` - list the records of a study.

use ctstune_study::{FileStudy, TrialRecord, TrialState};

use crate::settings;
use crate::{GlobalArgs, TrialsArgs};

/// Runs the `ctstune trials` command.
pub fn run(args: &TrialsArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = settings::load(global)?;
    let (storage, name) = settings::study_location(&config, &args.storage, &args.study_name);
    let study = FileStudy::open(storage, name)?;

    let records = study.trials()?;
    println!("Study '{}' ({}, {} trials)", study.name(), study.direction(), records.len());
    for record in &records {
        println!("{}", format_record(record));
    }
    if let Some(best) = study.best_trial()? {
        println!("Best: {}", format_record(&best));
    }
    Ok(0)
}

fn format_record(record: &TrialRecord) -> String {
    let value = match (record.state, record.value) {
        (TrialState::Complete, Some(v)) => format!("{v:.4}"),
        (TrialState::Infeasible, _) => "inf".to_string(),
        _ => "-".to_string(),
    };
    let params = record
        .params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "#{:<4} {:<10} {:>10}  {params}",
        record.number,
        format!("{:?}", record.state).to_lowercase(),
        value
    )
}
