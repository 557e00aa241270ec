//! Configuration file loading and validation.

use std::path::Path;

use crate::error::ConfigError;
use crate::types::TunerConfig;

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<TunerConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<TunerConfig, ConfigError> {
    let config: TunerConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks that the configuration describes a runnable exploration.
///
/// Called again by the CLI after command-line overrides are applied.
pub fn validate_config(config: &TunerConfig) -> Result<(), ConfigError> {
    if config.flow.workspace.is_empty() {
        return Err(ConfigError::MissingField("flow.workspace".to_string()));
    }
    if config.flow.block.is_empty() {
        return Err(ConfigError::MissingField("flow.block".to_string()));
    }
    if config.flow.run_prefix.is_empty() {
        return Err(ConfigError::MissingField("flow.run_prefix".to_string()));
    }
    if config.flow.script.as_os_str().is_empty() {
        return Err(ConfigError::MissingField("flow.script".to_string()));
    }
    if config.study.name.is_empty() {
        return Err(ConfigError::MissingField("study.name".to_string()));
    }

    let search = &config.search;
    if search.vt_classes.is_empty() || search.vt_classes.iter().any(String::is_empty) {
        return Err(ConfigError::ValidationError(
            "search.vt_classes must list at least one non-empty class".to_string(),
        ));
    }
    if search.min_drive_low > search.min_drive_high {
        return Err(ConfigError::ValidationError(format!(
            "search.min_drive_low ({}) exceeds search.min_drive_high ({})",
            search.min_drive_low, search.min_drive_high
        )));
    }
    if search.min_drive_high > search.max_drive_high {
        return Err(ConfigError::ValidationError(format!(
            "search.min_drive_high ({}) exceeds search.max_drive_high ({})",
            search.min_drive_high, search.max_drive_high
        )));
    }
    if search.trials == 0 {
        return Err(ConfigError::ValidationError(
            "search.trials must be positive".to_string(),
        ));
    }

    if config.catalog.min_cell_count == 0 {
        return Err(ConfigError::ValidationError(
            "catalog.min_cell_count must be positive".to_string(),
        ));
    }

    let objective = &config.objective;
    if !objective.skew_constraint.is_finite() || objective.skew_constraint < 0.0 {
        return Err(ConfigError::ValidationError(
            "objective.skew_constraint must be a nonnegative number".to_string(),
        ));
    }
    if !objective.penalty_scale.is_finite() || objective.penalty_scale < 0.0 {
        return Err(ConfigError::ValidationError(
            "objective.penalty_scale must be a nonnegative number".to_string(),
        ));
    }

    let report = &config.report;
    if report.corner_marker.is_empty() || report.group_marker.is_empty() {
        return Err(ConfigError::MissingField(
            "report.corner_marker / report.group_marker".to_string(),
        ));
    }
    if report.latency_offset == 0
        || report.skew_offset == 0
        || report.latency_offset == report.skew_offset
    {
        return Err(ConfigError::ValidationError(
            "report offsets must be distinct and point past the corner token".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn empty_file_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, TunerConfig::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[flow]
script = "/tools/run_flow.sh"
interpreter = "bash"
workspace = "wa_20260201"
block = "core_top"
source_dir = "/proj/src"
base_config = "core_top.var"
run_prefix = "sweep_a"
work_dir = "/scratch/cts"
override_arg_prefix = "../"
callback_hook = "pnr.innovus.ClockPreCallback"

[catalog]
buffers = "bufs.list"
inverters = "invs.list"
min_cell_count = 4
banned_inverter_prefix = "INVX"

[search]
vt_classes = ["LVT", "SVT"]
min_drive_low = 2
min_drive_high = 4
max_drive_high = 12
trials = 10
seed = 42

[objective]
skew_constraint = 0.05
penalty_scale = 50.0

[report]
corner_marker = "tt_"
group_marker = "clk/"
check_marker = "setup.early"
latency_offset = 4
skew_offset = 5

[study]
name = "core_cts"
storage = "/shared/studies"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.flow.script, PathBuf::from("/tools/run_flow.sh"));
        assert_eq!(config.flow.interpreter.as_deref(), Some("bash"));
        assert_eq!(config.flow.work_dir, PathBuf::from("/scratch/cts"));
        assert_eq!(config.catalog.min_cell_count, 4);
        assert_eq!(config.search.vt_classes, vec!["LVT", "SVT"]);
        assert_eq!(config.search.seed, Some(42));
        assert_eq!(config.objective.penalty_scale, 50.0);
        assert_eq!(config.report.latency_offset, 4);
        assert_eq!(config.study.storage, PathBuf::from("/shared/studies"));
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = load_config_from_str("[search]\ntrials = 5\n").unwrap();
        assert_eq!(config.search.trials, 5);
        assert_eq!(config.search.max_drive_high, 16);
        assert_eq!(config.flow, crate::types::FlowConfig::default());
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn wrong_type_errors() {
        let err = load_config_from_str("[search]\ntrials = \"many\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn empty_workspace_errors() {
        let err = load_config_from_str("[flow]\nworkspace = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn inverted_drive_bounds_error() {
        let err = load_config_from_str("[search]\nmin_drive_low = 9\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        let err = load_config_from_str("[search]\nmax_drive_high = 4\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn zero_trials_error() {
        let err = load_config_from_str("[search]\ntrials = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn empty_vt_list_errors() {
        let err = load_config_from_str("[search]\nvt_classes = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn negative_constraint_errors() {
        let err = load_config_from_str("[objective]\nskew_constraint = -0.1\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn clashing_offsets_error() {
        let toml = "[report]\nlatency_offset = 4\nskew_offset = 4\n";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn zero_floor_errors() {
        let err = load_config_from_str("[catalog]\nmin_cell_count = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn io_error_from_missing_file() {
        let err = load_config(Path::new("/nonexistent/ctstune.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ctstune.toml");
        std::fs::write(&path, "[study]\nname = \"from_file\"\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.study.name, "from_file");
    }
}
