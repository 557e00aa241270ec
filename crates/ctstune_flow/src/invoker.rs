//! Launching the external flow script.

use std::fmt;
use std::fs::File;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{info, warn};

/// Everything the runner needs to know about one trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// Trial number.
    pub number: u64,
    /// Flow run name.
    pub run_name: String,
    /// File name of the override configuration, relative to the work dir.
    pub override_file: String,
    /// Where the combined flow output is captured.
    pub log_path: PathBuf,
    /// Where the flow is expected to leave its clock report.
    pub report_path: PathBuf,
}

/// How a flow run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// The script exited with status zero.
    Succeeded,
    /// The script exited nonzero, or was killed by a signal (`None`).
    Exited(Option<i32>),
    /// The script could not be started.
    LaunchFailed(String),
}

impl RunStatus {
    /// Returns `true` for [`RunStatus::Succeeded`].
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Succeeded)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Succeeded => f.write_str("succeeded"),
            RunStatus::Exited(Some(code)) => write!(f, "exited with status {code}"),
            RunStatus::Exited(None) => f.write_str("terminated by signal"),
            RunStatus::LaunchFailed(reason) => write!(f, "failed to launch: {reason}"),
        }
    }
}

/// Result of one flow run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// Trial number.
    pub number: u64,
    /// How the run ended.
    pub status: RunStatus,
    /// Captured output.
    pub log_path: PathBuf,
    /// Expected report location.
    pub report_path: PathBuf,
}

/// Runs the flow for one trial.
///
/// Implementations block until the flow finishes and report every failure
/// through [`RunStatus`]; they never return an error.
pub trait FlowRunner {
    /// Runs the flow described by `request`.
    fn run(&mut self, request: &RunRequest) -> RunResult;
}

/// Runs the flow wrapper script as a child process.
///
/// The command line is
/// `[interpreter] <script> <run name> <override arg> <workspace> <block> <source dir>`
/// where the override arg is `override_arg_prefix` followed by the override
/// file name. The child runs in `work_dir`; stdout and stderr both go to the
/// trial log. There is no timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRunner {
    /// Flow wrapper script.
    pub script: PathBuf,
    /// Optional interpreter the script is passed to.
    pub interpreter: Option<String>,
    /// Flow workspace name.
    pub workspace: String,
    /// Block name.
    pub block: String,
    /// Source directory.
    pub source_dir: String,
    /// Working directory of the child.
    pub work_dir: PathBuf,
    /// Prefix joined to the override file name.
    pub override_arg_prefix: String,
}

impl ScriptRunner {
    /// Builds the command for `request` without running it.
    pub fn command(&self, request: &RunRequest) -> Command {
        let mut cmd = match &self.interpreter {
            Some(interpreter) => {
                let mut cmd = Command::new(interpreter);
                cmd.arg(&self.script);
                cmd
            }
            None => Command::new(&self.script),
        };
        cmd.arg(&request.run_name)
            .arg(format!("{}{}", self.override_arg_prefix, request.override_file))
            .arg(&self.workspace)
            .arg(&self.block)
            .arg(&self.source_dir)
            .current_dir(&self.work_dir);
        cmd
    }

    fn launch(&self, request: &RunRequest) -> Result<RunStatus, String> {
        if let Some(dir) = request.log_path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| format!("cannot create {}: {e}", dir.display()))?;
        }
        let log = File::create(&request.log_path)
            .map_err(|e| format!("cannot create {}: {e}", request.log_path.display()))?;
        let err_log = log
            .try_clone()
            .map_err(|e| format!("cannot share {}: {e}", request.log_path.display()))?;

        let status = self
            .command(request)
            .stdin(Stdio::null())
            .stdout(Stdio::from(log))
            .stderr(Stdio::from(err_log))
            .status()
            .map_err(|e| format!("{}: {e}", self.script.display()))?;

        Ok(if status.success() {
            RunStatus::Succeeded
        } else {
            RunStatus::Exited(status.code())
        })
    }
}

impl FlowRunner for ScriptRunner {
    fn run(&mut self, request: &RunRequest) -> RunResult {
        info!(
            trial = request.number,
            run = %request.run_name,
            log = %request.log_path.display(),
            "launching flow"
        );
        let status = self
            .launch(request)
            .unwrap_or_else(RunStatus::LaunchFailed);
        if !status.is_success() {
            warn!(trial = request.number, %status, "flow run failed");
        }
        RunResult {
            number: request.number,
            status,
            log_path: request.log_path.clone(),
            report_path: request.report_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use tempfile::TempDir;

    fn runner(work_dir: PathBuf) -> ScriptRunner {
        ScriptRunner {
            script: PathBuf::from("./run_flow.sh"),
            interpreter: None,
            workspace: "ws".to_string(),
            block: "top".to_string(),
            source_dir: "/src".to_string(),
            work_dir,
            override_arg_prefix: "../../".to_string(),
        }
    }

    fn request(dir: &std::path::Path) -> RunRequest {
        RunRequest {
            number: 4,
            run_name: "p_trial_4".to_string(),
            override_file: "vars_p_trial_4.var".to_string(),
            log_path: dir.join("logs").join("p_trial_4.log"),
            report_path: dir.join("clock.log"),
        }
    }

    #[test]
    fn command_line_layout() {
        let dir = TempDir::new().unwrap();
        let cmd = runner(dir.path().to_path_buf()).command(&request(dir.path()));
        assert_eq!(cmd.get_program(), OsStr::new("./run_flow.sh"));
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(
            args,
            ["p_trial_4", "../../vars_p_trial_4.var", "ws", "top", "/src"]
                .map(OsStr::new)
                .to_vec()
        );
        assert_eq!(cmd.get_current_dir(), Some(dir.path()));
    }

    #[test]
    fn interpreter_precedes_script() {
        let dir = TempDir::new().unwrap();
        let mut r = runner(dir.path().to_path_buf());
        r.interpreter = Some("bash".to_string());
        let cmd = r.command(&request(dir.path()));
        assert_eq!(cmd.get_program(), OsStr::new("bash"));
        assert_eq!(cmd.get_args().next(), Some(OsStr::new("./run_flow.sh")));
        assert_eq!(cmd.get_args().count(), 6);
    }

    #[test]
    fn missing_script_is_a_launch_failure() {
        let dir = TempDir::new().unwrap();
        let mut r = runner(dir.path().to_path_buf());
        r.script = dir.path().join("does_not_exist.sh");
        let result = r.run(&request(dir.path()));
        assert!(matches!(result.status, RunStatus::LaunchFailed(_)));
        assert!(result.log_path.is_file());
    }

    #[cfg(unix)]
    #[test]
    fn output_is_captured_and_exit_code_kept() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("flow.sh"),
            "echo \"run $1 with $2\"\necho oops >&2\nexit 3\n",
        )
        .unwrap();
        let mut r = runner(dir.path().to_path_buf());
        r.script = PathBuf::from("flow.sh");
        r.interpreter = Some("sh".to_string());
        let result = r.run(&request(dir.path()));
        assert_eq!(result.status, RunStatus::Exited(Some(3)));
        let log = std::fs::read_to_string(&result.log_path).unwrap();
        assert!(log.contains("run p_trial_4 with ../../vars_p_trial_4.var"));
        assert!(log.contains("oops"));
    }

    #[test]
    fn status_display() {
        assert_eq!(RunStatus::Succeeded.to_string(), "succeeded");
        assert_eq!(RunStatus::Exited(Some(2)).to_string(), "exited with status 2");
        assert_eq!(RunStatus::Exited(None).to_string(), "terminated by signal");
        assert_eq!(
            RunStatus::LaunchFailed("no such file".into()).to_string(),
            "failed to launch: no such file"
        );
    }
}
