use super::error::{IacError, IacResult, Step};
use super::executor::{IacExecutor, StepOutcome};
use crate::traits::CommandExecutor;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Default provisioning binary
pub const DEFAULT_BINARY: &str = "terraform";

/// Terraform executor; also drives OpenTofu, which accepts the same arguments
pub struct TerraformExecutor {
    binary: String,
    command: Arc<dyn CommandExecutor>,
}

impl TerraformExecutor {
    pub fn new(binary: impl Into<String>, command: Arc<dyn CommandExecutor>) -> Self {
        Self {
            binary: binary.into(),
            command,
        }
    }

    /// Arguments for a lifecycle step; nothing ever waits on stdin
    fn step_args(step: Step) -> &'static [&'static str] {
        match step {
            Step::Init => &["init", "-input=false", "-no-color"],
            Step::Plan => &["plan", "-input=false", "-no-color"],
            Step::Apply => &["apply", "-auto-approve", "-input=false", "-no-color"],
            Step::Destroy => &["destroy", "-auto-approve", "-input=false", "-no-color"],
        }
    }

    fn run(&self, step: Step, working_dir: &Path) -> IacResult<StepOutcome> {
        let args = Self::step_args(step);
        debug!("Executing {} {:?} in {:?}", self.binary, args, working_dir);

        let output = self
            .command
            .execute(&self.binary, args, working_dir)
            .map_err(|err| IacError::Launch {
                binary: self.binary.clone(),
                step,
                message: format!("{:#}", err),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(IacError::StepFailed {
                binary: self.binary.clone(),
                step,
                exit_code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(StepOutcome {
            step,
            exit_code: output.status.code().unwrap_or(0),
            stdout,
            stderr,
        })
    }
}

impl IacExecutor for TerraformExecutor {
    fn check_installed(&self, working_dir: &Path) -> bool {
        match self.command.execute(&self.binary, &["version"], working_dir) {
            Ok(output) => output.status.success(),
            Err(_) => false, // Command not found or failed to execute
        }
    }

    fn init(&self, working_dir: &Path) -> IacResult<StepOutcome> {
        self.run(Step::Init, working_dir)
    }

    fn plan(&self, working_dir: &Path) -> IacResult<StepOutcome> {
        self.run(Step::Plan, working_dir)
    }

    fn apply(&self, working_dir: &Path) -> IacResult<StepOutcome> {
        self.run(Step::Apply, working_dir)
    }

    fn destroy(&self, working_dir: &Path) -> IacResult<StepOutcome> {
        self.run(Step::Destroy, working_dir)
    }

    fn get_name(&self) -> &str {
        &self.binary
    }
}
