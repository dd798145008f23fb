use super::error::{IacResult, Step};
use std::path::Path;

/// Result code and captured streams of one successful lifecycle step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: Step,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Trait for Infrastructure as Code executors (Terraform, OpenTofu, etc.)
///
/// Every lifecycle method fails with [`super::IacError::StepFailed`] when the
/// tool exits non-zero, so callers only see outcomes of successful steps.
pub trait IacExecutor: Send + Sync {
    /// Check if the executor is installed and available
    /// Typically runs a version command to verify
    fn check_installed(&self, working_dir: &Path) -> bool;

    /// Initialize providers in the working directory
    fn init(&self, working_dir: &Path) -> IacResult<StepOutcome>;

    /// Compute the execution plan (preview changes)
    fn plan(&self, working_dir: &Path) -> IacResult<StepOutcome>;

    /// Apply changes without an interactive approval
    fn apply(&self, working_dir: &Path) -> IacResult<StepOutcome>;

    /// Destroy everything in the working directory's state without an interactive approval
    fn destroy(&self, working_dir: &Path) -> IacResult<StepOutcome>;

    /// Get the name of the binary this executor runs (e.g., "terraform", "tofu")
    fn get_name(&self) -> &str;
}
