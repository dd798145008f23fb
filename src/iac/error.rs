//! Error types for provisioning operations.

use std::fmt;
use thiserror::Error;

/// Result type alias for provisioning operations.
pub type IacResult<T> = Result<T, IacError>;

/// A lifecycle step of the provisioning tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Init,
    Plan,
    Apply,
    Destroy,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Init => "init",
            Step::Plan => "plan",
            Step::Apply => "apply",
            Step::Destroy => "destroy",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that abort provisioning or teardown.
#[derive(Error, Debug)]
pub enum IacError {
    #[error("{0} is not installed or not available in PATH")]
    NotInstalled(String),

    #[error("Failed to launch {binary} {step}: {message}")]
    Launch {
        binary: String,
        step: Step,
        message: String,
    },

    #[error("{binary} {step} failed with exit code {}: {stderr}", display_code(.exit_code))]
    StepFailed {
        binary: String,
        step: Step,
        exit_code: Option<i32>,
        stderr: String,
    },
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
}

impl IacError {
    /// Step that failed, when the failure belongs to one
    pub fn step(&self) -> Option<Step> {
        match self {
            IacError::NotInstalled(_) => None,
            IacError::Launch { step, .. } | IacError::StepFailed { step, .. } => Some(*step),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_failed_message_includes_exit_code_and_stderr() {
        let err = IacError::StepFailed {
            binary: "terraform".to_string(),
            step: Step::Plan,
            exit_code: Some(1),
            stderr: "Error: No valid credential sources found".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "terraform plan failed with exit code 1: Error: No valid credential sources found"
        );
        assert_eq!(err.step(), Some(Step::Plan));
    }

    #[test]
    fn test_step_failed_without_exit_code() {
        let err = IacError::StepFailed {
            binary: "tofu".to_string(),
            step: Step::Destroy,
            exit_code: None,
            stderr: String::new(),
        };

        assert!(err.to_string().contains("exit code unknown"));
    }

    #[test]
    fn test_not_installed_has_no_step() {
        let err = IacError::NotInstalled("terraform".to_string());
        assert_eq!(err.step(), None);
        assert_eq!(err.to_string(), "terraform is not installed or not available in PATH");
    }
}
