use crate::configuration::SUPPORTED_REGION;
use crate::iac::{IacExecutor, TerraformExecutor};
use crate::iac::terraform::DEFAULT_BINARY;
use crate::traits::{
    AwsCloudInspector, CloudInspector, CommandExecutor, FileSystem, InquireUserInput, Output,
    RealCommandExecutor, RealFileSystem, TerminalOutput, UserInput,
};
#[cfg(test)]
use crate::traits::{MockCloudInspector, MockCommandExecutor, MockFileSystem, MockOutput, MockUserInput};
use std::path::PathBuf;
use std::sync::Arc;

/// Where a run reads and writes, and which provisioning binary it drives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding main.tf, the Terraform state and the validation report
    pub working_dir: PathBuf,
    /// Provisioning binary ("terraform" or an argument-compatible one such as "tofu")
    pub terraform_bin: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            terraform_bin: DEFAULT_BINARY.to_string(),
        }
    }
}

/// Application context that holds all dependencies for dependency injection
pub struct Context {
    pub fs: Arc<dyn FileSystem>,
    pub input: Arc<dyn UserInput>,
    pub output: Arc<dyn Output>,
    pub command: Arc<dyn CommandExecutor>,
    pub cloud: Arc<dyn CloudInspector>,
    pub settings: Settings,
}

impl Context {
    /// Create a new context with real implementations (for production use)
    pub fn new(settings: Settings) -> Self {
        Self {
            fs: Arc::new(RealFileSystem),
            input: Arc::new(InquireUserInput),
            output: Arc::new(TerminalOutput),
            command: Arc::new(RealCommandExecutor::new()),
            cloud: Arc::new(AwsCloudInspector::new(SUPPORTED_REGION)),
            settings,
        }
    }

    /// Create a new context with mock implementations (for testing)
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            fs: Arc::new(MockFileSystem::new()),
            input: Arc::new(MockUserInput::new()),
            output: Arc::new(MockOutput::new()),
            command: Arc::new(MockCommandExecutor::new()),
            cloud: Arc::new(MockCloudInspector::empty()),
            settings: Settings::default(),
        }
    }

    /// Create a test context with specific mock implementations
    #[cfg(test)]
    pub fn test_with(
        fs: Arc<dyn FileSystem>,
        input: Arc<dyn UserInput>,
        output: Arc<dyn Output>,
        command: Arc<dyn CommandExecutor>,
        cloud: Arc<dyn CloudInspector>,
    ) -> Self {
        Self {
            fs,
            input,
            output,
            command,
            cloud,
            settings: Settings {
                working_dir: PathBuf::from("/work"),
                terraform_bin: DEFAULT_BINARY.to_string(),
            },
        }
    }

    /// Executor for the configured provisioning binary
    pub fn executor(&self) -> Box<dyn IacExecutor> {
        Box::new(TerraformExecutor::new(
            self.settings.terraform_bin.clone(),
            Arc::clone(&self.command),
        ))
    }
}
