use super::error::{IacError, IacResult};
use super::executor::{IacExecutor, StepOutcome};
use std::path::Path;
use tracing::info;

/// Runs the provisioning lifecycle against a rendered working directory.
///
/// Each method stops at the first failing step and hands the error back; the
/// caller decides to abort.
pub struct Provisioner<'a> {
    executor: &'a dyn IacExecutor,
    working_dir: &'a Path,
}

impl<'a> Provisioner<'a> {
    pub fn new(executor: &'a dyn IacExecutor, working_dir: &'a Path) -> Self {
        Self {
            executor,
            working_dir,
        }
    }

    /// init, plan, then apply. Returns the apply outcome.
    pub fn provision(&self) -> IacResult<StepOutcome> {
        self.ensure_installed()?;

        info!("Initializing {}...", self.executor.get_name());
        let init = self.executor.init(self.working_dir)?;
        log_streams(&init, false);

        info!("Planning {} deployment...", self.executor.get_name());
        let plan = self.executor.plan(self.working_dir)?;
        log_streams(&plan, false);

        info!("Applying {} configuration...", self.executor.get_name());
        let apply = self.executor.apply(self.working_dir)?;
        info!("{} applied successfully!", self.executor.get_name());
        log_streams(&apply, true);

        Ok(apply)
    }

    /// Destroy everything the working directory's state tracks
    pub fn teardown(&self) -> IacResult<StepOutcome> {
        self.ensure_installed()?;

        info!("Destroying {} resources...", self.executor.get_name());
        let destroy = self.executor.destroy(self.working_dir)?;
        info!("{} destroyed successfully!", self.executor.get_name());
        log_streams(&destroy, true);

        Ok(destroy)
    }

    fn ensure_installed(&self) -> IacResult<()> {
        if self.executor.check_installed(self.working_dir) {
            Ok(())
        } else {
            Err(IacError::NotInstalled(self.executor.get_name().to_string()))
        }
    }
}

fn log_streams(outcome: &StepOutcome, verbose: bool) {
    if verbose {
        info!("return code: {}", outcome.exit_code);
        info!("stdout: {}", outcome.stdout);
        info!("stderr: {}", outcome.stderr);
    } else {
        tracing::debug!("{} stdout: {}", outcome.step, outcome.stdout);
        if !outcome.stderr.is_empty() {
            tracing::debug!("{} stderr: {}", outcome.step, outcome.stderr);
        }
    }
}

/// Teardown runs unless the answer is exactly "no", ignoring case.
/// Empty answers count as yes.
pub fn should_teardown(answer: &str) -> bool {
    !answer.eq_ignore_ascii_case("no")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iac::{Step, TerraformExecutor};
    use crate::traits::{CommandExecutor, MockCommandExecutor, MockCommandResult};
    use std::sync::Arc;

    fn terraform(mock: &Arc<MockCommandExecutor>) -> TerraformExecutor {
        let command: Arc<dyn CommandExecutor> = mock.clone();
        TerraformExecutor::new("terraform", command)
    }

    #[test]
    fn test_provision_runs_init_plan_apply_in_order() {
        let mock = Arc::new(MockCommandExecutor::with_outputs(vec![MockCommandResult::success(
            "apply",
            "Apply complete!",
        )]));
        let executor = terraform(&mock);

        let outcome = Provisioner::new(&executor, Path::new("/work"))
            .provision()
            .unwrap();

        assert_eq!(mock.subcommands(), vec!["version", "init", "plan", "apply"]);
        assert_eq!(outcome.step, Step::Apply);
        assert_eq!(outcome.exit_code, 0);
        assert_eq!(outcome.stdout, "Apply complete!");
    }

    #[test]
    fn test_provision_stops_at_first_failure() {
        let mock = Arc::new(MockCommandExecutor::with_outputs(vec![MockCommandResult::failure(
            "plan",
            1,
            "Error: Invalid provider configuration",
        )]));
        let executor = terraform(&mock);

        let err = Provisioner::new(&executor, Path::new("/work"))
            .provision()
            .unwrap_err();

        assert_eq!(err.step(), Some(Step::Plan));
        assert_eq!(mock.subcommands(), vec!["version", "init", "plan"]);
    }

    #[test]
    fn test_provision_requires_installed_binary() {
        let mock = Arc::new(MockCommandExecutor::with_outputs(vec![MockCommandResult::failure(
            "version", 127, "",
        )]));
        let executor = terraform(&mock);

        let err = Provisioner::new(&executor, Path::new("/work"))
            .provision()
            .unwrap_err();

        assert!(matches!(err, IacError::NotInstalled(ref name) if name == "terraform"));
        assert_eq!(mock.subcommands(), vec!["version"]);
    }

    #[test]
    fn test_teardown_only_destroys() {
        let mock = Arc::new(MockCommandExecutor::new());
        let executor = terraform(&mock);

        let outcome = Provisioner::new(&executor, Path::new("/work"))
            .teardown()
            .unwrap();

        assert_eq!(outcome.step, Step::Destroy);
        assert_eq!(mock.subcommands(), vec!["version", "destroy"]);
    }

    #[test]
    fn test_teardown_failure_is_an_error() {
        let mock = Arc::new(MockCommandExecutor::with_outputs(vec![MockCommandResult::failure(
            "destroy",
            1,
            "Error: deleting ELBv2 Load Balancer",
        )]));
        let executor = terraform(&mock);

        let err = Provisioner::new(&executor, Path::new("/work"))
            .teardown()
            .unwrap_err();

        assert_eq!(err.step(), Some(Step::Destroy));
    }

    #[test]
    fn test_should_teardown_unless_exactly_no() {
        for answer in ["no", "NO", "No", "nO"] {
            assert!(!should_teardown(answer), "{:?} should keep resources", answer);
        }
        for answer in ["", "yes", "y", "n", "nope", " no", "no ", "keep"] {
            assert!(should_teardown(answer), "{:?} should tear down", answer);
        }
    }
}
