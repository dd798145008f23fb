use crate::commands::{DestroyCommand, RenderCommand, ValidateCommand};
use crate::context::Context;
use crate::iac::Provisioner;
use crate::validation::ValidationReport;
use anyhow::{Context as AnyhowContext, Result};
use tracing::info;

pub const START_PROMPT: &str = "Press the enter key to start giving input for your resources...";

/// What a full run did, for callers and tests
#[derive(Debug)]
pub struct DeploySummary {
    pub apply_exit_code: i32,
    pub report: ValidationReport,
    pub torn_down: bool,
}

/// Handles the default command - the whole interactive lifecycle:
/// inputs, render, init/plan/apply, validation, optional teardown
pub struct DeployCommand;

impl DeployCommand {
    /// Execute the deploy command
    pub fn execute(ctx: &Context) -> Result<DeploySummary> {
        ctx.output.section("Stackup");
        info!("Welcome to stackup!");
        ctx.input.text(START_PROMPT, None)?;
        info!("Let's go!");

        let (config, _) = RenderCommand::collect_and_render(ctx)?;

        let executor = ctx.executor();
        let apply = Provisioner::new(executor.as_ref(), &ctx.settings.working_dir)
            .provision()
            .context("Terraform execution failed")?;
        ctx.output.success(&format!(
            "Load balancer '{}' provisioned",
            config.resource_name()
        ));

        let report = ValidateCommand::execute(ctx);
        info!("Deployment completed successfully!");

        ctx.output.section("Teardown");
        let torn_down = DestroyCommand::confirm_and_teardown(ctx)?.is_some();

        info!("Bye bye!");

        Ok(DeploySummary {
            apply_exit_code: apply.exit_code,
            report,
            torn_down,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{
        InstanceSummary, LoadBalancerSummary, MockCloudInspector, MockCommandExecutor,
        MockCommandResult, MockFileSystem, MockOutput, MockUserInput,
    };
    use crate::validation::REPORT_FILE_NAME;
    use std::path::Path;
    use std::sync::Arc;

    struct Harness {
        fs: Arc<MockFileSystem>,
        input: Arc<MockUserInput>,
        command: Arc<MockCommandExecutor>,
        ctx: Context,
    }

    fn harness(
        answers: &[&str],
        outputs: Vec<MockCommandResult>,
        cloud: MockCloudInspector,
    ) -> Harness {
        let fs = Arc::new(MockFileSystem::new());
        let input = Arc::new(MockUserInput::with_answers(answers));
        let command = Arc::new(MockCommandExecutor::with_outputs(outputs));
        let ctx = Context::test_with(
            fs.clone(),
            input.clone(),
            Arc::new(MockOutput::new()),
            command.clone(),
            Arc::new(cloud),
        );
        Harness {
            fs,
            input,
            command,
            ctx,
        }
    }

    #[test]
    fn test_full_run_with_teardown() {
        let h = harness(
            &["", "amazon linux", "t3.medium", "us-west-2", "us-east-1c", "lb1", ""],
            vec![MockCommandResult::success("apply", "Apply complete!")],
            MockCloudInspector::empty()
                .with_instance(InstanceSummary {
                    instance_id: Some("i-0123".to_string()),
                    state: Some("running".to_string()),
                    public_ip: Some("3.80.1.2".to_string()),
                })
                .with_load_balancer(LoadBalancerSummary {
                    dns_name: Some("lb1-1.us-east-1.elb.amazonaws.com".to_string()),
                }),
        );

        let summary = DeployCommand::execute(&h.ctx).unwrap();

        assert_eq!(summary.apply_exit_code, 0);
        assert!(summary.torn_down);
        assert_eq!(summary.report.instance_id, "i-0123");
        assert_eq!(
            h.command.subcommands(),
            vec!["version", "init", "plan", "apply", "version", "destroy"]
        );
        assert_eq!(h.input.remaining(), 0);
        assert_eq!(h.input.prompts().len(), 7);

        let main_tf = h.fs.get_file_contents(Path::new("/work/main.tf")).unwrap();
        assert!(main_tf.contains("ami = \"ami-0f1a6835595fb9246\""));
        assert!(main_tf.contains("region = \"us-east-1\""));
        assert!(main_tf.contains("availability_zone = \"us-east-1a\""));
        assert!(h.fs.has_file(&Path::new("/work").join(REPORT_FILE_NAME)));
    }

    #[test]
    fn test_full_run_keeping_resources() {
        let h = harness(
            &["", "ubuntu", "t3.small", "us-east-1", "us-east-1a", "lb1", "NO"],
            vec![],
            MockCloudInspector::failing("no credentials"),
        );

        let summary = DeployCommand::execute(&h.ctx).unwrap();

        assert!(!summary.torn_down);
        assert_eq!(summary.report, ValidationReport::placeholder());
        assert_eq!(h.command.subcommands(), vec!["version", "init", "plan", "apply"]);
    }

    #[test]
    fn test_apply_failure_aborts_before_validation() {
        let cloud = MockCloudInspector::empty();
        let h = harness(
            &["", "ubuntu", "t3.small", "us-east-1", "us-east-1a", "lb1", ""],
            vec![MockCommandResult::failure(
                "apply",
                1,
                "Error: creating ELBv2 application Load Balancer: ValidationError",
            )],
            cloud,
        );

        let err = DeployCommand::execute(&h.ctx).unwrap_err();

        assert!(format!("{:#}", err).starts_with("Terraform execution failed"));
        assert!(!h.fs.has_file(&Path::new("/work").join(REPORT_FILE_NAME)));
        // Teardown prompt was never reached
        assert_eq!(h.input.remaining(), 1);
    }
}
