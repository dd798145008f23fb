use crate::context::Context;
use crate::validation::{ResourceValidator, ValidationReport};

/// Handles the 'validate' command - checks the live resources and writes the report
pub struct ValidateCommand;

impl ValidateCommand {
    /// Execute the validate command. Never fails: lookups fall back to placeholders.
    pub fn execute(ctx: &Context) -> ValidationReport {
        ctx.output.section("AWS validation");

        let report = ResourceValidator::new(ctx.cloud.as_ref(), ctx.fs.as_ref())
            .validate(&ctx.settings.working_dir);

        Self::show_report(ctx, &report);

        report
    }

    pub(crate) fn show_report(ctx: &Context, report: &ValidationReport) {
        ctx.output.key_value("Instance ID", &report.instance_id);
        ctx.output.key_value("Instance state", &report.instance_state);
        ctx.output.key_value("Public IP", &report.public_ip);
        ctx.output.key_value("Load balancer DNS", &report.load_balancer_dns);
    }
}
