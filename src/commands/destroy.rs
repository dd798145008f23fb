use crate::context::Context;
use crate::iac::{Provisioner, StepOutcome, should_teardown};
use anyhow::{Context as AnyhowContext, Result};
use tracing::info;

pub const TEARDOWN_PROMPT: &str = "Would you like to destroy the configuration?";

/// Handles the 'destroy' command - tears the stack down after confirmation
pub struct DestroyCommand;

impl DestroyCommand {
    /// Execute the destroy command
    pub fn execute(ctx: &Context) -> Result<Option<StepOutcome>> {
        ctx.output.section("Teardown");
        Self::confirm_and_teardown(ctx)
    }

    /// Ask for confirmation and destroy unless the answer is "no".
    /// Returns the destroy outcome, or None when the user kept the resources.
    pub(crate) fn confirm_and_teardown(ctx: &Context) -> Result<Option<StepOutcome>> {
        info!("{} (yes/no, default is yes)", TEARDOWN_PROMPT);
        let answer = ctx
            .input
            .text(TEARDOWN_PROMPT, Some("yes/no, default is yes"))?;

        if !should_teardown(&answer) {
            info!("Keeping the deployed resources");
            ctx.output.info("Resources kept. Run 'stackup destroy' to remove them later.");
            return Ok(None);
        }

        let executor = ctx.executor();
        let outcome = Provisioner::new(executor.as_ref(), &ctx.settings.working_dir)
            .teardown()
            .context("Terraform destroy failed")?;

        ctx.output.success("Resources destroyed");

        Ok(Some(outcome))
    }
}
