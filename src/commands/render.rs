use crate::configuration::{Configuration, InputCollector};
use crate::context::Context;
use crate::stack::StackRenderer;
use anyhow::Result;
use std::path::PathBuf;

/// Handles the 'render' command - collects inputs and writes main.tf without provisioning
pub struct RenderCommand;

impl RenderCommand {
    /// Execute the render command
    pub fn execute(ctx: &Context) -> Result<PathBuf> {
        ctx.output.section("Render Terraform configuration");

        let (_, path) = Self::collect_and_render(ctx)?;

        ctx.output.success(&format!("Wrote {}", path.display()));

        Ok(path)
    }

    /// Prompt for the configuration and render it into the working directory
    pub(crate) fn collect_and_render(ctx: &Context) -> Result<(Configuration, PathBuf)> {
        let config = InputCollector::new(ctx.input.as_ref()).collect()?;
        Self::show_configuration(ctx, &config);

        let path = StackRenderer::new(ctx.fs.as_ref()).render(&config, &ctx.settings.working_dir)?;

        Ok((config, path))
    }

    fn show_configuration(ctx: &Context, config: &Configuration) {
        ctx.output.blank();
        ctx.output.key_value("AMI", config.image_identifier());
        ctx.output.key_value("Instance type", config.instance_size().as_str());
        ctx.output.key_value("Region", config.region());
        ctx.output.key_value("Availability zone", config.zone().as_str());
        ctx.output.key_value("Load balancer", config.resource_name());
    }
}
