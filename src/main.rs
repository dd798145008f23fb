mod commands;
mod configuration;
mod context;
mod hcl;
mod iac;
mod logging;
mod output;
mod stack;
mod traits;
mod validation;

use clap::{Parser, Subcommand};
use commands::{DeployCommand, DestroyCommand, RenderCommand, ValidateCommand};
use context::{Context, Settings};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error};

/// Process exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const FAILURE: u8 = 1;
}

#[derive(Parser)]
#[command(name = "stackup")]
#[command(about = "Stackup - Provision a web server behind an application load balancer with Terraform", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory for main.tf, Terraform state and the validation report
    #[arg(long, global = true, env = "STACKUP_WORKDIR", default_value = ".")]
    workdir: PathBuf,

    /// Provisioning binary to run (terraform or an argument-compatible one such as tofu)
    #[arg(long, global = true, env = "STACKUP_TERRAFORM_BIN", default_value = iac::terraform::DEFAULT_BINARY)]
    terraform_bin: String,

    /// Directory the per-run log file is written to
    #[arg(long, global = true, env = "STACKUP_LOG_DIR", default_value = ".")]
    log_dir: PathBuf,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Collect inputs, provision, validate and optionally tear down (default)
    Deploy,

    /// Collect inputs and write main.tf without provisioning
    Render,

    /// Look up the deployed resources and write the validation report
    Validate,

    /// Destroy the deployed resources after confirmation
    Destroy,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = std::env::var(logging::LOG_LEVEL_ENV).ok();
    let logger = match logging::build(&cli.log_dir, level.as_deref()) {
        Ok(logger) => logger,
        Err(err) => {
            output::error(&format!("{:#}", err));
            return ExitCode::from(ExitCodes::FAILURE);
        }
    };

    let ctx = Context::new(Settings {
        working_dir: cli.workdir,
        terraform_bin: cli.terraform_bin,
    });
    let command = cli.command.unwrap_or(Commands::Deploy);

    tracing::dispatcher::with_default(&logger.dispatch, || run(command, &ctx, &logger.log_file))
}

fn run(command: Commands, ctx: &Context, log_file: &Path) -> ExitCode {
    debug!("Logging to {}", log_file.display());

    let result = match command {
        Commands::Deploy => DeployCommand::execute(ctx).map(|summary| {
            debug!(
                "apply exited with {}, instance {} is {}, torn down: {}",
                summary.apply_exit_code,
                summary.report.instance_id,
                summary.report.instance_state,
                summary.torn_down
            );
        }),
        Commands::Render => RenderCommand::execute(ctx).map(|_| ()),
        Commands::Validate => {
            ValidateCommand::execute(ctx);
            Ok(())
        }
        Commands::Destroy => DestroyCommand::execute(ctx).map(|_| ()),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(err) => {
            if let Some(step) = err.downcast_ref::<iac::IacError>().and_then(iac::IacError::step) {
                error!("Failed during the {} step", step);
            }
            error!("{:?}", err);
            ctx.output.error(&format!("{:#}", err));
            ExitCode::from(ExitCodes::FAILURE)
        }
    }
}
