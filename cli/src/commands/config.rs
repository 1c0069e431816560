use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use lookup_harness::HarnessConfig;

use crate::error::CliError;
use crate::output::OutputManager;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Configuration action
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(clap::Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration (defaults, file and environment merged)
    Show,

    /// Write a default configuration file
    Init {
        /// Destination path
        #[arg(long, default_value = "lookup-bench.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub async fn run(args: ConfigArgs, config: HarnessConfig, output: OutputManager) -> Result<()> {
    match args.action {
        ConfigAction::Show => output.print_config(&config),
        ConfigAction::Init { path, force } => {
            if path.exists() && !force {
                return Err(CliError::InvalidArgument(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                ))
                .into());
            }

            HarnessConfig::default()
                .save_to_file(&path)
                .with_context(|| format!("writing configuration to {}", path.display()))?;
            output.print_success(&format!("Wrote default configuration to {}", path.display()));
            Ok(())
        }
    }
}
