//! Init command - writes a starter config file.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use console::{Style, style};
use foundry_rules_config::{WorkflowConfig, save_config};

use super::Context;

/// Arguments for the init command.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Output config file path
    #[arg(short, long, default_value = "foundry-rules.json")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

/// Run the init command.
pub fn run(args: InitArgs, _ctx: &Context) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!(
            "File already exists: {} (use --force to overwrite)",
            args.output.display()
        );
    }

    let starter = WorkflowConfig::starter();
    save_config(&starter, &args.output)?;

    let dim = Style::new().dim();
    println!("{} {}", style("Created config file:").green(), args.output.display());
    println!();
    println!("{}", dim.apply_to("Edit the file and set your workflow/ontology details."));
    println!(
        "{}",
        dim.apply_to(format!(
            "Set {} for authentication.",
            starter.foundry.token_env_var
        ))
    );
    Ok(())
}
