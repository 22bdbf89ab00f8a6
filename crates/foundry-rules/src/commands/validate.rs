//! Validate command - runs every local check against a proposal file.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use console::{Style, style};
use foundry_rules_sdk::{ProposalInput, validate_proposal};

use super::{Context, print_list, read_json_file};

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to JSON file with proposal data
    pub file: PathBuf,
}

/// Run the validate command.
pub fn run(args: ValidateArgs, ctx: &Context) -> Result<()> {
    let config = ctx.load_config(false)?;
    let input = ProposalInput::from_value(&read_json_file(&args.file)?);
    let result = validate_proposal(input.logic.as_ref(), &config);

    if ctx.json_output {
        ctx.print_json(&result)?;
    } else if result.valid {
        println!("{}", style("Validation passed!").green().bold());
        print_list("Warnings:", &Style::new().yellow(), &result.filter_warnings);
    } else {
        let red = Style::new().red();
        println!("{}", style("Validation failed").red().bold());
        print_list("Structure errors:", &red, &result.structure_errors);
        print_list("Property errors:", &red, &result.property_errors);
        print_list("Filter errors:", &red, &result.filter_errors);
        print_list("Warnings:", &Style::new().yellow(), &result.filter_warnings);
    }

    if !result.valid {
        bail!("Validation failed");
    }
    Ok(())
}
