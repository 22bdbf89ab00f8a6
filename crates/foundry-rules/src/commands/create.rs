//! Create command - validates and submits a new proposal.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use console::{Style, style};
use foundry_rules_client::FoundryClient;
use foundry_rules_sdk::{ProposalInput, Proposals, validate_proposal};

use super::{Context, print_list, read_json_file};

/// Arguments for the create command.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Path to JSON file with proposal data
    pub file: PathBuf,

    /// Validate only, don't create
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Run the create command.
pub async fn run(args: CreateArgs, ctx: &Context) -> Result<()> {
    let input = ProposalInput::from_value(&read_json_file(&args.file)?);

    if args.dry_run {
        let config = ctx.load_config(false)?;
        let result = validate_proposal(input.logic.as_ref(), &config);
        if ctx.json_output {
            ctx.print_json(&result)?;
        } else if result.valid {
            println!("{}", style("Validation passed - would create proposal").green());
        } else {
            println!("{}", style("Validation failed").red());
            print_list("Errors:", &Style::new().red(), &result.tagged_errors());
        }
        if !result.valid {
            bail!("Validation failed");
        }
        return Ok(());
    }

    let config = ctx.load_config(true)?;
    let client = FoundryClient::from_connection(&config.foundry)?;
    let created = Proposals::new(&config, &client).create(&input).await?;

    if ctx.json_output {
        ctx.print_json(&created)?;
    } else {
        let cyan = Style::new().cyan();
        println!("{}", style("Proposal created successfully!").green().bold());
        println!();
        println!("  Proposal ID: {}", cyan.apply_to(&created.proposal_id));
        println!("  Rule ID:     {}", cyan.apply_to(&created.rule_id));
        if ctx.verbose {
            println!("  Logic:       {}", created.compressed_logic);
        }
    }
    Ok(())
}
