//! Edit command - partial update of an existing proposal.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console::style;
use foundry_rules_client::FoundryClient;
use foundry_rules_sdk::{EditProposalInput, LogicSource, Proposals};

use super::{Context, read_json_file};

/// Arguments for the edit command.
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Proposal ID to edit
    pub proposal_id: String,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// New keywords
    #[arg(long)]
    pub keywords: Option<String>,

    /// Path to JSON file with new logic (a document, or `{template, params}`)
    #[arg(long = "logic", value_name = "FILE")]
    pub logic_file: Option<PathBuf>,
}

/// Run the edit command.
pub async fn run(args: EditArgs, ctx: &Context) -> Result<()> {
    let logic = match &args.logic_file {
        Some(path) => Some(LogicSource::from_value(read_json_file(path)?)),
        None => None,
    };

    let config = ctx.load_config(true)?;
    let client = FoundryClient::from_connection(&config.foundry)?;
    let input = EditProposalInput {
        proposal_id: args.proposal_id,
        name: args.name,
        description: args.description,
        keywords: args.keywords,
        logic,
    };
    let result = Proposals::new(&config, &client).edit(&input).await?;

    if ctx.json_output {
        ctx.print_json(&result)?;
    } else {
        println!("{}", style(&result.message).green());
    }
    Ok(())
}
