//! Approve, reject and bulk-reject commands.

use anyhow::{Result, bail};
use clap::Args;
use console::{Style, style};
use foundry_rules_client::FoundryClient;
use foundry_rules_sdk::{Proposals, ReviewResult};

use super::Context;

/// Arguments for the approve command.
#[derive(Args, Debug)]
pub struct ApproveArgs {
    /// Proposal ID to approve
    pub proposal_id: String,

    /// Rule ID associated with the proposal
    pub rule_id: String,

    /// Reviewer name (default: the configured author)
    #[arg(short, long)]
    pub reviewer: Option<String>,
}

/// Arguments for the reject command.
#[derive(Args, Debug)]
pub struct RejectArgs {
    /// Proposal ID to reject
    pub proposal_id: String,

    /// Reviewer name (default: the configured author)
    #[arg(short, long)]
    pub reviewer: Option<String>,
}

/// Arguments for the bulk-reject command.
#[derive(Args, Debug)]
pub struct BulkRejectArgs {
    /// Proposal IDs to reject
    #[arg(required = true)]
    pub proposal_ids: Vec<String>,

    /// Rejection reason, recorded as the reviewer
    #[arg(long)]
    pub reason: Option<String>,
}

fn print_review(result: &ReviewResult, ctx: &Context) -> Result<()> {
    if ctx.json_output {
        ctx.print_json(result)?;
    } else {
        println!("{}", style(&result.message).green());
    }
    Ok(())
}

/// Run the approve command.
pub async fn run_approve(args: ApproveArgs, ctx: &Context) -> Result<()> {
    let config = ctx.load_config(true)?;
    let client = FoundryClient::from_connection(&config.foundry)?;
    let result = Proposals::new(&config, &client)
        .approve(&args.proposal_id, &args.rule_id, args.reviewer.as_deref())
        .await?;
    print_review(&result, ctx)
}

/// Run the reject command.
pub async fn run_reject(args: RejectArgs, ctx: &Context) -> Result<()> {
    let config = ctx.load_config(true)?;
    let client = FoundryClient::from_connection(&config.foundry)?;
    let result = Proposals::new(&config, &client)
        .reject(&args.proposal_id, args.reviewer.as_deref())
        .await?;
    print_review(&result, ctx)
}

/// Run the bulk-reject command.
pub async fn run_bulk_reject(args: BulkRejectArgs, ctx: &Context) -> Result<()> {
    let config = ctx.load_config(true)?;
    let client = FoundryClient::from_connection(&config.foundry)?;
    let result = Proposals::new(&config, &client)
        .bulk_reject(&args.proposal_ids, args.reason.as_deref())
        .await;

    if ctx.json_output {
        ctx.print_json(&result)?;
    } else if result.success {
        println!(
            "{}",
            style(format!("Successfully rejected {} proposals", result.rejected)).green()
        );
    } else {
        println!(
            "{}",
            style(format!("Rejected {}/{} proposals", result.rejected, result.total)).yellow()
        );
        println!("{}", style(format!("Failed: {}", result.failed)).red());
        let dim = Style::new().dim();
        for failure in result.results.iter().filter(|r| !r.success) {
            println!("  - {}: {}", failure.proposal_id, dim.apply_to(&failure.message));
        }
    }

    if !result.success {
        bail!("{} of {} rejections failed", result.failed, result.total);
    }
    Ok(())
}
