//! foundry-rules - manage rule change proposals from the command line
//!
//! Main entry point for the foundry-rules CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{codec, create, edit, init, review, template, validate};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// foundry-rules - manage rule change proposals from the command line
#[derive(Parser)]
#[command(name = "foundry-rules")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the workflow config file
    #[arg(short, long, global = true, env = "FOUNDRY_RULES_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a proposal without creating it
    Validate(validate::ValidateArgs),

    /// Create a new proposal
    Create(create::CreateArgs),

    /// Approve a proposal
    Approve(review::ApproveArgs),

    /// Reject a proposal
    Reject(review::RejectArgs),

    /// Reject several proposals
    BulkReject(review::BulkRejectArgs),

    /// Edit an existing proposal
    Edit(edit::EditArgs),

    /// List or show built-in templates
    Template(template::TemplateArgs),

    /// Compress rule logic JSON into the wire envelope
    Compress(codec::CompressArgs),

    /// Decompress a wire envelope back into rule logic JSON
    Decompress(codec::DecompressArgs),

    /// Write a starter config file
    Init(init::InitArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let filter = if cli.verbose {
        "foundry_rules=debug,foundry_rules_sdk=debug,foundry_rules_logic=debug,foundry_rules_client=debug,foundry_rules_config=debug,warn"
    } else {
        "foundry_rules=warn,foundry_rules_sdk=warn,warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(cli.verbose)
        .with_writer(std::io::stderr)
        .init();

    let ctx = commands::Context {
        config_path: cli.config,
        json_output: cli.json,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Validate(args) => validate::run(args, &ctx),
        Commands::Create(args) => create::run(args, &ctx).await,
        Commands::Approve(args) => review::run_approve(args, &ctx).await,
        Commands::Reject(args) => review::run_reject(args, &ctx).await,
        Commands::BulkReject(args) => review::run_bulk_reject(args, &ctx).await,
        Commands::Edit(args) => edit::run(args, &ctx).await,
        Commands::Template(args) => template::run(args, &ctx),
        Commands::Compress(args) => codec::run_compress(args, &ctx),
        Commands::Decompress(args) => codec::run_decompress(args, &ctx),
        Commands::Init(args) => init::run(args, &ctx),
    }
}
