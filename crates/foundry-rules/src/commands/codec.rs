//! Compress and decompress commands.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Args;
use console::style;
use foundry_rules_logic::{compress, decompress};

use super::{Context, read_json_file};

/// Arguments for the compress command.
#[derive(Args, Debug)]
pub struct CompressArgs {
    /// Path to JSON file to compress
    pub file: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the decompress command.
#[derive(Args, Debug)]
pub struct DecompressArgs {
    /// Envelope JSON string, or @path to read it from a file
    pub input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

fn write_output(contents: &str, output: Option<&Path>, label: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, contents)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{} {}", style(label).green(), path.display());
        }
        None => println!("{}", contents),
    }
    Ok(())
}

/// Run the compress command.
pub fn run_compress(args: CompressArgs, _ctx: &Context) -> Result<()> {
    let document = read_json_file(&args.file)?;
    write_output(&compress(&document), args.output.as_deref(), "Compressed to:")
}

/// Run the decompress command.
pub fn run_decompress(args: DecompressArgs, _ctx: &Context) -> Result<()> {
    let envelope = match args.input.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("File not found: {}", path))?
            .trim()
            .to_string(),
        None => args.input,
    };

    let document = decompress(&envelope).context("Decompression error")?;
    let rendered = if args.compact {
        serde_json::to_string(&document)?
    } else {
        serde_json::to_string_pretty(&document)?
    };
    write_output(&rendered, args.output.as_deref(), "Decompressed to:")
}
