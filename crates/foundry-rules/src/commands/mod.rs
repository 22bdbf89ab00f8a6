//! CLI command handlers.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use console::Style;
use foundry_rules_config::{LoadOptions, ResolvedConfig, default_config_path, load_config};
use serde::Serialize;
use serde_json::Value;

pub mod codec;
pub mod create;
pub mod edit;
pub mod init;
pub mod review;
pub mod template;
pub mod validate;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Explicit config file, from `--config` or `FOUNDRY_RULES_CONFIG`.
    pub config_path: Option<PathBuf>,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Load the workflow config, printing any load warnings.
    ///
    /// `validate_token` is off for commands that never reach the platform.
    pub fn load_config(&self, validate_token: bool) -> Result<ResolvedConfig> {
        let path = match &self.config_path {
            Some(path) => path.clone(),
            None => default_config_path(None).context(
                "No config file found; pass --config or set FOUNDRY_RULES_CONFIG",
            )?,
        };

        let options = LoadOptions {
            validate_token,
            ..LoadOptions::default()
        };
        let loaded = load_config(&path, &options)
            .with_context(|| format!("Error loading config {}", path.display()))?;

        tracing::debug!(
            path = %loaded.path.display(),
            warnings = loaded.warnings.len(),
            "Config loaded"
        );

        let yellow = Style::new().yellow();
        for warning in &loaded.warnings {
            eprintln!("{} {}", yellow.apply_to("Warning:"), warning);
        }
        if self.verbose {
            eprintln!(
                "{}",
                Style::new()
                    .dim()
                    .apply_to(format!("Using config {}", loaded.path.display()))
            );
        }

        Ok(loaded.config)
    }

    /// Print a value as pretty JSON.
    pub fn print_json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

/// Read and parse a JSON file.
pub fn read_json_file(path: &Path) -> Result<Value> {
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Print `label` followed by a bulleted list, skipping empty lists.
pub fn print_list(label: &str, style: &Style, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("{}", style.apply_to(label));
    for item in items {
        println!("  - {}", item);
    }
}
