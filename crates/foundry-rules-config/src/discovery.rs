//! Config file discovery, loading and resolution.
//!
//! Resolution order for the default config path:
//! 1. `FOUNDRY_RULES_CONFIG` environment variable
//! 2. `<base_dir>/config/default.json` (when a base dir is given)
//! 3. `./config/default.json`

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::UnresolvedField;
use crate::resolver::resolve_with;
use crate::{ConfigError, ResolvedConfig, ResolvedConnection, Result, WorkflowConfig};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "FOUNDRY_RULES_CONFIG";

/// Directory searched for configs relative to a base directory.
const CONFIG_DIR: &str = "config";

/// Default config filename within [`CONFIG_DIR`].
const DEFAULT_CONFIG_FILE: &str = "default.json";

/// Options controlling [`load_config`].
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Warn when the token environment variable is unset.
    pub validate_token: bool,
    /// Resolve relative template file paths against the config directory.
    pub resolve_paths: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            validate_token: true,
            resolve_paths: true,
        }
    }
}

impl LoadOptions {
    /// Options for syntax checks: no token warning.
    pub fn syntax_only() -> Self {
        Self {
            validate_token: false,
            ..Self::default()
        }
    }
}

/// Result of loading a config file.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The resolved configuration.
    pub config: ResolvedConfig,
    /// Path the config was loaded from.
    pub path: PathBuf,
    /// Non-fatal problems found while loading (e.g., unset token).
    pub warnings: Vec<String>,
}

/// Load, validate and resolve a workflow config file.
pub fn load_config(path: &Path, options: &LoadOptions) -> Result<LoadedConfig> {
    load_config_with_env(path, options, |name| std::env::var(name).ok())
}

/// Load a config file, resolving environment references through `lookup`.
pub fn load_config_with_env<F>(path: &Path, options: &LoadOptions, lookup: F) -> Result<LoadedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = load_config_file(path)?;
    let mut config = resolve_config(raw, &lookup)?;

    if options.resolve_paths {
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        resolve_template_paths(&mut config, base);
    }

    let mut warnings = Vec::new();
    if options.validate_token && config.foundry.token.is_empty() {
        warnings.push(format!(
            "Token environment variable not set: {}",
            config.foundry.token_env_var
        ));
    }

    debug!(path = %path.display(), warnings = warnings.len(), "config loaded");

    Ok(LoadedConfig {
        config,
        path: path.to_path_buf(),
        warnings,
    })
}

/// Read and parse a config file without resolving it.
pub fn load_config_file(path: &Path) -> Result<WorkflowConfig> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    WorkflowConfig::from_json(&contents)
}

/// Write a config file, creating parent directories as needed.
pub fn save_config(config: &WorkflowConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let contents = config.to_json()?;
    std::fs::write(path, contents).map_err(|e| ConfigError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })
}

/// Find the default config path, if any.
pub fn default_config_path(base_dir: Option<&Path>) -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV)
        && !path.is_empty()
    {
        return Some(PathBuf::from(path));
    }

    let mut candidates = Vec::new();
    if let Some(base) = base_dir {
        candidates.push(base.join(CONFIG_DIR).join(DEFAULT_CONFIG_FILE));
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(CONFIG_DIR).join(DEFAULT_CONFIG_FILE));
    }

    candidates.into_iter().find(|p| p.is_file())
}

/// List config files in a directory, skipping `*-schema.json` files.
pub fn list_configs(config_dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(config_dir) else {
        return Vec::new();
    };

    let mut configs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension().is_some_and(|ext| ext == "json")
                && !p
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with("-schema.json"))
        })
        .collect();
    configs.sort();
    configs
}

/// Substitute environment references in the connection settings.
fn resolve_config<F>(raw: WorkflowConfig, lookup: &F) -> Result<ResolvedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let (url, url_missing) = resolve_with(&raw.foundry.url, lookup);
    let (ontology_rid, ontology_missing) = resolve_with(&raw.foundry.ontology_rid, lookup);

    let mut unresolved = Vec::new();
    if !url_missing.is_empty() {
        unresolved.push(UnresolvedField {
            field: "foundry.url".to_string(),
            names: url_missing,
        });
    }
    if !ontology_missing.is_empty() {
        unresolved.push(UnresolvedField {
            field: "foundry.ontologyRid".to_string(),
            names: ontology_missing,
        });
    }
    if !unresolved.is_empty() {
        return Err(ConfigError::UnresolvedEnv(unresolved));
    }

    let token = lookup(&raw.foundry.token_env_var).unwrap_or_default();

    Ok(ResolvedConfig {
        version: raw.version,
        workflow: raw.workflow,
        foundry: ResolvedConnection {
            url,
            ontology_rid,
            token,
            token_env_var: raw.foundry.token_env_var,
        },
        sdk: raw.sdk,
        validation: raw.validation,
        conventions: raw.conventions,
        templates: raw.templates,
    })
}

fn resolve_template_paths(config: &mut ResolvedConfig, base: &Path) {
    for template in &mut config.templates {
        if let Some(file) = &template.file
            && file.is_relative()
        {
            let joined = base.join(file);
            template.file = Some(std::fs::canonicalize(&joined).unwrap_or(joined));
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
