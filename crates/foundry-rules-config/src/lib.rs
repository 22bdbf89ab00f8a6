//! Configuration system for foundry-rules.
//!
//! Provides JSON-based workflow configuration with:
//! - A typed model of the workflow, object type, output and validation policy
//! - `${NAME}` environment resolution for connection settings
//! - Bearer token lookup from a named environment variable
//! - Default config discovery (`FOUNDRY_RULES_CONFIG`, `config/default.json`)
//!
//! Config shape is checked once here; downstream crates take the resolved
//! config by reference and never re-validate it.

pub mod discovery;
pub mod error;
pub mod resolver;
pub mod types;

pub use discovery::{
    default_config_path, list_configs, load_config, load_config_file, load_config_with_env,
    save_config, LoadOptions, LoadedConfig, CONFIG_PATH_ENV,
};
pub use error::{ConfigError, Result, UnresolvedField};
pub use resolver::{extract_env_var_names, has_env_vars, resolve_env_vars, resolve_with};
pub use types::*;
