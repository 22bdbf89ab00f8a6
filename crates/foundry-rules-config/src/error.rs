//! Configuration error types.

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur during configuration loading and resolution.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file does not exist.
    #[error("config file not found: {0}")]
    NotFound(String),

    /// Failed to read a config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to write a config file.
    #[error("failed to write config file '{path}': {source}")]
    WriteFile {
        path: String,
        source: std::io::Error,
    },

    /// Malformed JSON or a missing/invalid field.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// One or more `${NAME}` references could not be resolved.
    #[error("{}", format_unresolved(.0))]
    UnresolvedEnv(Vec<UnresolvedField>),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// A config field whose environment references are unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedField {
    /// Dotted path of the field, e.g. `foundry.url`.
    pub field: String,
    /// Variable names that had no value.
    pub names: Vec<String>,
}

fn format_unresolved(fields: &[UnresolvedField]) -> String {
    fields
        .iter()
        .map(|f| {
            format!(
                "missing environment variable for {}: {}",
                f.field,
                f.names.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}
