//! Environment variable resolution for `${NAME}` references in config values.
//!
//! Unset variables are left in place verbatim and reported back to the
//! caller, so a config with several missing variables can be reported in a
//! single pass.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

/// Check whether a string contains any `${NAME}` reference.
pub fn has_env_vars(value: &str) -> bool {
    ENV_VAR_PATTERN.is_match(value)
}

/// Extract all referenced variable names, in order of appearance.
pub fn extract_env_var_names(value: &str) -> Vec<String> {
    ENV_VAR_PATTERN
        .captures_iter(value)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Resolve `${NAME}` references against the process environment.
///
/// Returns the substituted string and the names that were not set.
pub fn resolve_env_vars(value: &str) -> (String, Vec<String>) {
    resolve_with(value, |name| std::env::var(name).ok())
}

/// Resolve `${NAME}` references using a custom lookup.
pub fn resolve_with<F>(value: &str, lookup: F) -> (String, Vec<String>)
where
    F: Fn(&str) -> Option<String>,
{
    let mut missing = Vec::new();
    let resolved = ENV_VAR_PATTERN.replace_all(value, |caps: &Captures<'_>| {
        let name = &caps[1];
        match lookup(name) {
            Some(v) => v,
            None => {
                missing.push(name.to_string());
                caps[0].to_string()
            }
        }
    });
    (resolved.into_owned(), missing)
}

/// Return the names from `names` that are not set in the environment.
pub fn missing_env_vars<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| std::env::var(name).is_err())
        .map(str::to_string)
        .collect()
}

/// Read an environment variable, treating unset as `None`.
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
