//! Error types for the rule-logic core.

use thiserror::Error;

/// Result type for rule-logic operations.
pub type Result<T> = std::result::Result<T, LogicError>;

/// Errors raised by the codec and the filter builders.
///
/// Validators never return these; they collect findings into their result
/// types instead.
#[derive(Debug, Error)]
pub enum LogicError {
    /// The compression envelope is missing or has no `compressedValue`.
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// The compressed payload could not be decoded back into JSON.
    #[error("Decode failure: {0}")]
    DecodeFailure(String),

    /// A builder was called with arguments it cannot satisfy.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A filter tree exceeds the configured nesting limit.
    #[error("filter tree nests deeper than {limit} levels")]
    FilterTooDeep { limit: usize },

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
