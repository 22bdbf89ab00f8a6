//! Error types for proposal operations.

use thiserror::Error;

/// Result type for proposal operations.
pub type Result<T> = std::result::Result<T, SdkError>;

#[derive(Debug, Error)]
pub enum SdkError {
    /// One or more validation stages failed. Messages carry their stage tag.
    #[error("Validation failed:\n{}", .0.join("\n"))]
    ValidationFailed(Vec<String>),

    /// The platform rejected or could not process an action.
    #[error("Action {action} failed: {source}")]
    Action {
        action: String,
        #[source]
        source: foundry_rules_client::Error,
    },
}

impl SdkError {
    /// Tagged validation messages, if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&[String]> {
        match self {
            Self::ValidationFailed(errors) => Some(errors),
            Self::Action { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failed_lists_every_message() {
        let err = SdkError::ValidationFailed(vec![
            "[Structure] Missing strategy".to_string(),
            "[Filter] bad".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed:\n[Structure] Missing strategy\n[Filter] bad"
        );
        assert_eq!(err.validation_errors().map(<[String]>::len), Some(2));
    }

    #[test]
    fn action_error_names_the_action() {
        let err = SdkError::Action {
            action: "approve-proposal".to_string(),
            source: foundry_rules_client::Error::Api {
                status: 400,
                body: "nope".to_string(),
            },
        };
        let message = err.to_string();
        assert!(message.starts_with("Action approve-proposal failed"));
        assert!(message.contains("nope"));
        assert!(err.validation_errors().is_none());
    }
}
