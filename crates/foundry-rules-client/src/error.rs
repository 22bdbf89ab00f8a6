//! Client error types.

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server returned a non-success response.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api { status: 404, .. })
    }

    /// Check if this is an authentication or permission error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Api { status: 401 | 403, .. })
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api { status, .. } if *status >= 500)
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_helpers() {
        let api = |status| Error::Api {
            status,
            body: String::new(),
        };
        assert!(api(404).is_not_found());
        assert!(api(401).is_auth_error());
        assert!(api(403).is_auth_error());
        assert!(api(502).is_server_error());
        assert!(!api(400).is_server_error());
        assert!(!Error::Config("x".to_string()).is_not_found());
    }

    #[test]
    fn test_api_error_display_includes_body() {
        let err = Error::Api {
            status: 400,
            body: r#"{"errorName":"InvalidParameter"}"#.to_string(),
        };
        assert_eq!(
            err.to_string(),
            r#"API error (400): {"errorName":"InvalidParameter"}"#
        );
    }
}
