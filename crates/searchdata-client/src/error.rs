//! Client configuration error types

use thiserror::Error;

/// Client configuration error
#[derive(Error, Debug)]
pub enum ClientError {
    /// Null, empty or out-of-range input passed to a builder or parser operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Endpoint text that is not `host` or `host:port`
    #[error("Malformed endpoint '{input}': {reason}")]
    MalformedEndpoint { input: String, reason: String },

    /// Mutually exclusive options set at the same time
    #[error("Conflicting configuration: {0}")]
    ConflictingConfiguration(String),

    /// Header name or value rejected by the HTTP layer
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// Settings file or environment could not be read
    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    /// HTTP client wiring failed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        ClientError::MalformedEndpoint {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for client configuration operations
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let error = ClientError::InvalidArgument("At least one host is required".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid argument: At least one host is required"
        );
    }

    #[test]
    fn test_malformed_endpoint_display() {
        let error = ClientError::malformed("es1:abc", "port must be numeric");
        assert_eq!(
            error.to_string(),
            "Malformed endpoint 'es1:abc': port must be numeric"
        );
    }

    #[test]
    fn test_conflicting_configuration_display() {
        let error = ClientError::ConflictingConfiguration("both set".to_string());
        assert!(error.to_string().contains("Conflicting configuration"));
    }

    #[test]
    fn test_error_debug_format() {
        let error = ClientError::InvalidHeader {
            name: "x-bad".to_string(),
            reason: "invalid value".to_string(),
        };
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("InvalidHeader"));
    }
}
