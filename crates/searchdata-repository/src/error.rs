//! Error types for the repository layer

use thiserror::Error;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors raised while resolving or executing repository queries
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Method signature cannot be backed by any query strategy
    #[error("Invalid mapping: {0}")]
    InvalidMapping(String),

    /// Arguments passed to a repository method do not match its signature
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A placeholder or expression could not be evaluated against the arguments
    #[error("Expression evaluation failed: {0}")]
    ExpressionEvaluation(String),

    /// A bound value has no query-literal form
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// Repository declares a capability this crate does not provide
    #[error("Unsupported repository: {0}")]
    UnsupportedRepository(String),

    /// Failure reported by the search operations backend
    #[error("Operations error: {0}")]
    Operations(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<searchdata_parser::ParseError> for RepositoryError {
    fn from(err: searchdata_parser::ParseError) -> Self {
        RepositoryError::InvalidMapping(err.to_string())
    }
}

impl From<searchdata_core::CoreError> for RepositoryError {
    fn from(err: searchdata_core::CoreError) -> Self {
        RepositoryError::ExpressionEvaluation(err.to_string())
    }
}
