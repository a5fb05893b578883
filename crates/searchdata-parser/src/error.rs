//! Parser error types

use thiserror::Error;

/// Parser error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Method name cannot be read as a derived query
    #[error("Invalid query method name '{method}': {message}")]
    InvalidMethodName { method: String, message: String },

    /// Invalid value expression syntax
    #[error("Invalid expression syntax: {0}")]
    InvalidExpression(String),

    /// `#{` without a matching `}`
    #[error("Unterminated expression starting at offset {offset}")]
    UnterminatedExpression { offset: usize },

    /// Placeholder index that does not fit in usize
    #[error("Invalid placeholder: {0}")]
    InvalidPlaceholder(String),
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
