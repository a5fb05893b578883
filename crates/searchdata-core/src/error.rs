//! Error types for searchdata core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("Index out of bounds: {index} (length {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, CoreError>;
