//! searchdata core - value types shared across the workspace
//!
//! This crate provides the fundamental types used by the client and repository crates:
//! - `Value`, the runtime representation of repository method arguments and
//!   search-template parameters
//! - Error types

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use types::Value;
