//! Runtime type system

pub mod value;

pub use value::Value;
