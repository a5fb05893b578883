//! searchdata parser - grammars used when repository methods are registered
//!
//! This crate turns the declarative parts of a repository method into
//! structures the repository layer can execute:
//! - [`PartTree`]: the query encoded in a method name (`findFirstByLastNameOrderByAgeDesc`)
//! - [`QueryTemplate`]: a string query with `?0` placeholders and `#{...}` expressions
//! - [`ExpressionParser`]: the value expressions found inside `#{...}`

pub mod error;
pub mod expression_parser;
pub mod part_tree;
pub mod template_parser;

// Re-export main parser types
pub use error::{ParseError, Result};
pub use expression_parser::{ExpressionParser, PathSegment, ValueExpression};
pub use part_tree::{Direction, Order, OrPart, Part, PartKind, PartTree, QueryKind, Subject};
pub use template_parser::{QueryTemplate, Segment};
