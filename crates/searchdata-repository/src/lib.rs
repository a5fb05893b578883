//! Repository query resolution for searchdata
//!
//! Repositories are declared as [`RepositoryMetadata`]: a domain type, an index
//! and a list of [`MethodSignature`]s carrying their annotation values. At
//! registration every method is resolved once into a [`RepositoryQuery`]:
//!
//! - a named query from the [`NamedQueries`] registry,
//! - else the method's inline query annotation,
//! - else its search template annotation,
//! - else a query derived from the method name ([`PartTree`](searchdata_parser::PartTree)).
//!
//! String queries are rendered per invocation by the [`QueryStringProcessor`],
//! which splices converted argument values into `?N` and `#{...}` placeholders.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use searchdata_repository::{
//!     Argument, MethodParameter, MethodSignature, RepositoryFactory, RepositoryMetadata,
//! };
//!
//! let metadata = RepositoryMetadata::new("PersonRepository", "Person", "people")
//!     .with_method(
//!         MethodSignature::new("findByLastName")
//!             .with_parameter(MethodParameter::value("lastName")),
//!     );
//!
//! let repository = RepositoryFactory::new(operations).get_repository(&metadata)?;
//! let outcome = repository
//!     .invoke("findByLastName", &[Argument::value("Lovelace")])
//!     .await?;
//! ```

pub mod accessor;
pub mod conversion;
pub mod error;
pub mod expression;
pub mod factory;
pub mod method;
pub mod named;
pub mod operations;
pub mod paging;
pub mod processor;
pub mod query;
pub mod strategy;

// Re-export main types
pub use accessor::{Argument, ParametersParameterAccessor};
pub use conversion::{ConversionService, DefaultConversionService};
pub use error::{RepositoryError, RepositoryResult};
pub use expression::{DefaultValueExpressionEvaluator, ValueExpressionEvaluator};
pub use factory::{Repository, RepositoryFactory};
pub use method::{
    MethodParameter, MethodSignature, ParameterType, QueryMethod, RepositoryMetadata, ReturnKind,
};
pub use named::{NamedQueries, PropertiesNamedQueries};
pub use operations::{SearchHit, SearchHits, SearchOperations, SearchQuery, SearchRequest};
pub use paging::{Limit, Pageable, Sort};
pub use processor::QueryStringProcessor;
pub use query::{
    PartTreeQuery, QueryOutcome, RepositoryQuery, SearchTemplateQuery, StringQuery,
};
pub use strategy::QueryLookupStrategy;

// Re-export shared types used in signatures
pub use searchdata_core::Value;
pub use searchdata_parser::{Direction, PartTree};
