//! Repository factory
//!
//! Resolves every method of a repository once, up front, and hands back a
//! [`Repository`] that dispatches invocations to the resolved queries.

use crate::accessor::Argument;
use crate::conversion::ConversionService;
use crate::error::{RepositoryError, RepositoryResult};
use crate::expression::ValueExpressionEvaluator;
use crate::method::RepositoryMetadata;
use crate::named::{NamedQueries, PropertiesNamedQueries};
use crate::operations::SearchOperations;
use crate::processor::QueryStringProcessor;
use crate::query::{QueryOutcome, RepositoryQuery};
use crate::strategy::QueryLookupStrategy;
use std::collections::HashMap;
use std::sync::Arc;

/// Builds repositories on top of one [`SearchOperations`] backend
///
/// # Example
///
/// ```rust,ignore
/// let factory = RepositoryFactory::new(operations)
///     .with_named_queries(PropertiesNamedQueries::from_file("named-queries.yaml").await?);
///
/// let people = factory.get_repository(&metadata)?;
/// let outcome = people.invoke("findByLastName", &[Argument::value("Lovelace")]).await?;
/// ```
pub struct RepositoryFactory {
    operations: Arc<dyn SearchOperations>,
    named_queries: Arc<dyn NamedQueries>,
    processor: QueryStringProcessor,
}

impl RepositoryFactory {
    /// Factory with no named queries and the default conversion and expression handling
    pub fn new(operations: Arc<dyn SearchOperations>) -> Self {
        Self {
            operations,
            named_queries: Arc::new(PropertiesNamedQueries::new()),
            processor: QueryStringProcessor::default(),
        }
    }

    pub fn with_named_queries(mut self, named_queries: impl NamedQueries + 'static) -> Self {
        self.named_queries = Arc::new(named_queries);
        self
    }

    /// Replace how bound values become query text
    pub fn with_conversion_service(mut self, conversion: Arc<dyn ConversionService>) -> Self {
        self.processor = QueryStringProcessor::new(conversion, self.evaluator());
        self
    }

    /// Replace how `#{...}` expressions are evaluated
    pub fn with_expression_evaluator(mut self, evaluator: Arc<dyn ValueExpressionEvaluator>) -> Self {
        self.processor = QueryStringProcessor::new(self.conversion(), evaluator);
        self
    }

    fn conversion(&self) -> Arc<dyn ConversionService> {
        self.processor.conversion()
    }

    fn evaluator(&self) -> Arc<dyn ValueExpressionEvaluator> {
        self.processor.evaluator()
    }

    /// Resolve every method of `metadata`
    pub fn get_repository(&self, metadata: &RepositoryMetadata) -> RepositoryResult<Repository> {
        if metadata.is_query_dsl_executor() {
            return Err(RepositoryError::UnsupportedRepository(
                "QueryDsl Support has not been implemented yet.".to_string(),
            ));
        }

        let strategy = QueryLookupStrategy::new(
            self.operations.clone(),
            Arc::new(self.processor.clone()),
        );

        let mut queries = HashMap::new();
        for signature in metadata.methods() {
            let query = strategy.resolve_query(signature, metadata, self.named_queries.as_ref())?;
            if queries
                .insert(signature.name().to_string(), Arc::new(query))
                .is_some()
            {
                return Err(RepositoryError::InvalidMapping(format!(
                    "Method '{}' declared more than once on {}",
                    signature.name(),
                    metadata.repository_name()
                )));
            }
        }

        tracing::info!(
            "Repository {} ready with {} query method(s) on index '{}'",
            metadata.repository_name(),
            queries.len(),
            metadata.index_name()
        );

        Ok(Repository {
            name: metadata.repository_name().to_string(),
            index_name: metadata.index_name().to_string(),
            queries,
        })
    }
}

/// A repository whose methods have all been resolved
#[derive(Debug, Clone)]
pub struct Repository {
    name: String,
    index_name: String,
    queries: HashMap<String, Arc<RepositoryQuery>>,
}

impl Repository {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// The query backing `method`
    pub fn query(&self, method: &str) -> Option<&RepositoryQuery> {
        self.queries.get(method).map(Arc::as_ref)
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.queries.keys().map(String::as_str)
    }

    /// Invoke `method` with the given arguments
    pub async fn invoke(&self, method: &str, arguments: &[Argument]) -> RepositoryResult<QueryOutcome> {
        let query = self.query(method).ok_or_else(|| {
            RepositoryError::InvalidArgument(format!(
                "Repository {} has no query method '{}'",
                self.name, method
            ))
        })?;
        query.execute(arguments).await
    }
}
