//! Query resolution strategy
//!
//! Decides which query backs a repository method. The lookup order is fixed
//! and the first match wins:
//!
//! 1. a named query registered under the method's named-query name
//! 2. an inline query annotation
//! 3. a search template annotation
//! 4. a query derived from the method name

use crate::error::{RepositoryError, RepositoryResult};
use crate::method::{MethodSignature, QueryMethod, RepositoryMetadata};
use crate::named::NamedQueries;
use crate::operations::SearchOperations;
use crate::processor::QueryStringProcessor;
use crate::query::{PartTreeQuery, RepositoryQuery, SearchTemplateQuery, StringQuery};
use std::sync::Arc;

/// Resolves repository methods into [`RepositoryQuery`] instances
#[derive(Clone)]
pub struct QueryLookupStrategy {
    operations: Arc<dyn SearchOperations>,
    processor: Arc<QueryStringProcessor>,
}

impl QueryLookupStrategy {
    pub fn new(operations: Arc<dyn SearchOperations>, processor: Arc<QueryStringProcessor>) -> Self {
        Self {
            operations,
            processor,
        }
    }

    /// Resolve one method of `metadata`
    pub fn resolve_query(
        &self,
        signature: &MethodSignature,
        metadata: &RepositoryMetadata,
        named_queries: &dyn NamedQueries,
    ) -> RepositoryResult<RepositoryQuery> {
        let method = QueryMethod::new(signature.clone(), metadata)?;
        let named_query_name = method.named_query_name();

        if let Some(query) = named_queries.get_query(&named_query_name) {
            tracing::debug!(
                "Method {}.{} resolved to named query '{}'",
                metadata.repository_name(),
                method.name(),
                named_query_name
            );
            return StringQuery::new(method, query, self.processor.clone(), self.operations.clone())
                .map(RepositoryQuery::Named);
        }

        if let Some(query) = method.annotated_query().map(str::to_string) {
            tracing::debug!(
                "Method {}.{} resolved to annotated query",
                metadata.repository_name(),
                method.name()
            );
            return StringQuery::new(method, &query, self.processor.clone(), self.operations.clone())
                .map(RepositoryQuery::Annotated);
        }

        // the count annotation only applies to query text
        if method.has_count_query_annotation() {
            return Err(RepositoryError::InvalidMapping(format!(
                "Method '{}' is marked as a count query but has no query text",
                method.name()
            )));
        }

        if let Some(id) = method.search_template_id().map(str::to_string) {
            tracing::debug!(
                "Method {}.{} resolved to search template '{}'",
                metadata.repository_name(),
                method.name(),
                id
            );
            return Ok(RepositoryQuery::SearchTemplate(SearchTemplateQuery::new(
                method,
                id,
                self.operations.clone(),
            )));
        }

        tracing::debug!(
            "Method {}.{} resolved to a query derived from its name",
            metadata.repository_name(),
            method.name()
        );
        PartTreeQuery::new(method, metadata, self.operations.clone()).map(RepositoryQuery::PartTree)
    }
}
