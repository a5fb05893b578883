//! Resolved repository queries
//!
//! Each repository method is backed by exactly one [`RepositoryQuery`], created
//! once at registration and executed for every invocation. Wrappers hold only
//! immutable data plus a handle to the [`SearchOperations`] backend, so a single
//! instance can serve concurrent invocations.

use crate::accessor::{Argument, ParametersParameterAccessor};
use crate::error::{RepositoryError, RepositoryResult};
use crate::method::{QueryMethod, RepositoryMetadata};
use crate::operations::{SearchHits, SearchOperations, SearchQuery, SearchRequest};
use crate::processor::QueryStringProcessor;
use searchdata_parser::{PartTree, QueryTemplate};
use std::fmt;
use std::sync::Arc;

/// Result of executing a repository query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Hits(SearchHits),
    Count(u64),
    Exists(bool),
    Deleted(u64),
}

/// Request skeleton shared by all wrappers: index, paging, sort and limit
fn base_request(accessor: &ParametersParameterAccessor<'_>, query: SearchQuery) -> SearchRequest {
    let method = accessor.method();
    let mut request = SearchRequest::new(method.index_name(), query);
    request.pageable = accessor.pageable().cloned();
    request.sort = accessor.sort().cloned();
    request.max_results = accessor.limit().and_then(|limit| limit.max());
    request
}

/// Query backed by query text, either from the named queries or from an annotation
#[derive(Clone)]
pub struct StringQuery {
    method: QueryMethod,
    template: QueryTemplate,
    processor: Arc<QueryStringProcessor>,
    operations: Arc<dyn SearchOperations>,
}

impl StringQuery {
    pub fn new(
        method: QueryMethod,
        query: &str,
        processor: Arc<QueryStringProcessor>,
        operations: Arc<dyn SearchOperations>,
    ) -> RepositoryResult<Self> {
        let template = QueryTemplate::parse(query).map_err(|e| {
            RepositoryError::InvalidMapping(format!(
                "Method '{}' has an invalid query: {}",
                method.name(),
                e
            ))
        })?;
        Ok(Self {
            method,
            template,
            processor,
            operations,
        })
    }

    pub fn query_method(&self) -> &QueryMethod {
        &self.method
    }

    pub fn template(&self) -> &QueryTemplate {
        &self.template
    }

    pub fn is_count_query(&self) -> bool {
        self.method.has_count_query_annotation()
    }

    /// Query text with this invocation's arguments spliced in
    pub fn render(&self, arguments: &[Argument]) -> RepositoryResult<String> {
        let accessor = ParametersParameterAccessor::new(&self.method, arguments)?;
        self.processor.render(&self.template, &accessor)
    }

    async fn execute(&self, arguments: &[Argument]) -> RepositoryResult<QueryOutcome> {
        let accessor = ParametersParameterAccessor::new(&self.method, arguments)?;
        let rendered = self.processor.render(&self.template, &accessor)?;
        let request = base_request(&accessor, SearchQuery::String(rendered));

        if self.is_count_query() {
            Ok(QueryOutcome::Count(self.operations.count(&request).await?))
        } else {
            Ok(QueryOutcome::Hits(self.operations.search(&request).await?))
        }
    }
}

/// Query running a stored search template
#[derive(Clone)]
pub struct SearchTemplateQuery {
    method: QueryMethod,
    template_id: String,
    operations: Arc<dyn SearchOperations>,
}

impl SearchTemplateQuery {
    pub fn new(
        method: QueryMethod,
        template_id: impl Into<String>,
        operations: Arc<dyn SearchOperations>,
    ) -> Self {
        Self {
            method,
            template_id: template_id.into(),
            operations,
        }
    }

    pub fn query_method(&self) -> &QueryMethod {
        &self.method
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    async fn execute(&self, arguments: &[Argument]) -> RepositoryResult<QueryOutcome> {
        let accessor = ParametersParameterAccessor::new(&self.method, arguments)?;
        let query = SearchQuery::SearchTemplate {
            id: self.template_id.clone(),
            params: accessor.parameter_map(),
        };
        let request = base_request(&accessor, query);
        Ok(QueryOutcome::Hits(self.operations.search(&request).await?))
    }
}

/// Query derived from the method name
#[derive(Clone)]
pub struct PartTreeQuery {
    method: QueryMethod,
    tree: PartTree,
    operations: Arc<dyn SearchOperations>,
}

impl PartTreeQuery {
    /// Parse the method name and check it against the signature and the domain type
    pub fn new(
        method: QueryMethod,
        metadata: &RepositoryMetadata,
        operations: Arc<dyn SearchOperations>,
    ) -> RepositoryResult<Self> {
        let tree = PartTree::parse(method.name())?;

        if let Some(part) = tree.parts().find(|part| !metadata.has_property(part.property())) {
            return Err(RepositoryError::InvalidMapping(format!(
                "No property '{}' found on type '{}' for method '{}'",
                part.property(),
                metadata.domain_type(),
                method.name()
            )));
        }
        if let Some(order) = tree.orders().iter().find(|o| !metadata.has_property(&o.property)) {
            return Err(RepositoryError::InvalidMapping(format!(
                "No property '{}' found on type '{}' for ordering in method '{}'",
                order.property,
                metadata.domain_type(),
                method.name()
            )));
        }

        let expected = tree.number_of_arguments();
        let declared = method.bindable_parameter_count();
        if expected != declared {
            return Err(RepositoryError::InvalidMapping(format!(
                "Method '{}' expects {} bindable argument(s) but declares {}",
                method.name(),
                expected,
                declared
            )));
        }

        Ok(Self {
            method,
            tree,
            operations,
        })
    }

    pub fn query_method(&self) -> &QueryMethod {
        &self.method
    }

    pub fn tree(&self) -> &PartTree {
        &self.tree
    }

    async fn execute(&self, arguments: &[Argument]) -> RepositoryResult<QueryOutcome> {
        let accessor = ParametersParameterAccessor::new(&self.method, arguments)?;
        let query = SearchQuery::Criteria {
            tree: self.tree.clone(),
            values: accessor.bindable_values().cloned().collect(),
        };
        let mut request = base_request(&accessor, query);
        request.max_results = match (self.tree.max_results(), request.max_results) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        if self.tree.is_delete() {
            Ok(QueryOutcome::Deleted(self.operations.delete(&request).await?))
        } else if self.tree.is_count_projection() {
            Ok(QueryOutcome::Count(self.operations.count(&request).await?))
        } else if self.tree.is_exists_projection() {
            Ok(QueryOutcome::Exists(self.operations.count(&request).await? > 0))
        } else {
            Ok(QueryOutcome::Hits(self.operations.search(&request).await?))
        }
    }
}

/// Query backing one repository method
#[derive(Clone)]
pub enum RepositoryQuery {
    /// Text found in the named queries
    Named(StringQuery),
    /// Text from the method's query annotation
    Annotated(StringQuery),
    /// Stored search template
    SearchTemplate(SearchTemplateQuery),
    /// Derived from the method name
    PartTree(PartTreeQuery),
}

impl RepositoryQuery {
    pub fn query_method(&self) -> &QueryMethod {
        match self {
            RepositoryQuery::Named(q) | RepositoryQuery::Annotated(q) => q.query_method(),
            RepositoryQuery::SearchTemplate(q) => q.query_method(),
            RepositoryQuery::PartTree(q) => q.query_method(),
        }
    }

    pub fn is_count_query(&self) -> bool {
        match self {
            RepositoryQuery::Named(q) | RepositoryQuery::Annotated(q) => q.is_count_query(),
            RepositoryQuery::SearchTemplate(_) => false,
            RepositoryQuery::PartTree(q) => q.tree.is_count_projection(),
        }
    }

    pub fn is_delete_query(&self) -> bool {
        match self {
            RepositoryQuery::PartTree(q) => q.tree.is_delete(),
            _ => false,
        }
    }

    pub fn is_exists_query(&self) -> bool {
        match self {
            RepositoryQuery::PartTree(q) => q.tree.is_exists_projection(),
            _ => false,
        }
    }

    /// Result size bounded by the method name (`findFirst...`, `findTop10...`)
    pub fn is_limiting(&self) -> bool {
        match self {
            RepositoryQuery::PartTree(q) => q.tree.is_limiting(),
            _ => false,
        }
    }

    /// Short name of the strategy backing the method
    pub fn kind(&self) -> &'static str {
        match self {
            RepositoryQuery::Named(_) => "named",
            RepositoryQuery::Annotated(_) => "annotated",
            RepositoryQuery::SearchTemplate(_) => "search-template",
            RepositoryQuery::PartTree(_) => "part-tree",
        }
    }

    /// Run the query with one invocation's arguments
    pub async fn execute(&self, arguments: &[Argument]) -> RepositoryResult<QueryOutcome> {
        match self {
            RepositoryQuery::Named(q) | RepositoryQuery::Annotated(q) => q.execute(arguments).await,
            RepositoryQuery::SearchTemplate(q) => q.execute(arguments).await,
            RepositoryQuery::PartTree(q) => q.execute(arguments).await,
        }
    }
}

impl fmt::Debug for RepositoryQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryQuery")
            .field("kind", &self.kind())
            .field("method", &self.query_method().name())
            .finish()
    }
}
