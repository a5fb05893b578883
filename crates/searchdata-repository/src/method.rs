//! Repository and query method metadata
//!
//! Repositories are described declaratively: a [`RepositoryMetadata`] lists the
//! domain type, target index and the [`MethodSignature`] of every query method,
//! including the annotation values attached to it. [`QueryMethod`] is the
//! validated, read-only view the resolution strategy works with.

use crate::error::{RepositoryError, RepositoryResult};
use std::collections::HashSet;

/// Kind of a declared method parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterType {
    /// Value bound into the query
    Value,
    /// Page request
    Pageable,
    /// Result ordering
    Sort,
    /// Result size cap
    Limit,
}

impl ParameterType {
    /// Special parameters shape the request instead of being bound into the query
    pub fn is_special(self) -> bool {
        !matches!(self, ParameterType::Value)
    }
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodParameter {
    name: Option<String>,
    kind: ParameterType,
}

impl MethodParameter {
    /// Named value parameter, addressable as `#name` in string queries
    pub fn value(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            kind: ParameterType::Value,
        }
    }

    /// Value parameter only reachable by position
    pub fn unnamed() -> Self {
        Self {
            name: None,
            kind: ParameterType::Value,
        }
    }

    pub fn pageable() -> Self {
        Self {
            name: None,
            kind: ParameterType::Pageable,
        }
    }

    pub fn sort() -> Self {
        Self {
            name: None,
            kind: ParameterType::Sort,
        }
    }

    pub fn limit() -> Self {
        Self {
            name: None,
            kind: ParameterType::Limit,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> ParameterType {
        self.kind
    }
}

/// Declared return shape of a query method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnKind {
    /// Single document (or none)
    Single,
    /// All matching documents
    #[default]
    Collection,
    /// One page of documents
    Page,
    /// Documents consumed as a stream
    Stream,
    /// Number of matching documents
    Count,
    /// Whether any document matches
    Boolean,
    /// Nothing (delete methods)
    Unit,
}

/// A repository method as declared, annotations included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    name: String,
    parameters: Vec<MethodParameter>,
    return_kind: ReturnKind,
    query: Option<String>,
    count_query: bool,
    search_template: Option<String>,
    named_query_name: Option<String>,
}

impl MethodSignature {
    /// Method without parameters or annotations
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_kind: ReturnKind::default(),
            query: None,
            count_query: false,
            search_template: None,
            named_query_name: None,
        }
    }

    pub fn with_parameter(mut self, parameter: MethodParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn returning(mut self, kind: ReturnKind) -> Self {
        self.return_kind = kind;
        self
    }

    /// Annotate the method with an inline query
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Mark the query text as a count query
    ///
    /// Only meaningful with an inline or named query; resolution rejects it otherwise.
    pub fn with_count_query(mut self) -> Self {
        self.count_query = true;
        self
    }

    /// Annotate the method with a stored search template id
    pub fn with_search_template(mut self, id: impl Into<String>) -> Self {
        self.search_template = Some(id.into());
        self
    }

    /// Look the method up in the named queries under this name instead of the default one
    pub fn with_named_query_name(mut self, name: impl Into<String>) -> Self {
        self.named_query_name = Some(name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[MethodParameter] {
        &self.parameters
    }
}

/// Declarative description of one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryMetadata {
    repository_name: String,
    domain_type: String,
    index_name: String,
    properties: Vec<String>,
    methods: Vec<MethodSignature>,
    query_dsl_executor: bool,
}

impl RepositoryMetadata {
    /// Repository for `domain_type` documents stored in `index_name`
    pub fn new(
        repository_name: impl Into<String>,
        domain_type: impl Into<String>,
        index_name: impl Into<String>,
    ) -> Self {
        Self {
            repository_name: repository_name.into(),
            domain_type: domain_type.into(),
            index_name: index_name.into(),
            properties: Vec::new(),
            methods: Vec::new(),
            query_dsl_executor: false,
        }
    }

    /// Declare the domain type's properties; derived queries are then checked against them
    pub fn with_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties = properties.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_method(mut self, method: MethodSignature) -> Self {
        self.methods.push(method);
        self
    }

    /// The repository also extends a query-DSL predicate executor
    pub fn with_query_dsl_executor(mut self) -> Self {
        self.query_dsl_executor = true;
        self
    }

    pub fn repository_name(&self) -> &str {
        &self.repository_name
    }

    pub fn domain_type(&self) -> &str {
        &self.domain_type
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    /// True when `property` resolves against a declared property, or nothing is declared
    ///
    /// Nested paths match on their root: `address.city`, `address_City` and the
    /// camel-case form `addressCity` all resolve against `address`.
    pub fn has_property(&self, property: &str) -> bool {
        if self.properties.is_empty() {
            return true;
        }
        let root = property.split(['.', '_']).next().unwrap_or(property);
        self.properties.iter().any(|declared| {
            declared == property
                || declared == root
                || property
                    .strip_prefix(declared.as_str())
                    .is_some_and(|rest| rest.starts_with(char::is_uppercase))
        })
    }

    pub fn methods(&self) -> &[MethodSignature] {
        &self.methods
    }

    pub fn is_query_dsl_executor(&self) -> bool {
        self.query_dsl_executor
    }
}

/// Validated, read-only view of a repository method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryMethod {
    signature: MethodSignature,
    domain_type: String,
    index_name: String,
    pageable_index: Option<usize>,
    sort_index: Option<usize>,
    limit_index: Option<usize>,
}

impl QueryMethod {
    /// Validate `signature` against repository conventions
    ///
    /// Missing annotations are fine; only structurally unusable signatures fail.
    pub fn new(signature: MethodSignature, metadata: &RepositoryMetadata) -> RepositoryResult<Self> {
        let method = signature.name.as_str();
        let mut pageable_index = None;
        let mut sort_index = None;
        let mut limit_index = None;
        let mut names = HashSet::new();

        for (index, parameter) in signature.parameters.iter().enumerate() {
            let slot = match parameter.kind {
                ParameterType::Value => None,
                ParameterType::Pageable => Some(&mut pageable_index),
                ParameterType::Sort => Some(&mut sort_index),
                ParameterType::Limit => Some(&mut limit_index),
            };
            if let Some(slot) = slot {
                if slot.replace(index).is_some() {
                    return Err(invalid(
                        method,
                        format!("more than one {:?} parameter", parameter.kind),
                    ));
                }
            }

            if let Some(name) = &parameter.name {
                if !names.insert(name.as_str()) {
                    return Err(invalid(method, format!("duplicate parameter name '{}'", name)));
                }
            }
        }

        // unnamed bindable parameters are exposed to search templates as `argN`
        let positional_collision = signature
            .parameters
            .iter()
            .filter(|p| !p.kind.is_special())
            .enumerate()
            .filter(|(_, p)| p.name.is_none())
            .map(|(index, _)| format!("arg{}", index))
            .find(|key| names.contains(key.as_str()));
        if let Some(key) = positional_collision {
            return Err(invalid(
                method,
                format!("parameter name '{}' collides with an unnamed parameter", key),
            ));
        }

        if pageable_index.is_some() && sort_index.is_some() {
            return Err(invalid(
                method,
                "cannot take both a pageable and a sort parameter; sort through the pageable",
            ));
        }
        if pageable_index.is_some() && limit_index.is_some() {
            return Err(invalid(
                method,
                "cannot take both a pageable and a limit parameter",
            ));
        }
        if signature.return_kind == ReturnKind::Page && pageable_index.is_none() {
            return Err(invalid(
                method,
                "page-returning methods need a pageable parameter",
            ));
        }
        if signature
            .search_template
            .as_deref()
            .is_some_and(|id| id.trim().is_empty())
        {
            return Err(invalid(method, "search template id must not be empty"));
        }

        Ok(Self {
            domain_type: metadata.domain_type.clone(),
            index_name: metadata.index_name.clone(),
            signature,
            pageable_index,
            sort_index,
            limit_index,
        })
    }

    pub fn name(&self) -> &str {
        &self.signature.name
    }

    pub fn domain_type(&self) -> &str {
        &self.domain_type
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Key used to look the method up in the named queries, `<DomainType>.<method>` by default
    pub fn named_query_name(&self) -> String {
        match &self.signature.named_query_name {
            Some(name) => name.clone(),
            None => format!("{}.{}", self.domain_type, self.signature.name),
        }
    }

    pub fn has_annotated_query(&self) -> bool {
        self.signature.query.as_deref().is_some_and(|q| !q.is_empty())
    }

    pub fn annotated_query(&self) -> Option<&str> {
        self.signature.query.as_deref().filter(|q| !q.is_empty())
    }

    pub fn has_search_template(&self) -> bool {
        self.signature.search_template.is_some()
    }

    pub fn search_template_id(&self) -> Option<&str> {
        self.signature.search_template.as_deref()
    }

    pub fn has_count_query_annotation(&self) -> bool {
        self.signature.count_query
    }

    pub fn return_kind(&self) -> ReturnKind {
        self.signature.return_kind
    }

    pub fn parameters(&self) -> &[MethodParameter] {
        &self.signature.parameters
    }

    /// Parameters bound into the query, in declaration order
    pub fn bindable_parameters(&self) -> impl Iterator<Item = &MethodParameter> {
        self.signature
            .parameters
            .iter()
            .filter(|p| !p.kind.is_special())
    }

    pub fn bindable_parameter_count(&self) -> usize {
        self.bindable_parameters().count()
    }

    pub fn pageable_index(&self) -> Option<usize> {
        self.pageable_index
    }

    pub fn sort_index(&self) -> Option<usize> {
        self.sort_index
    }

    pub fn limit_index(&self) -> Option<usize> {
        self.limit_index
    }

    pub fn is_page_query(&self) -> bool {
        self.signature.return_kind == ReturnKind::Page
    }

    pub fn is_stream_query(&self) -> bool {
        self.signature.return_kind == ReturnKind::Stream
    }

    pub fn is_collection_query(&self) -> bool {
        matches!(
            self.signature.return_kind,
            ReturnKind::Collection | ReturnKind::Page | ReturnKind::Stream
        )
    }
}

fn invalid(method: &str, reason: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::InvalidMapping(format!("Method '{}': {}", method, reason))
}
