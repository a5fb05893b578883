//! Search operations consumed by the query wrappers
//!
//! The transport that actually talks to the cluster lives outside this crate;
//! it is reached through [`SearchOperations`].

use crate::error::RepositoryResult;
use crate::paging::{Pageable, Sort};
use async_trait::async_trait;
use searchdata_core::Value;
use searchdata_parser::PartTree;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Query handed to the backend
#[derive(Debug, Clone, PartialEq)]
pub enum SearchQuery {
    /// Rendered query text
    String(String),

    /// Stored template with its parameters
    SearchTemplate {
        id: String,
        params: BTreeMap<String, Value>,
    },

    /// Derived query: the parsed method name plus the values for its parts, in order
    Criteria { tree: PartTree, values: Vec<Value> },
}

/// One request against an index
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub index: String,
    pub query: SearchQuery,
    pub pageable: Option<Pageable>,
    pub sort: Option<Sort>,
    pub max_results: Option<usize>,
}

impl SearchRequest {
    pub fn new(index: impl Into<String>, query: SearchQuery) -> Self {
        Self {
            index: index.into(),
            query,
            pageable: None,
            sort: None,
            max_results: None,
        }
    }
}

/// One matching document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    #[serde(default)]
    pub score: Option<f64>,
    pub source: serde_json::Value,
}

/// Documents returned by a search
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchHits {
    pub total: u64,
    pub hits: Vec<SearchHit>,
}

/// Backend executing queries against the cluster
#[async_trait]
pub trait SearchOperations: Send + Sync {
    /// Fetch matching documents
    async fn search(&self, request: &SearchRequest) -> RepositoryResult<SearchHits>;

    /// Count matching documents
    async fn count(&self, request: &SearchRequest) -> RepositoryResult<u64>;

    /// Delete matching documents, returning how many were deleted
    async fn delete(&self, request: &SearchRequest) -> RepositoryResult<u64>;
}
