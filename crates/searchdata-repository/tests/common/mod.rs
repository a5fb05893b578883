//! Shared test helpers

#![allow(dead_code)]

use async_trait::async_trait;
use searchdata_repository::{
    RepositoryError, RepositoryResult, SearchHit, SearchHits, SearchOperations, SearchRequest,
};
use std::sync::{Arc, Mutex};

/// Which backend call a request went to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Search,
    Count,
    Delete,
}

/// In-memory backend that records every request and answers with canned results
#[derive(Default)]
pub struct RecordingOperations {
    requests: Mutex<Vec<(Call, SearchRequest)>>,
    count: u64,
    fail_with: Option<String>,
}

impl RecordingOperations {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Backend whose count and delete calls report `count` documents
    pub fn with_count(count: u64) -> Arc<Self> {
        Arc::new(Self {
            count,
            ..Self::default()
        })
    }

    /// Backend that fails every call
    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        })
    }

    pub fn requests(&self) -> Vec<(Call, SearchRequest)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> (Call, SearchRequest) {
        self.requests().pop().expect("no request recorded")
    }

    fn record(&self, call: Call, request: &SearchRequest) -> RepositoryResult<()> {
        self.requests.lock().unwrap().push((call, request.clone()));
        match &self.fail_with {
            Some(message) => Err(RepositoryError::Operations(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SearchOperations for RecordingOperations {
    async fn search(&self, request: &SearchRequest) -> RepositoryResult<SearchHits> {
        self.record(Call::Search, request)?;
        Ok(SearchHits {
            total: 1,
            hits: vec![SearchHit {
                id: "1".to_string(),
                score: Some(1.0),
                source: serde_json::json!({ "index": request.index }),
            }],
        })
    }

    async fn count(&self, request: &SearchRequest) -> RepositoryResult<u64> {
        self.record(Call::Count, request)?;
        Ok(self.count)
    }

    async fn delete(&self, request: &SearchRequest) -> RepositoryResult<u64> {
        self.record(Call::Delete, request)?;
        Ok(self.count)
    }
}
