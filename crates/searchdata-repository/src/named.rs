//! Named query registries

use crate::error::RepositoryResult;
use std::collections::HashMap;
use std::path::Path;

/// Read-only registry of query texts keyed by logical name
pub trait NamedQueries: Send + Sync {
    fn has_query(&self, name: &str) -> bool;

    fn get_query(&self, name: &str) -> Option<&str>;
}

/// In-memory named queries, typically loaded from a YAML mapping file
///
/// ```yaml
/// Person.findByLastName: '{"match":{"lastName":"?0"}}'
/// Person.countAdults: '{"range":{"age":{"gte":18}}}'
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertiesNamedQueries {
    queries: HashMap<String, String>,
}

impl PropertiesNamedQueries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML mapping of name to query text
    pub fn from_yaml_str(content: &str) -> RepositoryResult<Self> {
        let queries: HashMap<String, String> = serde_yaml::from_str(content)?;
        Ok(Self { queries })
    }

    /// Load a YAML mapping file
    pub async fn from_file(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let queries = Self::from_yaml_str(&content)?;
        tracing::debug!(
            "Loaded {} named queries from {}",
            queries.len(),
            path.display()
        );
        Ok(queries)
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for PropertiesNamedQueries
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            queries: iter
                .into_iter()
                .map(|(name, query)| (name.into(), query.into()))
                .collect(),
        }
    }
}

impl NamedQueries for PropertiesNamedQueries {
    fn has_query(&self, name: &str) -> bool {
        self.queries.contains_key(name)
    }

    fn get_query(&self, name: &str) -> Option<&str> {
        self.queries.get(name).map(String::as_str)
    }
}
