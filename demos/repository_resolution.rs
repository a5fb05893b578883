//! Repository resolution walkthrough
//!
//! Declares a repository, resolves its methods against a named-query registry
//! and invokes them against an in-memory backend that prints what it receives.
//!
//! Run with: `cargo run --example repository_resolution`

use async_trait::async_trait;
use searchdata_demos::repository::{
    Argument, Direction, MethodParameter, MethodSignature, Pageable, PropertiesNamedQueries,
    RepositoryFactory, RepositoryMetadata, RepositoryResult, ReturnKind, SearchHit, SearchHits,
    SearchOperations, SearchQuery, SearchRequest, Sort,
};
use std::sync::Arc;

/// Backend that logs each request instead of calling a cluster
struct PrintingOperations;

impl PrintingOperations {
    fn describe(request: &SearchRequest) -> String {
        match &request.query {
            SearchQuery::String(text) => format!("string query {}", text),
            SearchQuery::SearchTemplate { id, params } => {
                format!("template '{}' with {}", id, serde_json::to_string(params).unwrap_or_default())
            }
            SearchQuery::Criteria { tree, values } => format!("derived query {} {:?}", tree, values),
        }
    }
}

#[async_trait]
impl SearchOperations for PrintingOperations {
    async fn search(&self, request: &SearchRequest) -> RepositoryResult<SearchHits> {
        println!("  search [{}] {}", request.index, Self::describe(request));
        Ok(SearchHits {
            total: 1,
            hits: vec![SearchHit {
                id: "ada".to_string(),
                score: Some(1.0),
                source: serde_json::json!({ "firstName": "Ada", "lastName": "Lovelace" }),
            }],
        })
    }

    async fn count(&self, request: &SearchRequest) -> RepositoryResult<u64> {
        println!("  count  [{}] {}", request.index, Self::describe(request));
        Ok(1)
    }

    async fn delete(&self, request: &SearchRequest) -> RepositoryResult<u64> {
        println!("  delete [{}] {}", request.index, Self::describe(request));
        Ok(0)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    searchdata_demos::init_tracing();

    let named_queries: PropertiesNamedQueries = [(
        "Person.findByFirstName",
        r#"{"match":{"firstName":{"query":"?0","fuzziness":"AUTO"}}}"#,
    )]
    .into_iter()
    .collect();

    let metadata = RepositoryMetadata::new("PersonRepository", "Person", "people")
        .with_properties(["firstName", "lastName", "age", "active"])
        .with_method(
            MethodSignature::new("findByFirstName")
                .with_parameter(MethodParameter::value("firstName"))
                .with_query(r#"{"term":{"firstName":"?0"}}"#),
        )
        .with_method(
            MethodSignature::new("findByName")
                .with_parameter(MethodParameter::value("name"))
                .with_parameter(MethodParameter::sort())
                .with_query(r##"{"multi_match":{"query":"#{#name}","fields":["firstName","lastName"]}}"##),
        )
        .with_method(
            MethodSignature::new("searchByAge")
                .with_parameter(MethodParameter::value("age"))
                .with_search_template("people-by-age"),
        )
        .with_method(
            MethodSignature::new("findTop3ByLastNameAndActiveTrueOrderByAgeDesc")
                .with_parameter(MethodParameter::value("lastName")),
        )
        .with_method(
            MethodSignature::new("findByAgeBetween")
                .with_parameter(MethodParameter::value("from"))
                .with_parameter(MethodParameter::value("to"))
                .with_parameter(MethodParameter::pageable())
                .returning(ReturnKind::Page),
        )
        .with_method(
            MethodSignature::new("existsByLastName")
                .with_parameter(MethodParameter::value("lastName"))
                .returning(ReturnKind::Boolean),
        );

    let repository = RepositoryFactory::new(Arc::new(PrintingOperations))
        .with_named_queries(named_queries)
        .get_repository(&metadata)?;

    let mut names: Vec<&str> = repository.method_names().collect();
    names.sort();
    for name in names {
        if let Some(query) = repository.query(name) {
            println!("{} -> {}", name, query.kind());
        }
    }

    let invocations: Vec<(&str, Vec<Argument>)> = vec![
        ("findByFirstName", vec![Argument::value("Ada")]),
        (
            "findByName",
            vec![
                Argument::value("Lovelace"),
                Argument::from(Sort::by("age", Direction::Desc)),
            ],
        ),
        ("searchByAge", vec![Argument::value(36)]),
        ("findTop3ByLastNameAndActiveTrueOrderByAgeDesc", vec![Argument::value("Lovelace")]),
        (
            "findByAgeBetween",
            vec![Argument::value(30), Argument::value(40), Argument::from(Pageable::of(0, 20))],
        ),
        ("existsByLastName", vec![Argument::value("Lovelace")]),
    ];

    for (method, arguments) in invocations {
        println!("{}:", method);
        let outcome = repository.invoke(method, &arguments).await?;
        tracing::info!(method, "invocation finished");
        println!("  -> {:?}", outcome);
    }

    Ok(())
}
