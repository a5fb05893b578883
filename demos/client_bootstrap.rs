//! Client bootstrap walkthrough
//!
//! Builds client configurations three ways: the staged builder, a settings file
//! and the environment (`SEARCHDATA_ENDPOINTS=es1:9200,es2:9201`).
//!
//! Run with: `cargo run --example client_bootstrap`

use searchdata_demos::client::{
    ClientConfiguration, ClientError, ClientSettings, HeaderMap, HeaderValue, TlsContext,
};
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    searchdata_demos::init_tracing();

    // 1. Staged builder
    let mut defaults = HeaderMap::new();
    defaults.insert("x-application", HeaderValue::from_static("client-bootstrap"));

    let config = ClientConfiguration::builder()
        .connected_to(["es1:9200", "es2:9201"])?
        .using_ssl()
        .with_default_headers(&defaults)
        .with_connect_timeout(Duration::from_secs(5))
        .with_basic_auth("elastic", "changeme")
        .with_headers(|| {
            let mut headers = HeaderMap::new();
            headers.insert("x-request-start", HeaderValue::from(epoch_millis()));
            headers
        })
        .build()?;

    println!("Built: {:?}", config);
    println!("Base URLs: {:?}", config.base_urls());
    println!(
        "Headers for one request: {:?}",
        config.request_headers().keys().collect::<Vec<_>>()
    );

    let _client = config.http_client_builder()?.build()?;

    // 2. Conflicting TLS material is only reported by build()
    let conflicting = ClientConfiguration::builder()
        .connected_to(["localhost"])?
        .using_ssl_context(TlsContext::new())
        .using_ssl_fingerprint("AA:BB:CC")?
        .build();
    match conflicting {
        Err(ClientError::ConflictingConfiguration(reason)) => println!("Rejected: {}", reason),
        other => println!("Unexpected: {:?}", other.map(|c| c.endpoints().to_vec())),
    }

    // 3. Settings from config/searchdata.* and SEARCHDATA_* variables
    match ClientSettings::load().and_then(ClientSettings::into_configuration) {
        Ok(config) => println!("From settings: {:?}", config.base_urls()),
        Err(e) => println!("No usable settings ({}), falling back to localhost", e),
    }
    let local = ClientConfiguration::localhost()?;
    println!("Localhost: {:?}", local.base_urls());

    Ok(())
}

fn epoch_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
