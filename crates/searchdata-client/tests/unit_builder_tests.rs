//! Staged builder behavior through the public API

use searchdata_client::{
    ClientConfiguration, ClientError, Endpoint, HeaderMap, HeaderValue, TlsContext,
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_PORT, DEFAULT_SOCKET_TIMEOUT,
};
use std::net::SocketAddr;
use std::time::Duration;

fn endpoint_strings(config: &ClientConfiguration) -> Vec<String> {
    config.endpoints().iter().map(|e| e.to_string()).collect()
}

#[test]
fn test_endpoint_order_is_preserved() {
    let hosts = ["es3:9203", "es1:9201", "[::1]:9202", "es2"];
    let config = ClientConfiguration::builder()
        .connected_to(hosts)
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(
        endpoint_strings(&config),
        vec!["es3:9203", "es1:9201", "[::1]:9202", "es2:9200"]
    );
}

#[test]
fn test_malformed_endpoint_fails_fast() {
    let result = ClientConfiguration::builder().connected_to(["es1:9200", "es2:port"]);
    match result {
        Err(ClientError::MalformedEndpoint { input, .. }) => assert_eq!(input, "es2:port"),
        other => panic!("expected malformed endpoint, got {:?}", other.err()),
    }
}

#[test]
fn test_connected_to_socket_addresses() {
    let addr: SocketAddr = "10.0.0.7:9400".parse().unwrap();
    let config = ClientConfiguration::builder()
        .connected_to_endpoints([addr])
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.endpoints()[0], Endpoint::new("10.0.0.7", 9400).unwrap());
}

#[test]
fn test_defaults() {
    let config = ClientConfiguration::builder()
        .connected_to(["localhost"])
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.endpoints()[0].port(), DEFAULT_PORT);
    assert_eq!(config.connect_timeout(), DEFAULT_CONNECT_TIMEOUT);
    assert_eq!(config.socket_timeout(), DEFAULT_SOCKET_TIMEOUT);
    assert!(!config.use_ssl());
    assert!(config.proxy().is_none());
    assert!(config.path_prefix().is_none());
    assert!(config.client_configurers().is_empty());
    assert!((config.headers_supplier())().is_empty());
}

#[test]
fn test_conflict_only_when_both_materials_present() {
    let cases: [(bool, bool); 4] = [(false, false), (true, false), (false, true), (true, true)];

    for (with_context, with_fingerprint) in cases {
        let mut builder = ClientConfiguration::builder()
            .connected_to(["localhost"])
            .unwrap()
            .using_ssl();
        if with_context {
            builder = builder.using_ssl_context(TlsContext::new());
        }
        if with_fingerprint {
            builder = builder.using_ssl_fingerprint("AA:BB:CC").unwrap();
        }

        let result = builder.build();
        if with_context && with_fingerprint {
            assert!(matches!(
                result,
                Err(ClientError::ConflictingConfiguration(_))
            ));
        } else {
            assert!(result.is_ok(), "context={} fingerprint={}", with_context, with_fingerprint);
        }
    }
}

#[test]
fn test_empty_fingerprint_rejected() {
    let result = ClientConfiguration::builder()
        .connected_to(["localhost"])
        .unwrap()
        .using_ssl_fingerprint("  ");
    assert!(matches!(result, Err(ClientError::InvalidArgument(_))));
}

#[test]
fn test_basic_auth_encoding() {
    let pairs = [
        ("elastic", "changeme", "Basic ZWxhc3RpYzpjaGFuZ2VtZQ=="),
        ("user", "", "Basic dXNlcjo="),
        ("a", "b:c", "Basic YTpiOmM="),
    ];

    for (username, password, expected) in pairs {
        let config = ClientConfiguration::builder()
            .connected_to(["localhost"])
            .unwrap()
            .using_ssl()
            .with_basic_auth(username, password)
            .build()
            .unwrap();
        assert_eq!(config.default_headers().get("authorization").unwrap(), expected);
    }
}

#[test]
fn test_basic_auth_replaces_explicit_authorization_default() {
    let mut headers = HeaderMap::new();
    headers.insert("authorization", HeaderValue::from_static("Bearer token"));

    let config = ClientConfiguration::builder()
        .connected_to(["localhost"])
        .unwrap()
        .with_default_headers(&headers)
        .with_basic_auth("elastic", "changeme")
        .build()
        .unwrap();

    let values: Vec<&HeaderValue> = config.default_headers().get_all("authorization").iter().collect();
    assert_eq!(values, vec!["Basic ZWxhc3RpYzpjaGFuZ2VtZQ=="]);
}

#[test]
fn test_supplier_overrides_defaults_per_key() {
    let mut defaults = HeaderMap::new();
    defaults.insert("x-tenant", HeaderValue::from_static("default"));
    defaults.insert("x-static", HeaderValue::from_static("kept"));

    let config = ClientConfiguration::builder()
        .connected_to(["localhost"])
        .unwrap()
        .with_default_headers(&defaults)
        .with_headers(|| {
            let mut headers = HeaderMap::new();
            headers.insert("x-tenant", HeaderValue::from_static("dynamic"));
            headers
        })
        .build()
        .unwrap();

    let headers = config.request_headers();
    assert_eq!(headers.get("x-tenant").unwrap(), "dynamic");
    assert_eq!(headers.get("x-static").unwrap(), "kept");
    // the stored defaults are untouched
    assert_eq!(config.default_headers().get("x-tenant").unwrap(), "default");
}

#[test]
fn test_configuration_shared_across_threads() {
    let config = std::sync::Arc::new(
        ClientConfiguration::builder()
            .connected_to(["es1", "es2"])
            .unwrap()
            .with_socket_timeout(Duration::from_secs(30))
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let config = std::sync::Arc::clone(&config);
            std::thread::spawn(move || (config.base_urls(), config.socket_timeout()))
        })
        .collect();

    for handle in handles {
        let (urls, timeout) = handle.join().unwrap();
        assert_eq!(urls, vec!["http://es1:9200", "http://es2:9200"]);
        assert_eq!(timeout, Duration::from_secs(30));
    }
}
