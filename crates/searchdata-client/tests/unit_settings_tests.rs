//! Settings files turned into client configurations

use searchdata_client::{ClientError, ClientSettings};
use std::io::Write;
use std::time::Duration;

fn settings_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_yaml_settings_to_configuration() {
    let file = settings_file(
        ".yaml",
        r#"
endpoints:
  - es1:9200
  - "[::1]:9201"
ssl: true
username: elastic
password: changeme
path_prefix: search
connect_timeout_ms: 2500
headers:
  x-tenant: acme
"#,
    );

    let settings = ClientSettings::from_file(file.path()).unwrap();
    assert_eq!(settings.endpoints, vec!["es1:9200", "[::1]:9201"]);
    assert_eq!(settings.socket_timeout_ms, 5_000);

    let config = settings.into_configuration().unwrap();
    assert!(config.use_ssl());
    assert_eq!(config.connect_timeout(), Duration::from_millis(2500));
    assert_eq!(config.socket_timeout(), Duration::from_secs(5));
    assert_eq!(config.path_prefix(), Some("search"));
    assert_eq!(config.default_headers().get("x-tenant").unwrap(), "acme");
    assert_eq!(
        config.default_headers().get("authorization").unwrap(),
        "Basic ZWxhc3RpYzpjaGFuZ2VtZQ=="
    );
    assert_eq!(
        config.base_urls(),
        vec!["https://es1:9200/search", "https://[::1]:9201/search"]
    );
}

#[test]
fn test_json_settings_with_fingerprint() {
    let file = settings_file(
        ".json",
        &serde_json::json!({
            "endpoints": ["localhost"],
            "ca_fingerprint": "AA:BB:CC",
            "proxy": "proxy.internal:3128"
        })
        .to_string(),
    );

    let config = ClientSettings::from_file(file.path())
        .unwrap()
        .into_configuration()
        .unwrap();

    assert!(config.use_ssl());
    assert_eq!(config.ca_fingerprint(), Some("AA:BB:CC"));
    assert_eq!(config.proxy(), Some("proxy.internal:3128"));
}

#[test]
fn test_certificate_and_fingerprint_conflict() {
    let certificate = settings_file(".pem", "-----BEGIN CERTIFICATE-----\n");
    let file = settings_file(
        ".yaml",
        &format!(
            "endpoints: [localhost]\nca_certificate: {}\nca_fingerprint: AA:BB\n",
            certificate.path().display()
        ),
    );

    let err = ClientSettings::from_file(file.path())
        .unwrap()
        .into_configuration()
        .unwrap_err();
    assert!(matches!(err, ClientError::ConflictingConfiguration(_)));
}

#[test]
fn test_missing_endpoints_is_settings_error() {
    let file = settings_file(".yaml", "ssl: true\n");
    let err = ClientSettings::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ClientError::Settings(_)));
}

#[test]
fn test_invalid_header_name() {
    let file = settings_file(
        ".yaml",
        "endpoints: [localhost]\nheaders:\n  \"bad header\": x\n",
    );
    let err = ClientSettings::from_file(file.path())
        .unwrap()
        .into_configuration()
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidHeader { .. }));
}
