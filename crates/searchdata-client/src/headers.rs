//! Header helpers and the callback types stored in a configuration

use crate::error::{ClientError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;

/// Produces extra headers for each outgoing request; called by the transport, not the builder
pub type HeadersSupplier = Arc<dyn Fn() -> HeaderMap + Send + Sync>;

/// Customizes the HTTP client before it is built; run in registration order
pub type ClientConfigurer =
    Arc<dyn Fn(reqwest::ClientBuilder) -> reqwest::ClientBuilder + Send + Sync>;

/// `Authorization` value for HTTP basic authentication
pub fn basic_auth_value(username: &str, password: &str) -> Result<HeaderValue> {
    let encoded = STANDARD.encode(format!("{}:{}", username, password));
    let mut value = HeaderValue::from_str(&format!("Basic {}", encoded)).map_err(|e| {
        ClientError::InvalidHeader {
            name: "authorization".to_string(),
            reason: e.to_string(),
        }
    })?;
    value.set_sensitive(true);
    Ok(value)
}

/// Build a header map from name/value text pairs
pub fn header_map_from_pairs<I, K, V>(pairs: I) -> Result<HeaderMap>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        let name_ref = name.as_ref();
        let header_name =
            HeaderName::from_bytes(name_ref.as_bytes()).map_err(|e| ClientError::InvalidHeader {
                name: name_ref.to_string(),
                reason: e.to_string(),
            })?;
        let header_value =
            HeaderValue::from_str(value.as_ref()).map_err(|e| ClientError::InvalidHeader {
                name: name_ref.to_string(),
                reason: e.to_string(),
            })?;
        headers.append(header_name, header_value);
    }
    Ok(headers)
}

/// Overlay `overrides` on `base`; every key present in `overrides` replaces all base values
pub fn merge_headers(base: &HeaderMap, overrides: HeaderMap) -> HeaderMap {
    let mut merged = base.clone();
    let mut current: Option<HeaderName> = None;
    for (name, value) in overrides {
        // HeaderMap iteration yields the name only for the first value of each key
        match name {
            Some(name) => {
                merged.insert(name.clone(), value);
                current = Some(name);
            }
            None => {
                if let Some(name) = &current {
                    merged.append(name.clone(), value);
                }
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;

    #[test]
    fn test_basic_auth_value() {
        let value = basic_auth_value("elastic", "changeme").unwrap();
        assert_eq!(value, "Basic ZWxhc3RpYzpjaGFuZ2VtZQ==");
        assert!(value.is_sensitive());
    }

    #[test]
    fn test_header_map_from_pairs_keeps_repeated_values() {
        let headers =
            header_map_from_pairs([("x-tag", "a"), ("x-tag", "b"), ("x-other", "c")]).unwrap();
        let tags: Vec<&str> = headers
            .get_all("x-tag")
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(tags, vec!["a", "b"]);
    }

    #[test]
    fn test_header_map_from_pairs_rejects_invalid_name() {
        let err = header_map_from_pairs([("bad header", "x")]).unwrap_err();
        assert!(matches!(err, ClientError::InvalidHeader { .. }));
    }

    #[test]
    fn test_merge_headers_overrides_per_key() {
        let base = header_map_from_pairs([("x-a", "1"), ("x-b", "2")]).unwrap();
        let mut overrides = HeaderMap::new();
        overrides.append("x-b", HeaderValue::from_static("3"));
        overrides.append("x-b", HeaderValue::from_static("4"));
        overrides.insert(AUTHORIZATION, HeaderValue::from_static("Bearer t"));

        let merged = merge_headers(&base, overrides);
        assert_eq!(merged.get("x-a").unwrap(), "1");
        let b: Vec<&str> = merged
            .get_all("x-b")
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(b, vec!["3", "4"]);
        assert_eq!(merged.get(AUTHORIZATION).unwrap(), "Bearer t");
    }
}
