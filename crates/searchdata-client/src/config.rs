//! Immutable client configuration
//!
//! Produced once by [`ClientConfigurationBuilder::build`] and then shared
//! read-only by every request issued through the client.

use crate::builder::{ClientConfigurationBuilder, NeedsEndpoint};
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::headers::{merge_headers, ClientConfigurer, HeadersSupplier};
use crate::tls::{HostnameVerifier, TlsContext};
use reqwest::header::HeaderMap;
use std::fmt;
use std::time::Duration;

/// Connect timeout used when none is configured
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Socket (read) timeout used when none is configured
pub const DEFAULT_SOCKET_TIMEOUT: Duration = Duration::from_secs(5);

/// Client configuration consumed by the transport layer
#[derive(Clone)]
pub struct ClientConfiguration {
    pub(crate) endpoints: Vec<Endpoint>,
    pub(crate) default_headers: HeaderMap,
    pub(crate) use_ssl: bool,
    pub(crate) tls_context: Option<TlsContext>,
    pub(crate) ca_fingerprint: Option<String>,
    pub(crate) hostname_verifier: Option<HostnameVerifier>,
    pub(crate) connect_timeout: Duration,
    pub(crate) socket_timeout: Duration,
    pub(crate) path_prefix: Option<String>,
    pub(crate) proxy: Option<String>,
    pub(crate) client_configurers: Vec<ClientConfigurer>,
    pub(crate) headers_supplier: HeadersSupplier,
}

impl ClientConfiguration {
    /// Start the staged builder
    pub fn builder() -> ClientConfigurationBuilder<NeedsEndpoint> {
        ClientConfigurationBuilder::new()
    }

    /// Configuration for a single node at `localhost:9200`
    pub fn localhost() -> Result<Self> {
        Self::create("localhost:9200")
    }

    /// Configuration for a single node given as `host:port`
    pub fn create(host_and_port: &str) -> Result<Self> {
        Self::builder().connected_to([host_and_port])?.build()
    }

    /// Configuration for a single, already parsed node
    pub fn create_for(endpoint: Endpoint) -> Result<Self> {
        Self::builder().connected_to_endpoints([endpoint])?.build()
    }

    /// Nodes in the order they were configured
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Headers sent with every request
    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    pub fn use_ssl(&self) -> bool {
        self.use_ssl
    }

    pub fn tls_context(&self) -> Option<&TlsContext> {
        self.tls_context.as_ref()
    }

    /// Expected fingerprint of the cluster's CA certificate
    pub fn ca_fingerprint(&self) -> Option<&str> {
        self.ca_fingerprint.as_deref()
    }

    pub fn hostname_verifier(&self) -> Option<&HostnameVerifier> {
        self.hostname_verifier.as_ref()
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn socket_timeout(&self) -> Duration {
        self.socket_timeout
    }

    pub fn path_prefix(&self) -> Option<&str> {
        self.path_prefix.as_deref()
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    pub fn client_configurers(&self) -> &[ClientConfigurer] {
        &self.client_configurers
    }

    pub fn headers_supplier(&self) -> &HeadersSupplier {
        &self.headers_supplier
    }

    /// Headers for one outgoing request: defaults overlaid with a fresh supplier call
    pub fn request_headers(&self) -> HeaderMap {
        merge_headers(&self.default_headers, (self.headers_supplier)())
    }

    /// Base URL of every endpoint, including the path prefix
    pub fn base_urls(&self) -> Vec<String> {
        let scheme = if self.use_ssl { "https" } else { "http" };
        let prefix = self
            .path_prefix
            .as_deref()
            .map(|p| p.trim_matches('/'))
            .filter(|p| !p.is_empty())
            .map(|p| format!("/{}", p))
            .unwrap_or_default();

        self.endpoints
            .iter()
            .map(|endpoint| format!("{}://{}{}", scheme, endpoint, prefix))
            .collect()
    }

    /// HTTP client builder with timeouts, proxy, default headers and trust roots applied,
    /// followed by the registered configurers in registration order
    pub fn http_client_builder(&self) -> Result<reqwest::ClientBuilder> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.socket_timeout)
            .default_headers(self.default_headers.clone());

        if let Some(proxy) = &self.proxy {
            let url = if proxy.contains("://") {
                proxy.clone()
            } else {
                format!("http://{}", proxy)
            };
            builder = builder.proxy(reqwest::Proxy::all(url)?);
        }

        if let Some(tls) = &self.tls_context {
            for pem in tls.root_certificates() {
                builder = builder.add_root_certificate(reqwest::Certificate::from_pem(pem)?);
            }
            if tls.accepts_invalid_certificates() {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        for configurer in &self.client_configurers {
            builder = configurer(builder);
        }

        Ok(builder)
    }
}

impl fmt::Debug for ClientConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // header values may carry credentials, only names are printed
        let header_names: Vec<&str> = self.default_headers.keys().map(|k| k.as_str()).collect();
        f.debug_struct("ClientConfiguration")
            .field("endpoints", &self.endpoints)
            .field("default_headers", &header_names)
            .field("use_ssl", &self.use_ssl)
            .field("tls_context", &self.tls_context)
            .field("ca_fingerprint", &self.ca_fingerprint.is_some())
            .field("hostname_verifier", &self.hostname_verifier.is_some())
            .field("connect_timeout", &self.connect_timeout)
            .field("socket_timeout", &self.socket_timeout)
            .field("path_prefix", &self.path_prefix)
            .field("proxy", &self.proxy)
            .field("client_configurers", &self.client_configurers.len())
            .finish()
    }
}
