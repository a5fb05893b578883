//! Staged builder for [`ClientConfiguration`]
//!
//! The stage is a type parameter, so options that are illegal at a given point
//! simply do not exist on the builder type:
//!
//! - [`NeedsEndpoint`]: only `connected_to*` is available.
//! - [`MaybeSecure`]: more endpoints, a proxy, the TLS decision, or any terminal option.
//! - [`Terminal`]: headers, timeouts, auth, path prefix, configurers and `build()`.
//!
//! # Example
//!
//! ```rust,ignore
//! use searchdata_client::ClientConfiguration;
//! use std::time::Duration;
//!
//! let config = ClientConfiguration::builder()
//!     .connected_to(["es1:9200", "es2:9201"])?
//!     .using_ssl()
//!     .with_connect_timeout(Duration::from_secs(5))
//!     .build()?;
//! ```
//!
//! `build()` consumes the builder; a finished builder cannot be reused.

use crate::config::{ClientConfiguration, DEFAULT_CONNECT_TIMEOUT, DEFAULT_SOCKET_TIMEOUT};
use crate::endpoint::Endpoint;
use crate::error::{ClientError, Result};
use crate::headers::{basic_auth_value, ClientConfigurer, HeadersSupplier};
use crate::tls::{HostnameVerifier, TlsContext};
use reqwest::header::{HeaderMap, AUTHORIZATION};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

mod sealed {
    pub trait Sealed {}
}

/// Marker for a builder stage
pub trait Stage: sealed::Sealed {}

/// Stages that may still add endpoints
pub trait AcceptsEndpoints: Stage {}

/// Stages that accept a TLS decision and the terminal options
pub trait AcceptsOptions: Stage {}

/// No endpoint configured yet
#[derive(Debug)]
pub struct NeedsEndpoint;

/// At least one endpoint configured, TLS not decided yet
#[derive(Debug)]
pub struct MaybeSecure;

/// TLS decided (or skipped by setting a terminal option)
#[derive(Debug)]
pub struct Terminal;

impl sealed::Sealed for NeedsEndpoint {}
impl sealed::Sealed for MaybeSecure {}
impl sealed::Sealed for Terminal {}
impl Stage for NeedsEndpoint {}
impl Stage for MaybeSecure {}
impl Stage for Terminal {}
impl AcceptsEndpoints for NeedsEndpoint {}
impl AcceptsEndpoints for MaybeSecure {}
impl AcceptsOptions for MaybeSecure {}
impl AcceptsOptions for Terminal {}

/// Accumulated options, shared by every stage
struct BuilderState {
    endpoints: Vec<Endpoint>,
    default_headers: HeaderMap,
    use_ssl: bool,
    tls_context: Option<TlsContext>,
    ca_fingerprint: Option<String>,
    hostname_verifier: Option<HostnameVerifier>,
    connect_timeout: Duration,
    socket_timeout: Duration,
    basic_auth: Option<(String, String)>,
    path_prefix: Option<String>,
    proxy: Option<String>,
    client_configurers: Vec<ClientConfigurer>,
    headers_supplier: HeadersSupplier,
}

impl Default for BuilderState {
    fn default() -> Self {
        Self {
            endpoints: Vec::new(),
            default_headers: HeaderMap::new(),
            use_ssl: false,
            tls_context: None,
            ca_fingerprint: None,
            hostname_verifier: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            socket_timeout: DEFAULT_SOCKET_TIMEOUT,
            basic_auth: None,
            path_prefix: None,
            proxy: None,
            client_configurers: Vec::new(),
            headers_supplier: Arc::new(HeaderMap::new),
        }
    }
}

/// Builder for [`ClientConfiguration`], parameterized by its current stage
///
/// Not meant to be shared between threads while incomplete.
pub struct ClientConfigurationBuilder<S: Stage = NeedsEndpoint> {
    state: BuilderState,
    _stage: PhantomData<S>,
}

impl ClientConfigurationBuilder<NeedsEndpoint> {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            state: BuilderState::default(),
            _stage: PhantomData,
        }
    }
}

impl Default for ClientConfigurationBuilder<NeedsEndpoint> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Stage> ClientConfigurationBuilder<S> {
    fn transition<T: Stage>(self) -> ClientConfigurationBuilder<T> {
        ClientConfigurationBuilder {
            state: self.state,
            _stage: PhantomData,
        }
    }
}

// ========== Endpoints ==========

impl<S: AcceptsEndpoints> ClientConfigurationBuilder<S> {
    /// Add nodes given as `host` / `host:port` text
    ///
    /// Appends to the endpoints already configured. Fails when `hosts` is empty
    /// or any entry is not a valid endpoint.
    pub fn connected_to<I>(mut self, hosts: I) -> Result<ClientConfigurationBuilder<MaybeSecure>>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let parsed = hosts
            .into_iter()
            .map(|host| Endpoint::parse(host.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        self.append_endpoints(parsed)?;
        Ok(self.transition())
    }

    /// Add already parsed nodes
    pub fn connected_to_endpoints<I, E>(
        mut self,
        endpoints: I,
    ) -> Result<ClientConfigurationBuilder<MaybeSecure>>
    where
        I: IntoIterator<Item = E>,
        E: Into<Endpoint>,
    {
        self.append_endpoints(endpoints.into_iter().map(Into::into).collect())?;
        Ok(self.transition())
    }

    fn append_endpoints(&mut self, endpoints: Vec<Endpoint>) -> Result<()> {
        if endpoints.is_empty() {
            return Err(ClientError::InvalidArgument(
                "At least one host is required".to_string(),
            ));
        }
        for endpoint in endpoints {
            if self.state.endpoints.contains(&endpoint) {
                tracing::debug!("Skipping duplicate endpoint {}", endpoint);
                continue;
            }
            self.state.endpoints.push(endpoint);
        }
        Ok(())
    }
}

// ========== Proxy (before the TLS decision only) ==========

impl ClientConfigurationBuilder<MaybeSecure> {
    /// Route every request through a proxy (`host:port` or a URL)
    pub fn with_proxy(mut self, address: impl Into<String>) -> Result<Self> {
        let address = address.into();
        if address.trim().is_empty() {
            return Err(ClientError::InvalidArgument(
                "proxy address must not be empty".to_string(),
            ));
        }
        self.state.proxy = Some(address);
        Ok(self)
    }
}

// ========== TLS decision ==========

impl<S: AcceptsOptions> ClientConfigurationBuilder<S> {
    /// Use TLS with the platform trust store
    pub fn using_ssl(self) -> ClientConfigurationBuilder<Terminal> {
        self.using_ssl_flag(true)
    }

    /// Explicitly enable or disable TLS
    pub fn using_ssl_flag(mut self, flag: bool) -> ClientConfigurationBuilder<Terminal> {
        self.state.use_ssl = flag;
        self.transition()
    }

    /// Use TLS with explicit trust material
    pub fn using_ssl_context(mut self, context: TlsContext) -> ClientConfigurationBuilder<Terminal> {
        self.state.use_ssl = true;
        self.state.tls_context = Some(context);
        self.transition()
    }

    /// Use TLS with explicit trust material and a custom hostname check
    pub fn using_ssl_context_and_verifier(
        mut self,
        context: TlsContext,
        verifier: HostnameVerifier,
    ) -> ClientConfigurationBuilder<Terminal> {
        self.state.use_ssl = true;
        self.state.tls_context = Some(context);
        self.state.hostname_verifier = Some(verifier);
        self.transition()
    }

    /// Use TLS and trust the cluster CA identified by its certificate fingerprint
    ///
    /// Cannot be combined with [`using_ssl_context`](Self::using_ssl_context);
    /// the conflict is reported by `build()`.
    pub fn using_ssl_fingerprint(
        mut self,
        fingerprint: impl Into<String>,
    ) -> Result<ClientConfigurationBuilder<Terminal>> {
        let fingerprint = fingerprint.into();
        if fingerprint.trim().is_empty() {
            return Err(ClientError::InvalidArgument(
                "CA fingerprint must not be empty".to_string(),
            ));
        }
        self.state.use_ssl = true;
        self.state.ca_fingerprint = Some(fingerprint);
        Ok(self.transition())
    }
}

// ========== Terminal options ==========

impl<S: AcceptsOptions> ClientConfigurationBuilder<S> {
    /// Replace the default headers with a copy of `headers`
    pub fn with_default_headers(mut self, headers: &HeaderMap) -> ClientConfigurationBuilder<Terminal> {
        self.state.default_headers = headers.clone();
        self.transition()
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> ClientConfigurationBuilder<Terminal> {
        self.state.connect_timeout = timeout;
        self.transition()
    }

    pub fn with_socket_timeout(mut self, timeout: Duration) -> ClientConfigurationBuilder<Terminal> {
        self.state.socket_timeout = timeout;
        self.transition()
    }

    /// Authenticate with HTTP basic auth; the header is computed once by `build()`
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> ClientConfigurationBuilder<Terminal> {
        self.state.basic_auth = Some((username.into(), password.into()));
        self.transition()
    }

    /// Path prepended to every request path, for clusters behind a reverse proxy
    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> ClientConfigurationBuilder<Terminal> {
        self.state.path_prefix = Some(prefix.into());
        self.transition()
    }

    /// Register a callback that customizes the HTTP client; callbacks run in registration order
    pub fn with_client_configurer<F>(mut self, configurer: F) -> ClientConfigurationBuilder<Terminal>
    where
        F: Fn(reqwest::ClientBuilder) -> reqwest::ClientBuilder + Send + Sync + 'static,
    {
        self.state.client_configurers.push(Arc::new(configurer));
        self.transition()
    }

    /// Set the per-request header supplier
    pub fn with_headers<F>(mut self, supplier: F) -> ClientConfigurationBuilder<Terminal>
    where
        F: Fn() -> HeaderMap + Send + Sync + 'static,
    {
        self.state.headers_supplier = Arc::new(supplier);
        self.transition()
    }

    /// Validate the accumulated options and freeze them
    pub fn build(self) -> Result<ClientConfiguration> {
        let state = self.state;

        if state.tls_context.is_some() && state.ca_fingerprint.is_some() {
            return Err(ClientError::ConflictingConfiguration(
                "TLS context and CA fingerprint cannot both be set".to_string(),
            ));
        }

        let mut default_headers = state.default_headers;
        if let Some((username, password)) = &state.basic_auth {
            default_headers.insert(AUTHORIZATION, basic_auth_value(username, password)?);
            if !state.use_ssl {
                tracing::warn!("Basic authentication configured without TLS");
            }
        }

        tracing::info!(
            "Client configuration built: {} endpoint(s), ssl={}, connect_timeout={:?}, socket_timeout={:?}",
            state.endpoints.len(),
            state.use_ssl,
            state.connect_timeout,
            state.socket_timeout
        );

        Ok(ClientConfiguration {
            endpoints: state.endpoints,
            default_headers,
            use_ssl: state.use_ssl,
            tls_context: state.tls_context,
            ca_fingerprint: state.ca_fingerprint,
            hostname_verifier: state.hostname_verifier,
            connect_timeout: state.connect_timeout,
            socket_timeout: state.socket_timeout,
            path_prefix: state.path_prefix,
            proxy: state.proxy,
            client_configurers: state.client_configurers,
            headers_supplier: state.headers_supplier,
        })
    }
}
