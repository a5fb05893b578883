//! searchdata client configuration
//!
//! Everything the transport layer needs to talk to a search cluster, assembled
//! through a staged builder that only exposes the options legal at each step:
//!
//! ```text
//! ClientConfiguration::builder()        NeedsEndpoint
//!     .connected_to(["es1:9200"])?      -> MaybeSecure   (proxy, TLS decision)
//!     .using_ssl()                      -> Terminal      (headers, timeouts, auth, ...)
//!     .with_basic_auth("user", "pw")
//!     .build()?                         -> ClientConfiguration (immutable)
//! ```
//!
//! The resulting [`ClientConfiguration`] never changes after `build()` and can be
//! shared by every request-issuing task.

pub mod builder;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod headers;
pub mod settings;
pub mod tls;

// Re-export main types
pub use builder::{
    AcceptsEndpoints, AcceptsOptions, ClientConfigurationBuilder, MaybeSecure, NeedsEndpoint, Stage,
    Terminal,
};
pub use config::{ClientConfiguration, DEFAULT_CONNECT_TIMEOUT, DEFAULT_SOCKET_TIMEOUT};
pub use endpoint::{Endpoint, DEFAULT_PORT};
pub use error::{ClientError, Result};
pub use headers::{ClientConfigurer, HeadersSupplier};
pub use settings::ClientSettings;
pub use tls::{HostnameVerifier, TlsContext};

// Re-export the header types used throughout the API
pub use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
