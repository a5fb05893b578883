//! Client settings loaded from files and the environment
//!
//! Values come from an optional `config/searchdata.{yaml,toml,json}` file and
//! `SEARCHDATA_*` environment variables (nested keys use `__`). A `.env` file is
//! loaded first when present. Settings never bypass the builder: they are turned
//! into a [`ClientConfiguration`] by driving [`ClientConfigurationBuilder`](crate::ClientConfigurationBuilder).

use crate::config::ClientConfiguration;
use crate::error::{ClientError, Result};
use crate::headers::header_map_from_pairs;
use crate::tls::TlsContext;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Connection settings for one cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Nodes as `host` / `host:port`
    pub endpoints: Vec<String>,

    #[serde(default)]
    pub ssl: bool,

    /// PEM file with an extra trusted root certificate
    #[serde(default)]
    pub ca_certificate: Option<PathBuf>,

    #[serde(default)]
    pub ca_fingerprint: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub path_prefix: Option<String>,

    #[serde(default)]
    pub proxy: Option<String>,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: i64,

    #[serde(default = "default_socket_timeout_ms")]
    pub socket_timeout_ms: i64,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_connect_timeout_ms() -> i64 {
    10_000
}

fn default_socket_timeout_ms() -> i64 {
    5_000
}

impl ClientSettings {
    /// Settings for the given nodes with every other option at its default
    pub fn for_endpoints<I, S>(endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            endpoints: endpoints.into_iter().map(Into::into).collect(),
            ssl: false,
            ca_certificate: None,
            ca_fingerprint: None,
            username: None,
            password: None,
            path_prefix: None,
            proxy: None,
            connect_timeout_ms: default_connect_timeout_ms(),
            socket_timeout_ms: default_socket_timeout_ms(),
            headers: BTreeMap::new(),
        }
    }

    /// Load settings from `config/searchdata.*` and `SEARCHDATA_*` variables
    pub fn load() -> Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/searchdata").required(false))
            .add_source(Self::environment())
            .build()?
            .try_deserialize::<Self>()?;

        tracing::debug!("Loaded client settings for {} endpoint(s)", settings.endpoints.len());
        Ok(settings)
    }

    /// Load settings from one file; the format follows the file extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?
            .try_deserialize::<Self>()?;
        Ok(settings)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("SEARCHDATA")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("endpoints")
            .try_parsing(true)
    }

    /// Drive the staged builder with these settings
    pub fn into_configuration(self) -> Result<ClientConfiguration> {
        let connect_timeout = Self::timeout("connect_timeout_ms", self.connect_timeout_ms)?;
        let socket_timeout = Self::timeout("socket_timeout_ms", self.socket_timeout_ms)?;
        let headers = header_map_from_pairs(&self.headers)?;

        let mut builder = ClientConfiguration::builder().connected_to(&self.endpoints)?;
        if let Some(proxy) = self.proxy {
            builder = builder.with_proxy(proxy)?;
        }

        let mut builder = builder.using_ssl_flag(self.ssl);
        if let Some(path) = &self.ca_certificate {
            builder = builder.using_ssl_context(TlsContext::new().with_root_certificate_file(path)?);
        }
        if let Some(fingerprint) = self.ca_fingerprint {
            builder = builder.using_ssl_fingerprint(fingerprint)?;
        }

        let mut builder = builder
            .with_default_headers(&headers)
            .with_connect_timeout(connect_timeout)
            .with_socket_timeout(socket_timeout);

        builder = match (self.username, self.password) {
            (Some(username), Some(password)) => builder.with_basic_auth(username, password),
            (None, None) => builder,
            _ => {
                return Err(ClientError::InvalidArgument(
                    "username and password must be set together".to_string(),
                ))
            }
        };

        if let Some(prefix) = self.path_prefix {
            builder = builder.with_path_prefix(prefix);
        }

        builder.build()
    }

    fn timeout(name: &str, millis: i64) -> Result<Duration> {
        u64::try_from(millis)
            .map(Duration::from_millis)
            .map_err(|_| ClientError::InvalidArgument(format!("{} must not be negative", name)))
    }
}
