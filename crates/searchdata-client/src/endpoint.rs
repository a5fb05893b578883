//! Cluster endpoints
//!
//! Parses `host` / `host:port` / `[ipv6]:port` text into an [`Endpoint`].

use crate::error::{ClientError, Result};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

/// Port used when the endpoint text does not carry one
pub const DEFAULT_PORT: u16 = 9200;

/// A validated host and port of one cluster node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Create an endpoint from an already separated host and port
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        let host = host.into();
        if host.is_empty() {
            return Err(ClientError::InvalidArgument(
                "host must not be empty".to_string(),
            ));
        }
        Ok(Self { host, port })
    }

    /// Parse endpoint text, using [`DEFAULT_PORT`] when no port is given
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with_default(text, DEFAULT_PORT)
    }

    /// Parse endpoint text with an explicit default port
    ///
    /// Accepted forms:
    /// - `host` and `host:port`
    /// - `[v6-literal]` and `[v6-literal]:port`
    /// - a bare IPv6 literal (two or more colons), which never carries a port
    pub fn parse_with_default(text: &str, default_port: u16) -> Result<Self> {
        if text.is_empty() {
            return Err(ClientError::malformed(text, "endpoint must not be empty"));
        }

        let (host, port_text) = if text.starts_with('[') {
            Self::split_bracketed(text)?
        } else {
            match text.find(':') {
                // exactly one colon separates host and port
                Some(pos) if !text[pos + 1..].contains(':') => (&text[..pos], &text[pos + 1..]),
                // no colon, or an unbracketed IPv6 literal
                _ => (text, ""),
            }
        };

        if host.is_empty() {
            return Err(ClientError::malformed(text, "host must not be empty"));
        }
        if host.contains(['[', ']']) {
            return Err(ClientError::malformed(text, "bracket mismatch"));
        }

        let port = if port_text.is_empty() {
            default_port
        } else {
            Self::parse_port(text, port_text)?
        };

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    fn split_bracketed(text: &str) -> Result<(&str, &str)> {
        let colon = text.find(':');
        let close = text.rfind(']');

        let close = match (colon, close) {
            (Some(colon), Some(close)) if close > colon => close,
            _ => return Err(ClientError::malformed(text, "invalid bracketed host/port")),
        };

        let host = &text[1..close];
        let rest = &text[close + 1..];
        if rest.is_empty() {
            return Ok((host, ""));
        }

        match rest.strip_prefix(':') {
            Some(port) => Ok((host, port)),
            None => Err(ClientError::malformed(
                text,
                "only a colon may follow a close bracket",
            )),
        }
    }

    fn parse_port(text: &str, port_text: &str) -> Result<u16> {
        if !port_text.chars().all(|c| c.is_ascii_digit()) {
            return Err(ClientError::malformed(text, "port must be numeric"));
        }
        port_text
            .parse::<u32>()
            .ok()
            .and_then(|port| u16::try_from(port).ok())
            .ok_or_else(|| ClientError::malformed(text, "port number out of range"))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// True when the host is an IPv6 literal and needs brackets in URLs
    pub fn is_ipv6_literal(&self) -> bool {
        self.host.contains(':')
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ipv6_literal() {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for Endpoint {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<SocketAddr> for Endpoint {
    fn from(addr: SocketAddr) -> Self {
        Self {
            host: addr.ip().to_string(),
            port: addr.port(),
        }
    }
}
