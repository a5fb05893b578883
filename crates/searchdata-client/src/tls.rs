//! TLS material handed to the transport

use crate::error::Result;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Trust configuration for verifying the cluster's certificate chain
#[derive(Clone, Default)]
pub struct TlsContext {
    root_certificates: Vec<Vec<u8>>,
    accept_invalid_certificates: bool,
}

impl TlsContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trust an additional PEM-encoded root certificate
    pub fn with_root_certificate_pem(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.root_certificates.push(pem.into());
        self
    }

    /// Trust a PEM-encoded root certificate read from disk
    pub fn with_root_certificate_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let pem = std::fs::read(path.as_ref()).map_err(|e| {
            crate::error::ClientError::InvalidArgument(format!(
                "cannot read certificate {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Ok(self.with_root_certificate_pem(pem))
    }

    /// Skip certificate validation entirely (test clusters with self-signed certificates)
    pub fn accept_invalid_certificates(mut self, accept: bool) -> Self {
        self.accept_invalid_certificates = accept;
        self
    }

    pub fn root_certificates(&self) -> &[Vec<u8>] {
        &self.root_certificates
    }

    pub fn accepts_invalid_certificates(&self) -> bool {
        self.accept_invalid_certificates
    }
}

impl fmt::Debug for TlsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsContext")
            .field("root_certificates", &self.root_certificates.len())
            .field("accept_invalid_certificates", &self.accept_invalid_certificates)
            .finish()
    }
}

/// Decides whether a server hostname matches the presented certificate
#[derive(Clone)]
pub struct HostnameVerifier(Arc<dyn Fn(&str) -> bool + Send + Sync>);

impl HostnameVerifier {
    pub fn new<F>(verify: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(verify))
    }

    /// Verifier that accepts every hostname
    pub fn accept_all() -> Self {
        Self::new(|_| true)
    }

    pub fn verify(&self, hostname: &str) -> bool {
        (self.0)(hostname)
    }
}

impl fmt::Debug for HostnameVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HostnameVerifier(..)")
    }
}
