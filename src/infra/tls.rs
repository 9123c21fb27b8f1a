//! TLS/SSL infrastructure.
//!
//! Provides trait-based abstractions for TLS configuration and connection handling.

use crate::error::TraceError;
use rustls_pki_types::ServerName;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::{client::TlsStream, TlsConnector};

/// Trait for TLS configuration providers.
pub trait TlsProvider {
    /// Creates a new TLS client configuration.
    fn client_config(&self) -> Result<Arc<rustls::ClientConfig>, TraceError>;

    /// Creates a TLS connector from this provider's configuration.
    fn connector(&self) -> Result<TlsConnector, TraceError> {
        Ok(TlsConnector::from(self.client_config()?))
    }
}

/// Default TLS provider using rustls with Mozilla's root certificates.
#[derive(Default, Clone)]
pub struct RustlsTlsProvider;

impl RustlsTlsProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TlsProvider for RustlsTlsProvider {
    fn client_config(&self) -> Result<Arc<rustls::ClientConfig>, TraceError> {
        create_tls_config()
    }
}

/// Creates a TLS client configuration with Mozilla's root certificates.
pub fn create_tls_config() -> Result<Arc<rustls::ClientConfig>, TraceError> {
    let root_store =
        rustls::RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    tls_config_with_roots(root_store)
}

/// Creates a TLS client configuration trusting exactly `root_store`.
///
/// The ring provider is passed explicitly, so no process-wide default
/// provider has to be installed first. No ALPN is offered, which keeps the
/// exchange on HTTP/1.1.
pub fn tls_config_with_roots(
    root_store: rustls::RootCertStore,
) -> Result<Arc<rustls::ClientConfig>, TraceError> {
    let config = rustls::ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .map_err(|e| TraceError::Tls(e.to_string()))?
    .with_root_certificates(root_store)
    .with_no_client_auth();

    Ok(Arc::new(config))
}

/// Performs the TLS handshake over an established TCP connection.
///
/// `server_name` is used for SNI and certificate verification; IP literals
/// are accepted.
pub async fn connect_tls<P: TlsProvider>(
    provider: &P,
    tcp_stream: TcpStream,
    server_name: &str,
) -> Result<TlsStream<TcpStream>, TraceError> {
    let connector = provider.connector()?;

    let server_name = ServerName::try_from(server_name.to_string())
        .map_err(|e| TraceError::Tls(format!("invalid server name: {}", e)))?;

    connector
        .connect(server_name, tcp_stream)
        .await
        .map_err(|e| TraceError::Tls(e.to_string()))
}
