//! Helpers shared by the async tests: one-shot HTTP and HTTPS stubs, stub
//! resolvers and a TLS provider trusting the stub's certificate.

use crate::error::TraceError;
use crate::infra::{tls_config_with_roots, DnsResolver, DnsResult, TlsProvider};
use rustls_pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

/// Serves `response` verbatim to a single connection and returns the port.
///
/// The request head is drained first. A client that does not speak plain
/// HTTP (a TLS ClientHello, say) gets the response after its first read.
pub async fn serve_once(response: &'static str) -> u16 {
    serve(response, 1).await
}

/// Like [`serve_once`] but answers `connections` connections in sequence.
pub async fn serve(response: &'static str, connections: usize) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        for _ in 0..connections {
            let Ok((socket, _)) = listener.accept().await else {
                return;
            };
            answer(socket, response).await;
        }
    });

    port
}

/// Serves `response` over TLS to a single connection.
///
/// Returns the port and the self-signed `localhost` certificate the server
/// presents; trust it with [`TrustingTlsProvider`].
pub async fn serve_tls_once(response: &'static str) -> (u16, CertificateDer<'static>) {
    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let cert = certified.cert.der().clone();
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(certified.key_pair.serialize_der()));

    let config = rustls::ServerConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .unwrap()
    .with_no_client_auth()
    .with_single_cert(vec![cert.clone()], key)
    .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let Ok((socket, _)) = listener.accept().await else {
            return;
        };
        if let Ok(stream) = acceptor.accept(socket).await {
            answer(stream, response).await;
        }
    });

    (port, cert)
}

/// Drains the request head, then writes `response` and closes.
async fn answer<S: AsyncRead + AsyncWrite + Unpin>(mut socket: S, response: &str) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
        let head_done = request.windows(4).any(|w| w == b"\r\n\r\n");
        let looks_like_http = request[0].is_ascii_uppercase();
        if head_done || !looks_like_http {
            break;
        }
    }
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Trusts a single certificate and nothing else.
pub struct TrustingTlsProvider {
    cert: CertificateDer<'static>,
}

impl TrustingTlsProvider {
    pub fn new(cert: CertificateDer<'static>) -> Self {
        Self { cert }
    }
}

impl TlsProvider for TrustingTlsProvider {
    fn client_config(&self) -> Result<Arc<rustls::ClientConfig>, TraceError> {
        let mut roots = rustls::RootCertStore::empty();
        roots
            .add(self.cert.clone())
            .map_err(|e| TraceError::Tls(e.to_string()))?;
        tls_config_with_roots(roots)
    }
}

/// A port on loopback that refuses connections.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Resolves every host to a fixed address and counts lookups.
pub struct StaticResolver {
    ip: IpAddr,
    calls: AtomicUsize,
}

impl StaticResolver {
    pub fn loopback() -> Self {
        Self {
            ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DnsResolver for StaticResolver {
    async fn resolve(&self, _host: &str) -> Result<DnsResult, TraceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(DnsResult { ips: vec![self.ip] })
    }
}

/// Fails every lookup the way an NXDOMAIN answer would.
pub struct FailingResolver;

impl DnsResolver for FailingResolver {
    async fn resolve(&self, host: &str) -> Result<DnsResult, TraceError> {
        Err(TraceError::Dns(format!("no record found for {}", host)))
    }
}

/// Answers the first lookup at once and every later one after `delay`.
///
/// Models a display lookup followed by a connection-time lookup that still
/// has to go out to the network.
pub struct SlowRepeatResolver {
    delay: Duration,
    calls: AtomicUsize,
}

impl SlowRepeatResolver {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicUsize::new(0),
        }
    }
}

impl DnsResolver for SlowRepeatResolver {
    async fn resolve(&self, _host: &str) -> Result<DnsResult, TraceError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) > 0 {
            tokio::time::sleep(self.delay).await;
        }
        Ok(DnsResult {
            ips: vec![IpAddr::V4(Ipv4Addr::LOCALHOST)],
        })
    }
}
