//! Timed request execution.
//!
//! Issues a single GET over plain TCP or TLS and reports each step of the
//! connection lifecycle to a [`LifecycleListener`] as it completes.

use super::types::{StatusLine, Target, TraceReport, Transport};
use crate::error::TraceError;
use crate::infra::{connect_tls, DnsResolver, TlsProvider};
use crate::shared::{LifecycleEvent, LifecycleListener, TimingTrace};
use http_body_util::{BodyExt, Empty};
use hyper::{body::Bytes, header, Request};
use hyper_util::rt::TokioIo;
use std::net::{IpAddr, SocketAddr};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// Response data gathered from one HTTP exchange.
struct Exchange {
    status: StatusLine,
    server: Option<String>,
    date: Option<String>,
    body: Vec<u8>,
}

/// Executes one request against `target` and records its timing.
///
/// The display lookup runs first and is not part of the trace; `begin` is
/// taken right after it. Any failure discards the partial trace.
pub async fn trace_request<R, T>(
    target: &Target,
    resolver: &R,
    tls: &T,
) -> Result<TraceReport, TraceError>
where
    R: DnsResolver,
    T: TlsProvider,
{
    let display = resolver.resolve(&target.host).await?;
    let ip = display
        .primary()
        .ok_or_else(|| TraceError::Dns(format!("no addresses for {}", target.host)))?;

    let mut trace = TimingTrace::new();

    let addrs = resolve_within_transport(target, resolver, &mut trace).await?;
    let tcp_stream = connect_tcp(&addrs, &mut trace).await?;

    let exchange = match target.transport {
        Transport::Plain => exchange(tcp_stream, target, &mut trace).await?,
        Transport::Encrypted => {
            let tls_stream = connect_tls(tls, tcp_stream, &target.host).await?;
            trace.on_event(LifecycleEvent::SecureConnected);
            exchange(tls_stream, target, &mut trace).await?
        }
    };

    tracing::debug!(
        url = %target.url,
        status = exchange.status.code,
        body_bytes = exchange.body.len(),
        "Request completed"
    );

    Ok(TraceReport {
        transport: target.transport,
        trace,
        ip,
        status: exchange.status,
        server: exchange.server,
        date: exchange.date,
        body: exchange.body,
    })
}

/// Resolves the connect addresses as part of the connection itself.
///
/// An IP literal needs no lookup, so no `DnsResolved` event is emitted and
/// the DNS phase stays at zero.
async fn resolve_within_transport<R, L>(
    target: &Target,
    resolver: &R,
    listener: &mut L,
) -> Result<Vec<SocketAddr>, TraceError>
where
    R: DnsResolver,
    L: LifecycleListener,
{
    if let Ok(ip) = target.host.parse::<IpAddr>() {
        return Ok(vec![SocketAddr::new(ip, target.port)]);
    }

    let resolved = resolver.resolve(&target.host).await?;
    listener.on_event(LifecycleEvent::DnsResolved);

    Ok(resolved
        .ips
        .into_iter()
        .map(|ip| SocketAddr::new(ip, target.port))
        .collect())
}

/// Connects to the first address that accepts, in order.
async fn connect_tcp<L: LifecycleListener>(
    addrs: &[SocketAddr],
    listener: &mut L,
) -> Result<TcpStream, TraceError> {
    let mut last_error = None;

    for addr in addrs {
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                listener.on_event(LifecycleEvent::Connected);
                return Ok(stream);
            }
            Err(e) => {
                tracing::debug!(%addr, error = %e, "Connect attempt failed");
                last_error = Some(e);
            }
        }
    }

    Err(match last_error {
        Some(e) => TraceError::Connect(e),
        None => TraceError::Dns("no addresses to connect to".to_string()),
    })
}

/// Builds the GET request; no body, only the `Host` header.
fn build_request(target: &Target) -> Result<Request<Empty<Bytes>>, TraceError> {
    Request::get(target.request_target.as_str())
        .header(header::HOST, target.host_header.as_str())
        .body(Empty::new())
        .map_err(|e| TraceError::InvalidUrl(e.to_string()))
}

/// Runs the HTTP/1.1 exchange over an established stream.
async fn exchange<S, L>(io: S, target: &Target, listener: &mut L) -> Result<Exchange, TraceError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    L: LifecycleListener,
{
    let request = build_request(target)?;

    let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(io)).await?;

    // Errors here also surface through send_request or the body stream
    tokio::spawn(async move {
        if let Err(e) = conn.await {
            tracing::warn!("Connection error: {}", e);
        }
    });

    let response = sender.send_request(request).await?;
    listener.on_event(LifecycleEvent::FirstByteReadable);

    let reason = response
        .extensions()
        .get::<hyper::ext::ReasonPhrase>()
        .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned())
        .or_else(|| response.status().canonical_reason().map(str::to_string))
        .unwrap_or_default();

    let status = StatusLine {
        version: response.version(),
        code: response.status().as_u16(),
        reason,
    };
    let header_value = |name: header::HeaderName| {
        response
            .headers()
            .get(name)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
    };
    let server = header_value(header::SERVER);
    let date = header_value(header::DATE);

    let mut incoming = response.into_body();
    let mut body = Vec::new();
    while let Some(frame) = incoming.frame().await {
        if let Ok(chunk) = frame?.into_data() {
            body.extend_from_slice(&chunk);
        }
    }
    listener.on_event(LifecycleEvent::ResponseEnded);

    Ok(Exchange {
        status,
        server,
        date,
        body,
    })
}
