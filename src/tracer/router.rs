//! URL validation and transport routing.

use super::types::{Target, Transport};
use crate::error::TraceError;
use url::{Host, Url};

/// Validates `input` as an absolute `http`/`https` URL.
///
/// Performs no I/O; any rejection is an input error.
pub fn validate_url(input: &str) -> Result<Target, TraceError> {
    let parsed = Url::parse(input).map_err(|e| TraceError::InvalidUrl(e.to_string()))?;

    let transport = match parsed.scheme() {
        "http" => Transport::Plain,
        "https" => Transport::Encrypted,
        other => return Err(TraceError::UnsupportedScheme(other.to_string())),
    };

    let host = match parsed.host() {
        Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
        Some(Host::Ipv4(ip)) => ip.to_string(),
        Some(Host::Ipv6(ip)) => ip.to_string(),
        _ => return Err(TraceError::InvalidUrl("URL has no host".to_string())),
    };
    // host_str keeps IPv6 brackets, which the Host header needs
    let host_str = parsed.host_str().unwrap_or(&host);

    let port = parsed.port().unwrap_or(transport.default_port());
    let host_header = match parsed.port() {
        Some(p) => format!("{}:{}", host_str, p),
        None => host_str.to_string(),
    };

    let request_target = match parsed.query() {
        Some(query) => format!("{}?{}", parsed.path(), query),
        None => parsed.path().to_string(),
    };
    let request_target = if request_target.is_empty() {
        "/".to_string()
    } else {
        request_target
    };

    Ok(Target {
        url: parsed.to_string(),
        transport,
        host,
        port,
        request_target,
        host_header,
    })
}
