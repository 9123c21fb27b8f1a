//! DNS resolution infrastructure.
//!
//! Provides a trait-based abstraction for DNS resolution so the tracer can be
//! driven by a stub resolver in tests.

use crate::error::TraceError;
use hickory_resolver::{config::*, TokioAsyncResolver};
use std::{net::IpAddr, sync::Arc};
use tokio::sync::OnceCell;

/// Addresses a host resolved to, in resolver order.
#[derive(Debug, Clone)]
pub struct DnsResult {
    pub ips: Vec<IpAddr>,
}

impl DnsResult {
    /// The address shown to the user and tried first when connecting.
    pub fn primary(&self) -> Option<IpAddr> {
        self.ips.first().copied()
    }
}

/// Trait for DNS resolution.
#[allow(async_fn_in_trait)]
pub trait DnsResolver {
    /// Resolves a hostname to a non-empty list of IP addresses.
    async fn resolve(&self, host: &str) -> Result<DnsResult, TraceError>;
}

/// Process-wide resolver. Its answer cache is disabled so every lookup,
/// including a repeat for the same host, is a real query.
static DNS_RESOLVER: OnceCell<Arc<TokioAsyncResolver>> = OnceCell::const_new();

/// Turns off the in-process answer cache.
fn uncached(mut opts: ResolverOpts) -> ResolverOpts {
    opts.cache_size = 0;
    opts
}

async fn get_resolver() -> Arc<TokioAsyncResolver> {
    DNS_RESOLVER
        .get_or_init(|| async {
            let (config, opts) = hickory_resolver::system_conf::read_system_conf().unwrap_or_else(|e| {
                tracing::warn!("System DNS configuration unavailable ({}), using defaults", e);
                (ResolverConfig::default(), ResolverOpts::default())
            });
            Arc::new(TokioAsyncResolver::tokio(config, uncached(opts)))
        })
        .await
        .clone()
}

/// DNS resolver implementation using hickory-resolver.
#[derive(Default, Clone)]
pub struct HickoryDnsResolver;

impl HickoryDnsResolver {
    pub fn new() -> Self {
        Self
    }
}

impl DnsResolver for HickoryDnsResolver {
    async fn resolve(&self, host: &str) -> Result<DnsResult, TraceError> {
        // IP literals never hit the network
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(DnsResult { ips: vec![ip] });
        }

        let resolver = get_resolver().await;
        let response = resolver
            .lookup_ip(host)
            .await
            .map_err(|e| TraceError::Dns(e.to_string()))?;

        let ips: Vec<IpAddr> = response.iter().collect();
        if ips.is_empty() {
            return Err(TraceError::Dns(format!("no addresses for {}", host)));
        }
        tracing::debug!(host, ?ips, "Resolved host");
        Ok(DnsResult { ips })
    }
}
