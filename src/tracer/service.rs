//! End-to-end trace service.
//!
//! Wires validation, the timed request and result formatting together, with
//! the DNS resolver and TLS provider injected so tests can swap them out.

use super::executor::trace_request;
use super::response_builder::build_items;
use super::router::validate_url;
use super::types::Outcome;
use crate::error::TraceError;
use crate::infra::{DnsResolver, HickoryDnsResolver, RustlsTlsProvider, TlsProvider};
use crate::sink::ResultSink;
use std::io;
use std::time::Duration;
use tokio::time::timeout;

/// Runs one trace per call; nothing carries over between calls.
pub struct TraceService<R = HickoryDnsResolver, T = RustlsTlsProvider> {
    resolver: R,
    tls: T,
    timeout: Option<Duration>,
}

impl TraceService {
    /// Service backed by hickory DNS and rustls with Mozilla roots.
    pub fn new() -> Self {
        Self::with_parts(HickoryDnsResolver::new(), RustlsTlsProvider::new())
    }
}

impl Default for TraceService {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: DnsResolver, T: TlsProvider> TraceService<R, T> {
    pub fn with_parts(resolver: R, tls: T) -> Self {
        Self {
            resolver,
            tls,
            timeout: None,
        }
    }

    /// Bounds the whole trace, display lookup included. Unbounded by default.
    pub fn with_timeout(mut self, limit: Option<Duration>) -> Self {
        self.timeout = limit;
        self
    }

    /// Validates `input` and, if it is routable, traces one request.
    pub async fn trace(&self, input: &str) -> Outcome {
        let target = match validate_url(input) {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!(input, error = %e, "Rejected input");
                return Outcome::Failure(e);
            }
        };

        tracing::debug!(url = %target.url, transport = ?target.transport, "Tracing request");

        let traced = trace_request(&target, &self.resolver, &self.tls);
        let result = match self.timeout {
            Some(limit) => match timeout(limit, traced).await {
                Ok(result) => result,
                Err(_) => Err(TraceError::Timeout(limit.as_millis() as u64)),
            },
            None => traced.await,
        };

        if let Err(ref e) = result {
            tracing::warn!(url = %target.url, error = %e, "Trace failed");
        }
        Outcome::from(result)
    }

    /// Traces `input` and publishes the records to `sink` exactly once.
    pub async fn run<S: ResultSink + ?Sized>(&self, input: &str, sink: &mut S) -> io::Result<Outcome> {
        let outcome = self.trace(input).await;
        sink.publish(&build_items(&outcome))?;
        Ok(outcome)
    }
}
