//! Infrastructure layer providing abstractions for external dependencies.
//!
//! This module contains traits and implementations for:
//! - DNS resolution
//! - TLS/SSL connections
//!
//! Both are injected into the tracer so it can be exercised without real
//! name servers or certificates.

pub mod dns;
pub mod tls;

pub use dns::{DnsResolver, DnsResult, HickoryDnsResolver};
pub use tls::{connect_tls, create_tls_config, tls_config_with_roots, RustlsTlsProvider, TlsProvider};
