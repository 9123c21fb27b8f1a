//! Timing trace for a single request.
//!
//! The transport code reports lifecycle events to a [`LifecycleListener`];
//! [`TimingTrace`] is the listener that turns them into the phase breakdown.

use crate::tracer::types::Transport;
use std::time::Instant;

/// Lifecycle signals emitted while a request is in flight, in causal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    DnsResolved,
    Connected,
    SecureConnected,
    FirstByteReadable,
    ResponseEnded,
}

/// Receives lifecycle events from the transport.
///
/// Passed by exclusive reference into each transport step, so events are
/// recorded strictly in the order the steps run.
pub trait LifecycleListener {
    fn on_event(&mut self, event: LifecycleEvent);
}

/// A named interval of the reported breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    DnsLookup,
    TcpConnection,
    SslHandshake,
    ServerProcessing,
    ContentTransfer,
    Total,
}

impl Phase {
    pub fn title(self) -> &'static str {
        match self {
            Phase::DnsLookup => "DNS Lookup",
            Phase::TcpConnection => "TCP Connection",
            Phase::SslHandshake => "SSL Handshake",
            Phase::ServerProcessing => "Server Processing",
            Phase::ContentTransfer => "Content Transfer",
            Phase::Total => "Total",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Phase::DnsLookup => "icons/dns.png",
            Phase::TcpConnection => "icons/tcp.png",
            Phase::SslHandshake => "icons/ssl.png",
            Phase::ServerProcessing => "icons/server.png",
            Phase::ContentTransfer => "icons/content.png",
            Phase::Total => "icons/total.png",
        }
    }
}

/// Event timestamps of one request.
///
/// Every event starts out equal to `begin`. An event that never fires keeps
/// that value, so its phase (and the phases measured from it) come out as a
/// zero or negative number of milliseconds rather than a missing value.
#[derive(Debug, Clone)]
pub struct TimingTrace {
    pub begin: Instant,
    pub dns_resolved: Instant,
    pub connected: Instant,
    pub secure_connected: Instant,
    pub first_byte_readable: Instant,
    pub response_ended: Instant,
}

impl TimingTrace {
    /// Starts a trace with `begin` set to now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(begin: Instant) -> Self {
        Self {
            begin,
            dns_resolved: begin,
            connected: begin,
            secure_connected: begin,
            first_byte_readable: begin,
            response_ended: begin,
        }
    }

    /// Records `event` as having happened at `at`.
    pub fn record_at(&mut self, event: LifecycleEvent, at: Instant) {
        let slot = match event {
            LifecycleEvent::DnsResolved => &mut self.dns_resolved,
            LifecycleEvent::Connected => &mut self.connected,
            LifecycleEvent::SecureConnected => &mut self.secure_connected,
            LifecycleEvent::FirstByteReadable => &mut self.first_byte_readable,
            LifecycleEvent::ResponseEnded => &mut self.response_ended,
        };
        *slot = at;
    }

    /// Signed whole milliseconds from `begin` to `at`.
    pub fn offset_ms(&self, at: Instant) -> i64 {
        match at.checked_duration_since(self.begin) {
            Some(elapsed) => elapsed.as_millis() as i64,
            None => -(self.begin.duration_since(at).as_millis() as i64),
        }
    }

    /// Computes the ordered phase breakdown for `transport`.
    ///
    /// Intervals are differences of per-event offsets from `begin`, so the
    /// non-total phases always sum to exactly `Total`.
    pub fn phases(&self, transport: Transport) -> Vec<(Phase, i64)> {
        let dns = self.offset_ms(self.dns_resolved);
        let connected = self.offset_ms(self.connected);
        let first_byte = self.offset_ms(self.first_byte_readable);
        let ended = self.offset_ms(self.response_ended);

        let mut phases = vec![
            (Phase::DnsLookup, dns),
            (Phase::TcpConnection, connected - dns),
        ];

        let processing_start = match transport {
            Transport::Plain => connected,
            Transport::Encrypted => {
                let secure = self.offset_ms(self.secure_connected);
                phases.push((Phase::SslHandshake, secure - connected));
                secure
            }
        };

        phases.push((Phase::ServerProcessing, first_byte - processing_start));
        phases.push((Phase::ContentTransfer, ended - first_byte));
        phases.push((Phase::Total, ended));
        phases
    }
}

impl Default for TimingTrace {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleListener for TimingTrace {
    fn on_event(&mut self, event: LifecycleEvent) {
        let now = Instant::now();
        self.record_at(event, now);
        tracing::debug!(?event, offset_ms = self.offset_ms(now), "lifecycle event");
    }
}
