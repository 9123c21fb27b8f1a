use crate::error::{FailureKind, TraceError};
use crate::shared::{Phase, TimingTrace};
use hyper::Version;
use std::net::IpAddr;

/// Which transport a URL is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// `http`: plain TCP.
    Plain,
    /// `https`: TCP wrapped in TLS.
    Encrypted,
}

impl Transport {
    pub fn default_port(self) -> u16 {
        match self {
            Transport::Plain => 80,
            Transport::Encrypted => 443,
        }
    }
}

/// A validated request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub url: String,
    pub transport: Transport,
    /// Host without IPv6 brackets, as used for DNS and SNI.
    pub host: String,
    pub port: u16,
    /// Path plus query, never empty.
    pub request_target: String,
    /// Value for the `Host` request header.
    pub host_header: String,
}

/// Response status line as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub version: Version,
    pub code: u16,
    pub reason: String,
}

impl StatusLine {
    /// Protocol version without the `HTTP/` prefix, e.g. `1.1`.
    pub fn version_number(&self) -> &'static str {
        match self.version {
            Version::HTTP_09 => "0.9",
            Version::HTTP_10 => "1.0",
            Version::HTTP_2 => "2.0",
            Version::HTTP_3 => "3.0",
            _ => "1.1",
        }
    }
}

/// Everything a successful trace produced.
#[derive(Debug, Clone)]
pub struct TraceReport {
    pub transport: Transport,
    pub trace: TimingTrace,
    /// Address from the display lookup.
    pub ip: IpAddr,
    pub status: StatusLine,
    pub server: Option<String>,
    pub date: Option<String>,
    pub body: Vec<u8>,
}

impl TraceReport {
    pub fn phases(&self) -> Vec<(Phase, i64)> {
        self.trace.phases(self.transport)
    }
}

/// Terminal result of one invocation.
#[derive(Debug)]
pub enum Outcome {
    Success(Box<TraceReport>),
    Failure(TraceError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(e) => Some(e.kind()),
        }
    }
}

impl From<Result<TraceReport, TraceError>> for Outcome {
    fn from(result: Result<TraceReport, TraceError>) -> Self {
        match result {
            Ok(report) => Outcome::Success(Box::new(report)),
            Err(e) => Outcome::Failure(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ports() {
        assert_eq!(Transport::Plain.default_port(), 80);
        assert_eq!(Transport::Encrypted.default_port(), 443);
    }

    #[test]
    fn test_version_number() {
        let line = |version| StatusLine { version, code: 200, reason: "OK".into() };
        assert_eq!(line(Version::HTTP_11).version_number(), "1.1");
        assert_eq!(line(Version::HTTP_10).version_number(), "1.0");
        assert_eq!(line(Version::HTTP_2).version_number(), "2.0");
    }

    #[test]
    fn test_outcome_from_result() {
        let outcome = Outcome::from(Err(TraceError::Dns("nx".into())));
        assert!(!outcome.is_success());
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Transport));
    }
}
