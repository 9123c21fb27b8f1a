use thiserror::Error;

/// Coarse failure classes shown to the user.
///
/// Every [`TraceError`] collapses into one of these two; the detail string is
/// only ever logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The input was not an absolute `http`/`https` URL. No I/O happened.
    InvalidUrl,
    /// Resolution or any transport-level step failed.
    Transport,
}

impl FailureKind {
    pub fn title(self) -> &'static str {
        match self {
            FailureKind::InvalidUrl => "Parse URL Format Error",
            FailureKind::Transport => "Resolve Error",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            FailureKind::InvalidUrl => "Please check the URL format",
            FailureKind::Transport => "Please Check the URL",
        }
    }
}

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("DNS lookup failed: {0}")]
    Dns(String),

    #[error("TCP connection failed: {0}")]
    Connect(#[from] std::io::Error),

    #[error("TLS handshake failed: {0}")]
    Tls(String),

    #[error("HTTP exchange failed: {0}")]
    Http(#[from] hyper::Error),

    #[error("Timed out after {0} ms")]
    Timeout(u64),
}

impl TraceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            TraceError::InvalidUrl(_) | TraceError::UnsupportedScheme(_) => FailureKind::InvalidUrl,
            TraceError::Dns(_)
            | TraceError::Connect(_)
            | TraceError::Tls(_)
            | TraceError::Http(_)
            | TraceError::Timeout(_) => FailureKind::Transport,
        }
    }
}
