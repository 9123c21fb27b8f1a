use clap::ValueEnum;
use std::env;
use std::time::Duration;

/// How published records are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned `title  subtitle` lines.
    #[default]
    Text,
    /// `{"items": [...]}` for launchers and scripts.
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub format: OutputFormat,
    /// `None` waits indefinitely.
    pub timeout_ms: Option<u64>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            format: lookup("HTTP_PHASE_TIMER_FORMAT")
                .and_then(|f| OutputFormat::from_str(&f, true).ok())
                .unwrap_or_default(),
            timeout_ms: lookup("HTTP_PHASE_TIMER_TIMEOUT_MS")
                .and_then(|t| t.parse().ok())
                .filter(|ms| *ms > 0),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
