use clap::Parser;
use http_phase_timer::{Config, JsonSink, OutputFormat, ResultSink, TextSink, TraceService};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The URL to trace, like https://www.example.com
    #[arg(required = true, num_args = 1..)]
    url: Vec<String>,
    /// Output format; overrides HTTP_PHASE_TIMER_FORMAT.
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
    /// Give up after this many milliseconds; overrides HTTP_PHASE_TIMER_TIMEOUT_MS.
    #[arg(short, long, value_name = "ms")]
    timeout: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // stdout belongs to the sink
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "http_phase_timer=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(ms) = cli.timeout {
        config.timeout_ms = Some(ms).filter(|ms| *ms > 0);
    }

    // A launcher may hand over the query split on spaces
    let input = cli.url.join(" ");
    tracing::debug!(input = %input, ?config, "Starting trace");

    let service = TraceService::new().with_timeout(config.timeout());
    let mut sink: Box<dyn ResultSink> = match config.format {
        OutputFormat::Json => Box::new(JsonSink::new(io::stdout())),
        OutputFormat::Text => Box::new(TextSink::new(io::stdout())),
    };

    match service.run(&input, sink.as_mut()).await {
        Ok(outcome) if outcome.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("Failed to publish results: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from(["http-phase-timer", "-f", "json", "--timeout", "500", "https://example.com"]);
        assert_eq!(cli.url, ["https://example.com"]);
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.timeout, Some(500));
    }

    #[test]
    fn test_cli_requires_url() {
        assert!(Cli::try_parse_from(["http-phase-timer"]).is_err());
    }

    #[test]
    fn test_cli_keeps_split_input() {
        let cli = Cli::parse_from(["http-phase-timer", "not", "a", "url"]);
        assert_eq!(cli.url.join(" "), "not a url");
    }
}
