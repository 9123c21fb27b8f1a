pub mod config;
pub mod error;
pub mod infra;
pub mod shared;
pub mod sink;
pub mod tracer;

#[cfg(test)]
mod test_support;

pub use config::{Config, OutputFormat};
pub use error::{FailureKind, TraceError};
pub use sink::{JsonSink, ResultItem, ResultSink, TextSink, VecSink};
pub use tracer::{Outcome, TraceService};
