pub mod executor;
pub mod response_builder;
pub mod router;
pub mod service;
pub mod types;

pub use executor::trace_request;
pub use response_builder::{build_items, failure_items, headers_summary, success_items};
pub use router::validate_url;
pub use service::TraceService;
pub use types::*;
