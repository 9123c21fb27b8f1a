//! Turns an [`Outcome`] into the ordered result records handed to the sink.

use super::types::{Outcome, TraceReport};
use crate::error::FailureKind;
use crate::shared::Phase;
use crate::sink::ResultItem;

const HEADER_ICON: &str = "icons/header.png";

/// Placeholder for a response header the server did not send.
const MISSING_HEADER: &str = "-";

/// Builds the records for any outcome.
pub fn build_items(outcome: &Outcome) -> Vec<ResultItem> {
    match outcome {
        Outcome::Success(report) => success_items(report),
        Outcome::Failure(e) => failure_items(e.kind()),
    }
}

/// One record per phase, then the status line summary.
pub fn success_items(report: &TraceReport) -> Vec<ResultItem> {
    let mut items: Vec<ResultItem> = report
        .phases()
        .into_iter()
        .map(|(phase, ms)| {
            let subtitle = match phase {
                Phase::DnsLookup => format!("{}ms IP: {}", ms, report.ip),
                _ => format!("{}ms", ms),
            };
            ResultItem::new(phase.title(), subtitle).with_icon(phase.icon())
        })
        .collect();

    items.push(ResultItem::new("Headers", headers_summary(report)).with_icon(HEADER_ICON));
    items
}

/// A single record without icon.
pub fn failure_items(kind: FailureKind) -> Vec<ResultItem> {
    vec![ResultItem::new(kind.title(), kind.subtitle())]
}

/// `HTTP/<version> <code> <reason> <server> <date>`
pub fn headers_summary(report: &TraceReport) -> String {
    format!(
        "HTTP/{} {} {} {} {}",
        report.status.version_number(),
        report.status.code,
        report.status.reason,
        report.server.as_deref().unwrap_or(MISSING_HEADER),
        report.date.as_deref().unwrap_or(MISSING_HEADER),
    )
}
