//! Result sinks.
//!
//! The tracer hands its ordered result records to a [`ResultSink`] exactly
//! once per invocation. The binary picks [`JsonSink`] or [`TextSink`];
//! [`VecSink`] keeps the records in memory.

use serde::Serialize;
use std::io::{self, Write};

/// Path to a display icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Icon {
    pub path: String,
}

/// One labelled result record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultItem {
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
}

impl ResultItem {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, path: impl Into<String>) -> Self {
        self.icon = Some(Icon { path: path.into() });
        self
    }
}

/// Publish interface provided by the invoking environment.
pub trait ResultSink {
    fn publish(&mut self, items: &[ResultItem]) -> io::Result<()>;
}

#[derive(Serialize)]
struct ItemList<'a> {
    items: &'a [ResultItem],
}

/// Hands a fully rendered batch to `out` in one write.
///
/// With `io::Stdout` this takes the stdout lock only for the write itself.
fn write_batch<W: Write>(out: &mut W, rendered: &[u8]) -> io::Result<()> {
    out.write_all(rendered)?;
    out.flush()
}

/// Writes `{"items": [...]}`, the script-filter format launchers read.
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultSink for JsonSink<W> {
    fn publish(&mut self, items: &[ResultItem]) -> io::Result<()> {
        let mut rendered = serde_json::to_vec(&ItemList { items })?;
        rendered.push(b'\n');
        write_batch(&mut self.out, &rendered)
    }
}

/// Writes one aligned `title  subtitle` line per record.
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultSink for TextSink<W> {
    fn publish(&mut self, items: &[ResultItem]) -> io::Result<()> {
        let width = items.iter().map(|i| i.title.len()).max().unwrap_or(0);
        let mut rendered = Vec::new();
        for item in items {
            writeln!(rendered, "{:<width$}  {}", item.title, item.subtitle, width = width)?;
        }
        write_batch(&mut self.out, &rendered)
    }
}

/// Collects every published batch in memory.
#[derive(Debug, Default)]
pub struct VecSink {
    pub batches: Vec<Vec<ResultItem>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently published batch.
    pub fn last(&self) -> Option<&[ResultItem]> {
        self.batches.last().map(Vec::as_slice)
    }
}

impl ResultSink for VecSink {
    fn publish(&mut self, items: &[ResultItem]) -> io::Result<()> {
        self.batches.push(items.to_vec());
        Ok(())
    }
}
