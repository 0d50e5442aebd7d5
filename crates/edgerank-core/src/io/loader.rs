//! Edge-list loader.
//!
//! # Format
//!
//! ```text
//! <source> <target>
//! ```
//!
//! One edge per line, two non-negative integers separated by any ASCII
//! whitespace. No header, no comments, no edge count.
//!
//! - Blank (whitespace-only) lines are skipped.
//! - The first line that is not exactly two ids in `0..=MAX_NODE_ID` ends
//!   the input.
//!   Everything read up to that point is kept; the offending line is
//!   reported in [`LoadedEdges::stopped_at`] and logged, but loading does
//!   not fail. This tolerates trailing garbage and truncated last lines.
//!
//! Storage grows as edges are discovered; no capacity is fixed up front.
//!
//! # Entry points
//!
//! - [`read_edge_list`] reads any [`BufRead`].
//! - [`load_edge_list`] opens a path with a buffered reader.
//! - [`load_edge_list_mapped`] memory-maps the file, which avoids copying
//!   multi-gigabyte inputs through a read buffer.
//!
//! All three go through [`parse_edge_line`].

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use memmap2::Mmap;
use tracing::{debug, instrument, warn};

use crate::graph::store::{Edge, EdgeStore, MAX_NODE_ID};

/// Emit a progress event every this many edges.
const PROGRESS_EVERY: usize = 10_000_000;

/// Longest prefix of a malformed line kept for reporting.
const MAX_REPORTED_LINE: usize = 120;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why a single line is not an edge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineFault {
    /// The line is not valid UTF-8.
    #[error("line is not valid UTF-8")]
    Encoding,
    /// The line does not have exactly two fields.
    #[error("expected 2 whitespace-separated fields, found {0}")]
    FieldCount(usize),
    /// A field is not a non-negative integer that fits in 64 bits.
    #[error("invalid node id '{0}'")]
    InvalidNodeId(String),
    /// The id parses but is above [`MAX_NODE_ID`].
    #[error("node id {0} exceeds the largest supported id {MAX_NODE_ID}")]
    NodeIdTooLarge(u64),
}

/// A malformed input line, which ends the edge stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {fault}")]
pub struct MalformedLine {
    /// 1-based line number.
    pub line: u64,
    pub fault: LineFault,
    /// The offending line, lossily decoded and truncated.
    pub content: String,
}

// ---------------------------------------------------------------------------
// Line parser
// ---------------------------------------------------------------------------

/// Parse one line of an edge list.
///
/// Returns `Ok(None)` for blank lines, `Ok(Some(edge))` for a valid edge.
///
/// # Errors
///
/// Returns a [`LineFault`] when the line is not exactly two `u64` values.
pub fn parse_edge_line(line: &[u8]) -> Result<Option<Edge>, LineFault> {
    let text = std::str::from_utf8(line).map_err(|_| LineFault::Encoding)?;
    let mut fields = text.split_ascii_whitespace();

    let Some(first) = fields.next() else {
        return Ok(None);
    };
    let Some(second) = fields.next() else {
        return Err(LineFault::FieldCount(1));
    };
    let extra = fields.count();
    if extra > 0 {
        return Err(LineFault::FieldCount(2 + extra));
    }

    Ok(Some(Edge::new(parse_node_id(first)?, parse_node_id(second)?)))
}

fn parse_node_id(field: &str) -> Result<u64, LineFault> {
    // `u64::from_str` accepts a leading '+', which a bare digit run never has.
    if !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LineFault::InvalidNodeId(field.to_string()));
    }
    let id = field
        .parse::<u64>()
        .map_err(|_| LineFault::InvalidNodeId(field.to_string()))?;
    if id > MAX_NODE_ID {
        return Err(LineFault::NodeIdTooLarge(id));
    }
    Ok(id)
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Edges read from an input plus bookkeeping about the read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedEdges {
    pub store: EdgeStore,
    /// Lines consumed, including blank lines and the stopping line.
    pub lines_read: u64,
    pub blank_lines: u64,
    /// The malformed line that ended the stream, if any.
    pub stopped_at: Option<MalformedLine>,
}

impl LoadedEdges {
    /// Return `true` if the whole input parsed as edges.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.stopped_at.is_none()
    }
}

/// Accumulates edges line by line until the first malformed line.
#[derive(Debug, Default)]
struct EdgeCollector {
    edges: Vec<Edge>,
    lines_read: u64,
    blank_lines: u64,
    stopped_at: Option<MalformedLine>,
}

impl EdgeCollector {
    /// Feed one line (without its terminator). Returns `false` once the
    /// stream has ended.
    fn push_line(&mut self, line: &[u8]) -> bool {
        self.lines_read += 1;
        match parse_edge_line(line) {
            Ok(Some(edge)) => {
                self.edges.push(edge);
                if self.edges.len() % PROGRESS_EVERY == 0 {
                    debug!(edges = self.edges.len(), "loading edge list");
                }
                true
            }
            Ok(None) => {
                self.blank_lines += 1;
                true
            }
            Err(fault) => {
                let shown = &line[..line.len().min(MAX_REPORTED_LINE)];
                let malformed = MalformedLine {
                    line: self.lines_read,
                    fault,
                    content: String::from_utf8_lossy(shown).into_owned(),
                };
                warn!(%malformed, "edge list ends at malformed line");
                self.stopped_at = Some(malformed);
                false
            }
        }
    }

    fn finish(self) -> LoadedEdges {
        let store = EdgeStore::from_edges(self.edges);
        debug!(
            edges = store.edge_count(),
            nodes = store.node_count(),
            lines = self.lines_read,
            "edge list loaded"
        );
        LoadedEdges {
            store,
            lines_read: self.lines_read,
            blank_lines: self.blank_lines,
            stopped_at: self.stopped_at,
        }
    }
}

/// Read an edge list from any buffered reader.
///
/// # Errors
///
/// Returns an error only for I/O failures. Malformed content ends the
/// stream and is reported in [`LoadedEdges::stopped_at`].
pub fn read_edge_list<R: BufRead>(mut reader: R) -> Result<LoadedEdges> {
    let mut collector = EdgeCollector::default();
    let mut buf = Vec::with_capacity(64);

    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .context("read edge list line")?;
        if n == 0 {
            break;
        }
        let line = buf.strip_suffix(b"\n").unwrap_or(&buf);
        if !collector.push_line(line) {
            break;
        }
    }

    Ok(collector.finish())
}

/// Open `path` and read it with a buffered reader.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
#[instrument]
pub fn load_edge_list(path: &Path) -> Result<LoadedEdges> {
    let file = File::open(path).with_context(|| format!("open edge list {}", path.display()))?;
    read_edge_list(BufReader::with_capacity(1 << 20, file))
        .with_context(|| format!("read edge list {}", path.display()))
}

/// Memory-map `path` and parse it in place.
///
/// Same semantics as [`load_edge_list`].
///
/// # Errors
///
/// Returns an error if the file cannot be opened or mapped.
#[instrument]
pub fn load_edge_list_mapped(path: &Path) -> Result<LoadedEdges> {
    let file = File::open(path).with_context(|| format!("open edge list {}", path.display()))?;
    if file.metadata().map(|m| m.len()).unwrap_or(0) == 0 {
        // Zero-length files cannot be mapped on every platform.
        return Ok(EdgeCollector::default().finish());
    }

    // Safety: the file is opened read-only and is not expected to change
    // while it is being parsed.
    #[allow(unsafe_code)]
    let mmap = unsafe {
        Mmap::map(&file).with_context(|| format!("mmap edge list {}", path.display()))?
    };

    let mut collector = EdgeCollector::default();
    let mut lines = mmap.split(|&b| b == b'\n').peekable();
    while let Some(line) = lines.next() {
        // A trailing newline leaves one empty segment, not a line.
        if line.is_empty() && lines.peek().is_none() {
            break;
        }
        if !collector.push_line(line) {
            break;
        }
    }

    Ok(collector.finish())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
