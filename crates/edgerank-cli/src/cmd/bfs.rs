//! `edgerank bfs`: breadth-first visitation order.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use edgerank_core::graph::{AdjacencyIndex, NodeId};
use edgerank_core::io::export;
use edgerank_core::metrics::traversal::{bfs, bfs_indexed};
use serde::Serialize;

use crate::cmd::InputArgs;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `edgerank bfs`.
#[derive(Args, Debug)]
pub struct BfsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Start node.
    #[arg(long, default_value_t = 0)]
    pub start: NodeId,

    /// Scan the edge list for neighbors instead of building an index.
    #[arg(long)]
    pub scan: bool,

    /// Write the visitation order here instead of printing it.
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

/// Report payload for `edgerank bfs`.
#[derive(Debug, Serialize)]
pub struct BfsReport {
    pub start: Option<NodeId>,
    pub visited: usize,
    /// Omitted when the order went to a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<NodeId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

/// Execute `edgerank bfs`.
pub fn run_bfs(args: &BfsArgs, output: OutputMode) -> Result<()> {
    let loaded = args.input.load()?;
    let store = &loaded.store;

    let traversal = if args.scan {
        bfs(store, args.start)?
    } else {
        bfs_indexed(&AdjacencyIndex::build(store)?, args.start)?
    };

    if let Some(path) = &args.out {
        export::export_traversal(path, &traversal)?;
    }

    let report = BfsReport {
        start: traversal.start(),
        visited: traversal.len(),
        order: args.out.is_none().then(|| traversal.into_order()),
        output: args.out.clone(),
    };

    render_mode(output, &report, render_text, render_pretty)
}

fn render_text(report: &BfsReport, w: &mut dyn Write) -> io::Result<()> {
    match &report.order {
        Some(order) => {
            for node in order {
                writeln!(w, "{node}")?;
            }
            Ok(())
        }
        None => writeln!(w, "visited {}", report.visited),
    }
}

fn render_pretty(report: &BfsReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "BFS")?;
    let start = report
        .start
        .map_or_else(|| "- (empty graph)".to_string(), |s| s.to_string());
    pretty_kv(w, "start", start)?;
    pretty_kv(w, "visited", report.visited.to_string())?;
    if let Some(path) = &report.output {
        pretty_kv(w, "written to", path.display().to_string())?;
    }
    if let Some(order) = &report.order {
        for node in order {
            writeln!(w, "Visited {node}")?;
        }
    }
    Ok(())
}
