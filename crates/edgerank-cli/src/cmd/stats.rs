//! `edgerank stats`: summary statistics for an edge list.

use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use edgerank_core::graph::{DegreeTable, GraphStats};
use serde::Serialize;

use crate::cmd::InputArgs;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `edgerank stats`.
#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Report payload for `edgerank stats`.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub content_hash: String,
    pub lines_read: u64,
    pub blank_lines: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<String>,
    #[serde(flatten)]
    pub stats: GraphStats,
}

/// Execute `edgerank stats`.
pub fn run_stats(args: &StatsArgs, output: OutputMode) -> Result<()> {
    let loaded = args.input.load()?;
    let degrees = DegreeTable::build(&loaded.store)?;

    let report = StatsReport {
        content_hash: loaded.store.content_hash().to_string(),
        lines_read: loaded.lines_read,
        blank_lines: loaded.blank_lines,
        stopped_at: loaded.stopped_at.as_ref().map(ToString::to_string),
        stats: GraphStats::compute(&loaded.store, &degrees),
    };

    render_mode(output, &report, render_text, render_pretty)
}

fn render_text(report: &StatsReport, w: &mut dyn Write) -> io::Result<()> {
    let s = &report.stats;
    writeln!(w, "nodes {}", s.node_count)?;
    writeln!(w, "edges {}", s.edge_count)?;
    writeln!(w, "self_loops {}", s.self_loop_count)?;
    writeln!(w, "isolated {}", s.isolated_node_count)?;
    writeln!(w, "max_out_degree {}", s.max_out_degree)?;
    writeln!(w, "mean_out_degree {:.6}", s.mean_out_degree)?;
    writeln!(w, "density {:.6e}", s.density)?;
    writeln!(w, "hash {}", report.content_hash)?;
    if let Some(stop) = &report.stopped_at {
        writeln!(w, "stopped_at {stop}")?;
    }
    Ok(())
}

fn render_pretty(report: &StatsReport, w: &mut dyn Write) -> io::Result<()> {
    let s = &report.stats;
    pretty_section(w, "Graph")?;
    pretty_kv(w, "nodes", s.node_count.to_string())?;
    pretty_kv(w, "edges", s.edge_count.to_string())?;
    pretty_kv(w, "self loops", s.self_loop_count.to_string())?;
    pretty_kv(w, "isolated nodes", s.isolated_node_count.to_string())?;
    pretty_kv(w, "max out-degree", s.max_out_degree.to_string())?;
    pretty_kv(w, "mean out-degree", format!("{:.4}", s.mean_out_degree))?;
    pretty_kv(w, "density", format!("{:.6e}", s.density))?;

    writeln!(w)?;
    pretty_section(w, "Input")?;
    pretty_kv(w, "lines read", report.lines_read.to_string())?;
    pretty_kv(w, "blank lines", report.blank_lines.to_string())?;
    pretty_kv(w, "content hash", &report.content_hash)?;
    if let Some(stop) = &report.stopped_at {
        pretty_kv(w, "stopped at", stop)?;
    }
    Ok(())
}
