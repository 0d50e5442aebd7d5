//! `edgerank pagerank`: rank vector only.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use edgerank_core::graph::{DegreeTable, NodeId};
use edgerank_core::io::export;
use edgerank_core::metrics::pagerank::{PageRankConfig, ZeroDegreePolicy, pagerank};
use serde::Serialize;

use crate::cmd::InputArgs;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `edgerank pagerank`.
#[derive(Args, Debug)]
pub struct PagerankArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Damping factor in [0, 1].
    #[arg(long, default_value_t = 0.15)]
    pub damping: f64,

    /// Number of sweeps over the edge list.
    #[arg(long, default_value_t = 100)]
    pub iterations: u32,

    /// Fail instead of skipping edges whose source has out-degree 0.
    #[arg(long)]
    pub reject_zero_degree: bool,

    /// Write the full rank vector here (50 decimals per line).
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Number of top-ranked nodes to show.
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

/// Report payload for `edgerank pagerank`.
#[derive(Debug, Serialize)]
pub struct PagerankReport {
    pub nodes: u64,
    pub edges: usize,
    pub damping: f64,
    pub iterations: u32,
    pub skipped_edges: u64,
    pub rank_sum: f64,
    pub top: Vec<RankedNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct RankedNode {
    pub node: NodeId,
    pub rank: f64,
}

/// Execute `edgerank pagerank`.
pub fn run_pagerank(args: &PagerankArgs, output: OutputMode) -> Result<()> {
    let loaded = args.input.load()?;
    let store = &loaded.store;
    let degrees = DegreeTable::build(store)?;

    let config = PageRankConfig {
        damping: args.damping,
        iterations: args.iterations,
        zero_degree: if args.reject_zero_degree {
            ZeroDegreePolicy::Reject
        } else {
            ZeroDegreePolicy::Skip
        },
    };
    let result = pagerank(store, &degrees, &config)?;

    if let Some(path) = &args.out {
        export::export_ranks(path, &result.ranks)?;
    }

    let report = PagerankReport {
        nodes: store.node_count(),
        edges: store.edge_count(),
        damping: config.damping,
        iterations: result.iterations,
        skipped_edges: result.skipped_edges,
        rank_sum: result.rank_sum(),
        top: result
            .top_k(args.top)
            .into_iter()
            .map(|(node, rank)| RankedNode { node, rank })
            .collect(),
        output: args.out.clone(),
    };

    render_mode(output, &report, render_text, render_pretty)
}

fn render_text(report: &PagerankReport, w: &mut dyn Write) -> io::Result<()> {
    for ranked in &report.top {
        writeln!(w, "{} {:.prec$}", ranked.node, ranked.rank, prec = export::RANK_DECIMALS)?;
    }
    Ok(())
}

fn render_pretty(report: &PagerankReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "PageRank")?;
    pretty_kv(w, "nodes", report.nodes.to_string())?;
    pretty_kv(w, "edges", report.edges.to_string())?;
    pretty_kv(w, "damping", report.damping.to_string())?;
    pretty_kv(w, "iterations", report.iterations.to_string())?;
    pretty_kv(w, "rank sum", format!("{:.6}", report.rank_sum))?;
    if report.skipped_edges > 0 {
        pretty_kv(w, "skipped edges", report.skipped_edges.to_string())?;
    }
    if let Some(path) = &report.output {
        pretty_kv(w, "written to", path.display().to_string())?;
    }

    writeln!(w)?;
    writeln!(w, "{:>6}  {:>12}  rank", "#", "node")?;
    for (i, ranked) in report.top.iter().enumerate() {
        writeln!(w, "{:>6}  {:>12}  {:.10}", i + 1, ranked.node, ranked.rank)?;
    }
    Ok(())
}
