//! `edgerank degrees`: out-degree histogram.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use edgerank_core::graph::DegreeTable;
use edgerank_core::io::export;
use edgerank_core::metrics::histogram::DegreeHistogram;
use serde::Serialize;

use crate::cmd::InputArgs;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `edgerank degrees`.
#[derive(Args, Debug)]
pub struct DegreesArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write the histogram here instead of printing it.
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

/// Report payload for `edgerank degrees`.
#[derive(Debug, Serialize)]
pub struct DegreesReport {
    pub nodes: u64,
    pub max_degree: Option<u64>,
    /// `counts[d]` = nodes with out-degree `d`.
    pub counts: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

/// Execute `edgerank degrees`.
pub fn run_degrees(args: &DegreesArgs, output: OutputMode) -> Result<()> {
    let loaded = args.input.load()?;
    let degrees = DegreeTable::build(&loaded.store)?;
    let histogram = DegreeHistogram::build(&degrees);

    if let Some(path) = &args.out {
        export::export_degree_histogram(path, &histogram)?;
    }

    let report = DegreesReport {
        nodes: degrees.node_count(),
        max_degree: histogram.max_degree(),
        counts: histogram.counts().to_vec(),
        output: args.out.clone(),
    };

    render_mode(output, &report, render_text, render_pretty)
}

/// Same `"<degree> <count>"` lines as the exported file.
fn render_text(report: &DegreesReport, w: &mut dyn Write) -> io::Result<()> {
    if report.output.is_some() {
        return writeln!(w, "nodes {}", report.nodes);
    }
    for (degree, count) in report.counts.iter().enumerate() {
        writeln!(w, "{degree} {count}")?;
    }
    Ok(())
}

fn render_pretty(report: &DegreesReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Out-degree histogram")?;
    pretty_kv(w, "nodes", report.nodes.to_string())?;
    let max = report
        .max_degree
        .map_or_else(|| "-".to_string(), |d| d.to_string());
    pretty_kv(w, "max degree", max)?;
    if let Some(path) = &report.output {
        return pretty_kv(w, "written to", path.display().to_string());
    }

    writeln!(w)?;
    writeln!(w, "{:>10}  {:>12}", "degree", "nodes")?;
    for (degree, count) in report.counts.iter().enumerate() {
        if *count > 0 {
            writeln!(w, "{degree:>10}  {count:>12}")?;
        }
    }
    Ok(())
}
