//! `edgerank run`: the full analysis pipeline.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::Args;
use edgerank_core::config::{self, AnalysisConfig, TraversalStrategy};
use edgerank_core::pipeline::{self, RunSummary};
use edgerank_core::timing::format_duration;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `edgerank run`.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Edge list file. Falls back to `[input] path` from the config.
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Config file (default: ./edgerank.toml, then the user config dir).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// PageRank damping factor in [0, 1].
    #[arg(long)]
    pub damping: Option<f64>,

    /// Number of PageRank sweeps.
    #[arg(long)]
    pub iterations: Option<u32>,

    /// BFS start node.
    #[arg(long)]
    pub start: Option<u64>,

    /// Degree histogram output file.
    #[arg(long, value_name = "FILE")]
    pub degrees_out: Option<PathBuf>,

    /// Rank vector output file.
    #[arg(long, value_name = "FILE")]
    pub ranks_out: Option<PathBuf>,

    /// BFS visitation order output file.
    #[arg(long, value_name = "FILE")]
    pub bfs_out: Option<PathBuf>,

    /// Skip the PageRank phase.
    #[arg(long)]
    pub skip_pagerank: bool,

    /// Skip the BFS phase.
    #[arg(long)]
    pub skip_bfs: bool,

    /// BFS through a prebuilt adjacency index.
    #[arg(long, conflicts_with = "scan")]
    pub indexed: bool,

    /// BFS by scanning the edge list for every node.
    #[arg(long)]
    pub scan: bool,

    /// Memory-map the input.
    #[arg(long)]
    pub mmap: bool,

    /// Fail on a malformed line instead of treating it as the end of input.
    #[arg(long)]
    pub strict: bool,
}

impl RunArgs {
    /// Apply flag overrides on top of a loaded config.
    fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(input) = &self.input {
            config.input.path = Some(input.clone());
        }
        if self.mmap {
            config.input.mmap = true;
        }
        if self.strict {
            config.input.strict = true;
        }
        if let Some(damping) = self.damping {
            config.pagerank.engine.damping = damping;
        }
        if let Some(iterations) = self.iterations {
            config.pagerank.engine.iterations = iterations;
        }
        if self.skip_pagerank {
            config.pagerank.enabled = false;
        }
        if let Some(start) = self.start {
            config.traversal.start = start;
        }
        if self.skip_bfs {
            config.traversal.enabled = false;
        }
        if self.indexed {
            config.traversal.strategy = TraversalStrategy::Index;
        }
        if self.scan {
            config.traversal.strategy = TraversalStrategy::Scan;
        }
        if let Some(path) = &self.degrees_out {
            config.output.degrees.clone_from(path);
        }
        if let Some(path) = &self.ranks_out {
            config.output.ranks.clone_from(path);
        }
        if let Some(path) = &self.bfs_out {
            config.output.bfs = Some(path.clone());
        }
    }

    /// Resolve the effective config: file (if any), then flags.
    pub fn effective_config(&self) -> Result<AnalysisConfig> {
        let mut config = config::load_config(self.config.as_deref())?;
        self.apply(&mut config);
        Ok(config)
    }
}

/// Execute `edgerank run`.
pub fn run_run(args: &RunArgs, output: OutputMode) -> Result<()> {
    let config = args.effective_config()?;
    let Some(input) = config.input.path.clone() else {
        bail!("no input: pass an edge list path or set [input] path in the config");
    };

    let summary = pipeline::run(&input, &config)?;
    render_mode(output, &summary, render_text, render_pretty)
}

fn render_text(summary: &RunSummary, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "nodes {}", summary.stats.node_count)?;
    writeln!(w, "edges {}", summary.stats.edge_count)?;
    writeln!(w, "hash {}", summary.input.content_hash)?;
    if let Some(stop) = &summary.input.stopped_at {
        writeln!(w, "stopped_at {stop}")?;
    }
    writeln!(w, "degrees {}", summary.degrees_output.display())?;
    if let Some(pr) = &summary.pagerank {
        writeln!(w, "ranks {}", pr.output.display())?;
        writeln!(w, "rank_sum {}", pr.rank_sum)?;
    }
    if let Some(t) = &summary.traversal {
        writeln!(w, "visited {}", t.visited)?;
    }
    for phase in &summary.timing.phases {
        writeln!(w, "time.{} {}", phase.name, format_duration(phase.elapsed))?;
    }
    writeln!(w, "overall {}", summary.overall_time())
}

fn render_pretty(summary: &RunSummary, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("edgerank run: {}", summary.input.path.display()))?;
    pretty_kv(w, "nodes", summary.stats.node_count.to_string())?;
    pretty_kv(w, "edges", summary.stats.edge_count.to_string())?;
    pretty_kv(w, "self loops", summary.stats.self_loop_count.to_string())?;
    pretty_kv(w, "content hash", &summary.input.content_hash)?;
    if let Some(stop) = &summary.input.stopped_at {
        pretty_kv(w, "stopped at", stop)?;
    }
    pretty_kv(w, "degrees", path_str(&summary.degrees_output))?;

    if let Some(pr) = &summary.pagerank {
        writeln!(w)?;
        pretty_section(w, "PageRank")?;
        pretty_kv(w, "damping", pr.damping.to_string())?;
        pretty_kv(w, "iterations", pr.iterations.to_string())?;
        pretty_kv(w, "rank sum", format!("{:.6}", pr.rank_sum))?;
        if pr.skipped_edges > 0 {
            pretty_kv(w, "skipped edges", pr.skipped_edges.to_string())?;
        }
        for (node, rank) in &pr.top {
            writeln!(w, "  {node:>12}  {rank:.10}")?;
        }
        pretty_kv(w, "ranks", path_str(&pr.output))?;
    }

    if let Some(t) = &summary.traversal {
        writeln!(w)?;
        pretty_section(w, "BFS")?;
        let start = t.start.map_or_else(|| "-".to_string(), |s| s.to_string());
        pretty_kv(w, "start", start)?;
        pretty_kv(w, "strategy", format!("{:?}", t.strategy).to_lowercase())?;
        pretty_kv(w, "visited", t.visited.to_string())?;
        if let Some(path) = &t.output {
            pretty_kv(w, "order", path_str(path))?;
        }
    }

    writeln!(w)?;
    pretty_section(w, "Timing")?;
    for phase in &summary.timing.phases {
        pretty_kv(w, &phase.name, format_duration(phase.elapsed))?;
    }
    pretty_kv(w, "overall", summary.overall_time())
}

fn path_str(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = RunArgs {
            input: Some(PathBuf::from("g.txt")),
            damping: Some(0.3),
            iterations: Some(7),
            start: Some(4),
            scan: true,
            skip_pagerank: true,
            bfs_out: Some(PathBuf::from("order.txt")),
            ..RunArgs::default()
        };
        let mut config = AnalysisConfig::default();
        args.apply(&mut config);

        assert_eq!(config.input.path, Some(PathBuf::from("g.txt")));
        assert!((config.pagerank.engine.damping - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.pagerank.engine.iterations, 7);
        assert!(!config.pagerank.enabled);
        assert!(config.traversal.enabled);
        assert_eq!(config.traversal.start, 4);
        assert_eq!(config.traversal.strategy, TraversalStrategy::Scan);
        assert_eq!(config.output.bfs, Some(PathBuf::from("order.txt")));
        assert_eq!(config.output.ranks, PathBuf::from("proba.txt"));
    }

    #[test]
    fn unset_flags_keep_config_values() {
        let mut config = AnalysisConfig::default();
        config.traversal.strategy = TraversalStrategy::Scan;
        config.input.mmap = true;
        RunArgs::default().apply(&mut config);
        assert_eq!(config.traversal.strategy, TraversalStrategy::Scan);
        assert!(config.input.mmap);
        assert_eq!(config.input.path, None);
    }
}
