//! End-to-end analysis run.
//!
//! # Overview
//!
//! [`run`] chains the whole tool together, one timed phase at a time:
//!
//! 1. `load`: read the edge list (buffered or memory-mapped). In strict
//!    mode a malformed line fails the run instead of ending the input.
//! 2. `degrees`: build the out-degree table, export the degree histogram.
//! 3. `pagerank`: run the in-place power iteration, export the ranks.
//! 4. `bfs`: traverse from the configured start node (by scan or by
//!    adjacency index), export the order if a path is configured.
//!
//! A failing phase aborts the run; the error carries the phase name and the
//! underlying cause. PageRank and BFS can each be disabled in the config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, instrument};

use crate::config::{AnalysisConfig, InputConfig, TraversalStrategy};
use crate::graph::{AdjacencyIndex, DegreeTable, EdgeStore, GraphStats, NodeId};
use crate::io::export;
use crate::io::loader::{self, LoadedEdges};
use crate::metrics::histogram::DegreeHistogram;
use crate::metrics::pagerank;
use crate::metrics::traversal::{self, Traversal};
use crate::timing::{PhaseTimer, TimingReport};

/// Number of top-ranked nodes kept in the summary.
pub const SUMMARY_TOP_K: usize = 5;

// ---------------------------------------------------------------------------
// Summary types
// ---------------------------------------------------------------------------

/// What the loader read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputSummary {
    pub path: PathBuf,
    pub content_hash: String,
    pub lines_read: u64,
    pub blank_lines: u64,
    /// Description of the malformed line that ended the input, if any.
    pub stopped_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRankSummary {
    pub damping: f64,
    pub iterations: u32,
    pub skipped_edges: u64,
    pub rank_sum: f64,
    pub top: Vec<(NodeId, f64)>,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraversalSummary {
    pub start: Option<NodeId>,
    pub strategy: TraversalStrategy,
    pub visited: usize,
    pub output: Option<PathBuf>,
}

/// Everything a run produced, minus the bulky vectors (those go to files).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub input: InputSummary,
    pub stats: GraphStats,
    pub degrees_output: PathBuf,
    pub pagerank: Option<PageRankSummary>,
    pub traversal: Option<TraversalSummary>,
    pub timing: TimingReport,
}

impl RunSummary {
    /// Overall wall-clock time as `XhYmZs`.
    #[must_use]
    pub fn overall_time(&self) -> String {
        self.timing.overall()
    }
}

// ---------------------------------------------------------------------------
// Phases
// ---------------------------------------------------------------------------

/// Load `path` with the reader `input.mmap` selects.
///
/// In strict mode a malformed line is returned as an error instead of
/// ending the input.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, mapped or read, or (when
/// strict) contains a malformed line.
pub fn load_input(path: &Path, input: &InputConfig) -> Result<LoadedEdges> {
    let loaded = if input.mmap {
        loader::load_edge_list_mapped(path)?
    } else {
        loader::load_edge_list(path)?
    };
    if input.strict {
        if let Some(malformed) = &loaded.stopped_at {
            return Err(anyhow::Error::new(malformed.clone())
                .context(format!("malformed edge list {}", path.display())));
        }
    }
    Ok(loaded)
}

/// Run every enabled phase over the edge list at `input`.
///
/// # Errors
///
/// Returns the first phase failure, wrapped with the phase name: an
/// unreadable input, an invalid PageRank configuration, a BFS start node
/// outside the graph, or an output file that cannot be written.
#[instrument(skip(config))]
pub fn run(input: &Path, config: &AnalysisConfig) -> Result<RunSummary> {
    let mut timer = PhaseTimer::start();

    let loaded = timer
        .time("load", || load_input(input, &config.input))
        .context("load phase failed")?;
    let store = &loaded.store;
    info!(
        nodes = store.node_count(),
        edges = store.edge_count(),
        hash = store.content_hash(),
        "edge list loaded"
    );

    let degrees = timer
        .time("degrees", || -> Result<DegreeTable> {
            let degrees = DegreeTable::build(store)?;
            let histogram = DegreeHistogram::build(&degrees);
            export::export_degree_histogram(&config.output.degrees, &histogram)?;
            Ok(degrees)
        })
        .context("degrees phase failed")?;
    let stats = GraphStats::compute(store, &degrees);

    let pagerank = if config.pagerank.enabled {
        let summary = timer
            .time("pagerank", || -> Result<PageRankSummary> {
                let engine = &config.pagerank.engine;
                let result = pagerank::pagerank(store, &degrees, engine)?;
                export::export_ranks(&config.output.ranks, &result.ranks)?;
                Ok(PageRankSummary {
                    damping: engine.damping,
                    iterations: result.iterations,
                    skipped_edges: result.skipped_edges,
                    rank_sum: result.rank_sum(),
                    top: result.top_k(SUMMARY_TOP_K),
                    output: config.output.ranks.clone(),
                })
            })
            .context("pagerank phase failed")?;
        Some(summary)
    } else {
        None
    };

    let traversal = if config.traversal.enabled {
        let summary = timer
            .time("bfs", || -> Result<TraversalSummary> {
                let order = traverse(store, config)?;
                if let Some(path) = &config.output.bfs {
                    export::export_traversal(path, &order)?;
                }
                Ok(TraversalSummary {
                    start: order.start(),
                    strategy: config.traversal.strategy,
                    visited: order.len(),
                    output: config.output.bfs.clone(),
                })
            })
            .context("bfs phase failed")?;
        Some(summary)
    } else {
        None
    };

    let timing = timer.finish();
    info!(overall = %timing.overall(), "run complete");

    Ok(RunSummary {
        input: InputSummary {
            path: input.to_path_buf(),
            content_hash: store.content_hash().to_string(),
            lines_read: loaded.lines_read,
            blank_lines: loaded.blank_lines,
            stopped_at: loaded.stopped_at.as_ref().map(ToString::to_string),
        },
        stats,
        degrees_output: config.output.degrees.clone(),
        pagerank,
        traversal,
        timing,
    })
}

fn traverse(store: &EdgeStore, config: &AnalysisConfig) -> Result<Traversal> {
    let start = config.traversal.start;
    let order = match config.traversal.strategy {
        TraversalStrategy::Scan => traversal::bfs(store, start)?,
        TraversalStrategy::Index => {
            let index = AdjacencyIndex::build(store)?;
            traversal::bfs_indexed(&index, start)?
        }
    };
    Ok(order)
}
