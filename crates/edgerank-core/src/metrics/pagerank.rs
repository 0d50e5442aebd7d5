//! In-place, edge-order PageRank power iteration.
//!
//! # Overview
//!
//! The rank vector starts uniform (`1 / node_count`) and is swept a fixed
//! number of times. Each sweep walks the edges in store order and, for every
//! edge `(s, t)`, rewrites the destination entry in place:
//!
//! ```text
//! rank[t] = rank[t] * (1 - d) / out_degree(s) + d / edge_count
//! ```
//!
//! where `d` is the damping factor (default 0.15).
//!
//! This is **not** the textbook "build a fresh vector, then swap" PageRank.
//! A destination hit by several edges in one sweep is rewritten several
//! times, each rewrite starting from the value left by the previous one, so
//! the result depends on edge order. The vector is never renormalized and
//! its sum drifts away from 1; [`PageRankResult::rank_sum`] reports it.
//!
//! # Zero out-degree sources
//!
//! A table built with [`DegreeTable::build`] from the same store gives every
//! edge source a degree of at least 1. A caller-supplied table may not, and
//! the update would then divide by zero. [`ZeroDegreePolicy`] decides what
//! happens: `Skip` (default) leaves `rank[t]` untouched for that edge and
//! counts it, `Reject` fails before the first sweep.
//!
//! # Termination
//!
//! Exactly `iterations` sweeps; there is no convergence test.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::GraphError;
use crate::graph::degree::DegreeTable;
use crate::graph::store::EdgeStore;
use crate::graph::{NodeId, dense_slots, slot};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What to do with an edge whose source has recorded out-degree 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroDegreePolicy {
    /// Leave the destination untouched for that edge and keep sweeping.
    #[default]
    Skip,
    /// Refuse to run and report the first offending source.
    Reject,
}

/// Configuration for a PageRank run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRankConfig {
    /// Teleport weight `d` in the update rule. Must lie in `[0, 1]`.
    /// Default: 0.15.
    #[serde(default = "default_damping")]
    pub damping: f64,
    /// Number of sweeps over the edge list.
    /// Default: 100.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Policy for zero out-degree sources.
    /// Default: skip.
    #[serde(default)]
    pub zero_degree: ZeroDegreePolicy,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            iterations: default_iterations(),
            zero_degree: ZeroDegreePolicy::default(),
        }
    }
}

const fn default_damping() -> f64 {
    0.15
}

const fn default_iterations() -> u32 {
    100
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Result of a PageRank run.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRankResult {
    /// Final rank per node id, length `node_count`.
    pub ranks: Vec<f64>,
    /// Number of sweeps performed.
    pub iterations: u32,
    /// Edge updates skipped under [`ZeroDegreePolicy::Skip`], summed over
    /// all sweeps.
    pub skipped_edges: u64,
}

impl PageRankResult {
    /// Rank of `node`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if `node` has no entry.
    pub fn rank(&self, node: NodeId) -> Result<f64, GraphError> {
        usize::try_from(node)
            .ok()
            .and_then(|i| self.ranks.get(i))
            .copied()
            .ok_or(GraphError::OutOfRange {
                node,
                node_count: self.ranks.len() as u64,
            })
    }

    /// Sum of all ranks. Not normalized by the algorithm.
    #[must_use]
    pub fn rank_sum(&self) -> f64 {
        self.ranks.iter().sum()
    }

    /// The `k` highest-ranked nodes, best first. Ties go to the lower id.
    #[must_use]
    pub fn top_k(&self, k: usize) -> Vec<(NodeId, f64)> {
        let mut ranked: Vec<(NodeId, f64)> = self
            .ranks
            .iter()
            .enumerate()
            .map(|(i, &r)| (i as NodeId, r))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(k);
        ranked
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

// ---------------------------------------------------------------------------
// PageRank
// ---------------------------------------------------------------------------

/// The uniform starting vector, `1 / node_count` per node.
///
/// # Errors
///
/// Returns [`GraphError::TooLarge`] if the vector cannot be allocated.
#[allow(clippy::cast_precision_loss)]
pub fn uniform_ranks(node_count: u64) -> Result<Vec<f64>, GraphError> {
    if node_count == 0 {
        return Ok(Vec::new());
    }
    dense_slots(node_count, 1.0 / node_count as f64)
}

/// Run `config.iterations` in-place sweeps over `store`.
///
/// The store and degree table are only read, so the same pair can serve any
/// number of runs. Two runs over the same store (same edge order) with the
/// same configuration return bit-identical vectors.
///
/// # Errors
///
/// - [`GraphError::InvalidDamping`] if `damping` is not a finite value in
///   `[0, 1]`.
/// - [`GraphError::DegreeTableMismatch`] if `degrees` covers a different
///   node count than `store`.
/// - [`GraphError::DivisionHazard`] under [`ZeroDegreePolicy::Reject`] when
///   some edge source has degree 0.
/// - [`GraphError::TooLarge`] if the rank vector cannot be allocated.
#[instrument(skip(store, degrees, config), fields(
    nodes = store.node_count(),
    edges = store.edge_count(),
    damping = config.damping,
    iterations = config.iterations,
))]
pub fn pagerank(
    store: &EdgeStore,
    degrees: &DegreeTable,
    config: &PageRankConfig,
) -> Result<PageRankResult, GraphError> {
    if !(0.0..=1.0).contains(&config.damping) {
        return Err(GraphError::InvalidDamping(config.damping));
    }
    if degrees.node_count() != store.node_count() {
        return Err(GraphError::DegreeTableMismatch {
            expected: store.node_count(),
            found: degrees.node_count(),
        });
    }

    let mut ranks = uniform_ranks(store.node_count())?;
    if ranks.is_empty() {
        return Ok(PageRankResult {
            ranks,
            iterations: 0,
            skipped_edges: 0,
        });
    }

    if config.zero_degree == ZeroDegreePolicy::Reject {
        if let Some(node) = first_zero_degree_source(store, degrees) {
            return Err(GraphError::DivisionHazard { node });
        }
    }

    let mut skipped_edges = 0_u64;
    for iteration in 0..config.iterations {
        skipped_edges += sweep(&mut ranks, store, degrees, config.damping);
        if iteration % 10 == 0 {
            debug!(iteration, "pagerank sweep complete");
        }
    }

    if skipped_edges > 0 {
        warn!(
            skipped_edges,
            "pagerank skipped edges whose source has zero recorded out-degree"
        );
    }

    Ok(PageRankResult {
        ranks,
        iterations: config.iterations,
        skipped_edges,
    })
}

/// One in-place pass over every edge. Returns the number of skipped edges.
///
/// `ranks` and `degrees` must both have `store.node_count()` entries.
#[allow(clippy::cast_precision_loss)]
fn sweep(ranks: &mut [f64], store: &EdgeStore, degrees: &DegreeTable, damping: f64) -> u64 {
    let keep = 1.0 - damping;
    let teleport = damping / store.edge_count() as f64;
    let degree = degrees.as_slice();

    let mut skipped = 0_u64;
    for edge in store.iter_edges() {
        let out_degree = degree[slot(edge.source)];
        if out_degree == 0 {
            skipped += 1;
            continue;
        }
        let t = slot(edge.target);
        ranks[t] *= keep / out_degree as f64;
        ranks[t] += teleport;
    }
    skipped
}

fn first_zero_degree_source(store: &EdgeStore, degrees: &DegreeTable) -> Option<NodeId> {
    let degree = degrees.as_slice();
    store
        .iter_edges()
        .find(|edge| degree[slot(edge.source)] == 0)
        .map(|edge| edge.source)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn run(pairs: &[(u64, u64)], config: &PageRankConfig) -> PageRankResult {
        let store = EdgeStore::from_pairs(pairs);
        let degrees = DegreeTable::build(&store).expect("degree table");
        pagerank(&store, &degrees, config).expect("pagerank should succeed")
    }

    fn with_iterations(iterations: u32) -> PageRankConfig {
        PageRankConfig {
            iterations,
            ..PageRankConfig::default()
        }
    }

    #[test]
    fn defaults_match_reference_run() {
        let config = PageRankConfig::default();
        assert!((config.damping - 0.15).abs() < f64::EPSILON);
        assert_eq!(config.iterations, 100);
        assert_eq!(config.zero_degree, ZeroDegreePolicy::Skip);
    }

    #[test]
    fn empty_store_is_a_noop() {
        let result = run(&[], &PageRankConfig::default());
        assert!(result.is_empty());
        assert_eq!(result.iterations, 0);
        assert_eq!(result.skipped_edges, 0);
    }

    #[test]
    fn zero_iterations_returns_uniform_vector() {
        let result = run(&[(0, 1), (1, 2), (2, 3)], &with_iterations(0));
        assert_eq!(result.ranks, vec![0.25; 4]);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn triangle_single_sweep_applies_updates_in_edge_order() {
        let result = run(&[(0, 1), (1, 2), (2, 0)], &with_iterations(1));

        let keep = 1.0 - 0.15;
        let teleport = 0.15 / 3.0;
        let mut expected = [1.0 / 3.0; 3];
        for t in [1, 2, 0] {
            expected[t] *= keep / 1.0;
            expected[t] += teleport;
        }
        assert_eq!(result.ranks, expected.to_vec());
    }

    #[test]
    fn repeated_destination_compounds_within_one_sweep() {
        // Both edges hit node 2; the second update starts from the first.
        let result = run(&[(0, 2), (1, 2)], &with_iterations(1));

        let keep = 1.0 - 0.15;
        let teleport = 0.15 / 2.0;
        let mut r2 = 1.0 / 3.0;
        r2 = r2 * (keep / 1.0) + teleport;
        r2 = r2 * (keep / 1.0) + teleport;

        assert!((result.ranks[2] - r2).abs() < 1e-15);
        // Sources are never written.
        assert!((result.ranks[0] - 1.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn invalid_damping_is_rejected() {
        let store = EdgeStore::from_pairs(&[(0, 1)]);
        let degrees = DegreeTable::build(&store).expect("degree table");
        for damping in [-0.1, 1.5, f64::NAN] {
            let config = PageRankConfig {
                damping,
                ..PageRankConfig::default()
            };
            let err = pagerank(&store, &degrees, &config).expect_err("should fail");
            assert!(matches!(err, GraphError::InvalidDamping(_)));
        }
    }

    #[test]
    fn mismatched_degree_table_is_rejected() {
        let store = EdgeStore::from_pairs(&[(0, 1), (1, 2)]);
        let degrees = DegreeTable::from_counts(vec![1, 1]);
        let err = pagerank(&store, &degrees, &PageRankConfig::default()).expect_err("mismatch");
        assert_eq!(
            err,
            GraphError::DegreeTableMismatch {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn zero_degree_sources_are_skipped_by_default() {
        let store = EdgeStore::from_pairs(&[(0, 1), (1, 0)]);
        // Node 1 claims no out-edges.
        let degrees = DegreeTable::from_counts(vec![1, 0]);
        let result =
            pagerank(&store, &degrees, &with_iterations(3)).expect("skip policy should succeed");

        assert_eq!(result.skipped_edges, 3);
        assert!(result.ranks.iter().all(|r| r.is_finite()));
        // Node 0 is only reached through the skipped edge.
        assert!((result.ranks[0] - 0.5).abs() < 1e-15);
    }

    #[test]
    fn zero_degree_sources_fail_under_reject() {
        let store = EdgeStore::from_pairs(&[(0, 1), (1, 0)]);
        let degrees = DegreeTable::from_counts(vec![1, 0]);
        let config = PageRankConfig {
            zero_degree: ZeroDegreePolicy::Reject,
            ..PageRankConfig::default()
        };
        let err = pagerank(&store, &degrees, &config).expect_err("reject policy");
        assert_eq!(err, GraphError::DivisionHazard { node: 1 });
    }

    #[test]
    fn rank_lookup_and_top_k() {
        let result = PageRankResult {
            ranks: vec![0.1, 0.4, 0.4, 0.05],
            iterations: 1,
            skipped_edges: 0,
        };
        assert_eq!(result.rank(1), Ok(0.4));
        assert!(result.rank(4).is_err());
        assert_eq!(result.top_k(3), vec![(1, 0.4), (2, 0.4), (0, 0.1)]);
        assert!((result.rank_sum() - 0.95).abs() < 1e-12);
    }
}
