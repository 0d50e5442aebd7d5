//! Basic statistics for a loaded edge list.
//!
//! # Statistics Provided
//!
//! - **node_count** / **edge_count**: as reported by the [`EdgeStore`].
//! - **self_loop_count**: edges whose endpoints coincide. The store keeps
//!   them; this count tells the caller whether the input was pre-cleaned.
//! - **isolated_node_count**: ids below `node_count` that no edge touches.
//! - **max_out_degree** / **mean_out_degree**: from the [`DegreeTable`].
//! - **density**: `edge_count / (node_count * (node_count - 1))`, the
//!   directed-graph ratio. Zero for graphs with fewer than 2 nodes.

use fixedbitset::FixedBitSet;
use serde::Serialize;

use crate::graph::degree::DegreeTable;
use crate::graph::slot;
use crate::graph::store::EdgeStore;

/// Summary statistics for an edge list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: u64,
    pub edge_count: usize,
    pub self_loop_count: usize,
    /// Ids with no incident edge in either direction.
    pub isolated_node_count: u64,
    pub max_out_degree: u64,
    pub mean_out_degree: f64,
    pub density: f64,
}

impl GraphStats {
    /// Compute statistics from a store and its degree table.
    #[must_use]
    pub fn compute(store: &EdgeStore, degrees: &DegreeTable) -> Self {
        let node_count = store.node_count();
        let edge_count = store.edge_count();

        let mut touched = FixedBitSet::with_capacity(slot(node_count));
        let mut self_loop_count = 0_usize;
        for edge in store.iter_edges() {
            touched.insert(slot(edge.source));
            touched.insert(slot(edge.target));
            if edge.is_self_loop() {
                self_loop_count += 1;
            }
        }
        let isolated_node_count = node_count - touched.count_ones(..) as u64;

        Self {
            node_count,
            edge_count,
            self_loop_count,
            isolated_node_count,
            max_out_degree: degrees.max_degree().unwrap_or(0),
            mean_out_degree: compute_mean(degrees.total(), node_count),
            density: compute_density(node_count, edge_count),
        }
    }

    /// Return `true` if the store has no edges.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.edge_count == 0
    }

    /// Return `true` if the input still contains self-loops.
    #[must_use]
    pub const fn has_self_loops(&self) -> bool {
        self.self_loop_count > 0
    }
}

#[allow(clippy::cast_precision_loss)]
fn compute_mean(total: u64, node_count: u64) -> f64 {
    if node_count == 0 {
        return 0.0;
    }
    total as f64 / node_count as f64
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: u64, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let n = node_count as f64;
    edge_count as f64 / (n * (n - 1.0))
}
