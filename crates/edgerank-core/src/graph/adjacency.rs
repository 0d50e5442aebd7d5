//! Undirected CSR adjacency index.
//!
//! The edge-list BFS enumerates neighbors with a full scan of the store,
//! which is O(edges) per visited node. For graphs beyond a few million edges
//! build an [`AdjacencyIndex`] once (two passes over the edges) and traverse
//! with [`crate::metrics::traversal::bfs_indexed`] instead.
//!
//! Each node's neighbor run lists the opposite endpoint of every incident
//! edge in store order, so the indexed BFS visits nodes in exactly the same
//! order as the scanning BFS. Duplicate edges appear as repeated entries; a
//! self-loop contributes one entry.

use crate::error::GraphError;
use crate::graph::store::EdgeStore;
use crate::graph::{NodeId, dense_slots, slot};

/// Compressed sparse row adjacency over the undirected view of a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyIndex {
    /// `offsets[v]..offsets[v + 1]` is the run of `v` in `targets`.
    /// Length = `node_count + 1`.
    offsets: Vec<usize>,
    targets: Vec<NodeId>,
}

impl AdjacencyIndex {
    /// Build the index with a counting pass and a fill pass.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::TooLarge`] if the per-node offsets cannot be
    /// allocated.
    pub fn build(store: &EdgeStore) -> Result<Self, GraphError> {
        // Pass 1: incident-edge counts per node.
        let mut counts = dense_slots(store.node_count(), 0_usize)?;
        let n = counts.len();
        for edge in store.iter_edges() {
            counts[slot(edge.source)] += 1;
            if !edge.is_self_loop() {
                counts[slot(edge.target)] += 1;
            }
        }

        let mut offsets = Vec::new();
        offsets
            .try_reserve_exact(n + 1)
            .map_err(|_| GraphError::TooLarge {
                nodes: store.node_count(),
            })?;
        let mut running = 0_usize;
        offsets.push(0);
        for count in counts {
            running += count;
            offsets.push(running);
        }

        // Pass 2: write opposite endpoints through per-node cursors.
        let mut targets = vec![0; running];
        let mut cursors = offsets.clone();
        for edge in store.iter_edges() {
            let s = slot(edge.source);
            targets[cursors[s]] = edge.target;
            cursors[s] += 1;
            if !edge.is_self_loop() {
                let t = slot(edge.target);
                targets[cursors[t]] = edge.source;
                cursors[t] += 1;
            }
        }

        Ok(Self { offsets, targets })
    }

    /// Neighbors of `node`, in store order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if `node >= node_count()`.
    pub fn neighbors(&self, node: NodeId) -> Result<&[NodeId], GraphError> {
        if node >= self.node_count() {
            return Err(GraphError::OutOfRange {
                node,
                node_count: self.node_count(),
            });
        }
        let v = slot(node);
        Ok(&self.targets[self.offsets[v]..self.offsets[v + 1]])
    }

    #[must_use]
    pub fn node_count(&self) -> u64 {
        (self.offsets.len() - 1) as u64
    }

    /// Number of neighbor entries (twice the non-loop edge count plus loops).
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.targets.len()
    }
}
