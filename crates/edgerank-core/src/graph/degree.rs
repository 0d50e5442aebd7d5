//! Out-degree table derived from an [`EdgeStore`].
//!
//! `degree[i]` counts the edges whose **source** is `i`. Targets are not
//! counted, so this is a full (in + out) degree only when the input lists
//! every undirected edge in both directions.

use crate::error::GraphError;
use crate::graph::store::EdgeStore;
use crate::graph::{NodeId, dense_slots, slot};

/// Dense out-degree counts, one slot per node.
///
/// Invariant (when built from a store): `total() == store.edge_count()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegreeTable {
    counts: Vec<u64>,
}

impl DegreeTable {
    /// Count out-degrees for every node of `store`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::TooLarge`] if one slot per node cannot be
    /// allocated.
    pub fn build(store: &EdgeStore) -> Result<Self, GraphError> {
        let mut counts = dense_slots(store.node_count(), 0_u64)?;
        for edge in store.iter_edges() {
            counts[slot(edge.source)] += 1;
        }
        Ok(Self { counts })
    }

    /// Wrap precomputed counts.
    ///
    /// No consistency check against any store is made; PageRank guards
    /// against zero-degree sources with its zero-degree policy.
    #[must_use]
    pub const fn from_counts(counts: Vec<u64>) -> Self {
        Self { counts }
    }

    /// Out-degree of `node`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if `node >= node_count()`.
    pub fn degree(&self, node: NodeId) -> Result<u64, GraphError> {
        usize::try_from(node)
            .ok()
            .and_then(|i| self.counts.get(i))
            .copied()
            .ok_or(GraphError::OutOfRange {
                node,
                node_count: self.node_count(),
            })
    }

    /// Number of nodes covered by the table.
    #[must_use]
    pub fn node_count(&self) -> u64 {
        self.counts.len() as u64
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u64] {
        &self.counts
    }

    /// Largest out-degree, or `None` for an empty table.
    #[must_use]
    pub fn max_degree(&self) -> Option<u64> {
        self.counts.iter().copied().max()
    }

    /// Sum of all out-degrees.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}
