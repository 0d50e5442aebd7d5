//! Immutable edge-list storage.
//!
//! # Overview
//!
//! [`EdgeStore`] owns the flat `(source, target)` sequence read from the
//! input together with the node-count bound derived from it. Nothing else in
//! the crate keeps a copy of the edges: the degree table, the adjacency
//! index and both analytics engines borrow the store read-only.
//!
//! ## Edge order
//!
//! Edges are kept in insertion order. PageRank updates its rank vector in
//! place while scanning the edges, so its output depends on this order; the
//! store never sorts, deduplicates or drops self-loops.
//!
//! ## Content hash
//!
//! [`EdgeStore::content_hash`] is a BLAKE3 hash of the ordered edge sequence.
//! Two stores with equal hashes produce bit-identical PageRank vectors for
//! the same configuration.

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::graph::NodeId;

/// Largest accepted node id.
///
/// `node_count` is one past the largest id, so `u64::MAX` itself has no
/// representable count and the loader rejects it.
pub const MAX_NODE_ID: NodeId = u64::MAX - 1;

/// Number of edges serialized per BLAKE3 update call.
const HASH_CHUNK_EDGES: usize = 4096;

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// An ordered `(source, target)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    #[must_use]
    pub const fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }

    /// Return `true` if both endpoints are the same node.
    #[must_use]
    pub const fn is_self_loop(self) -> bool {
        self.source == self.target
    }

    /// The endpoint opposite to `node`, treating the edge as undirected.
    ///
    /// A self-loop on `node` yields `node`. Returns `None` when the edge does
    /// not touch `node`.
    #[must_use]
    pub const fn opposite(self, node: NodeId) -> Option<NodeId> {
        if self.source == node {
            Some(self.target)
        } else if self.target == node {
            Some(self.source)
        } else {
            None
        }
    }

    /// The larger of the two endpoint ids.
    #[must_use]
    pub const fn max_node(self) -> NodeId {
        if self.source > self.target {
            self.source
        } else {
            self.target
        }
    }
}

impl From<(NodeId, NodeId)> for Edge {
    fn from((source, target): (NodeId, NodeId)) -> Self {
        Self::new(source, target)
    }
}

// ---------------------------------------------------------------------------
// EdgeStore
// ---------------------------------------------------------------------------

/// The immutable edge list of one analysis run.
///
/// Invariant: every node id referenced by an edge is `< node_count()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeStore {
    edges: Vec<Edge>,
    node_count: u64,
    content_hash: String,
}

impl EdgeStore {
    /// Build a store from any edge sequence, preserving its order.
    ///
    /// `node_count` is `1 + max(source, target)` over all edges, or 0 when
    /// the sequence is empty. Ids must not exceed [`MAX_NODE_ID`]; the loader
    /// enforces this for parsed input.
    #[must_use]
    pub fn from_edges(edges: impl IntoIterator<Item = Edge>) -> Self {
        let mut edges: Vec<Edge> = edges.into_iter().collect();
        edges.shrink_to_fit();

        let node_count = edges
            .iter()
            .map(|e| e.max_node())
            .max()
            .map_or(0, |max| max.saturating_add(1));

        let content_hash = compute_edge_hash(&edges);

        Self {
            edges,
            node_count,
            content_hash,
        }
    }

    /// Build a store from `(source, target)` tuples.
    #[must_use]
    pub fn from_pairs(pairs: &[(NodeId, NodeId)]) -> Self {
        Self::from_edges(pairs.iter().copied().map(Edge::from))
    }

    /// An empty store (0 nodes, 0 edges).
    #[must_use]
    pub fn empty() -> Self {
        Self::from_edges(std::iter::empty())
    }

    /// Number of edges, self-loops and duplicates included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// `1 + max node id`, or 0 for an empty store.
    #[must_use]
    pub const fn node_count(&self) -> u64 {
        self.node_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Iterate the edges in insertion order.
    ///
    /// The iterator borrows the store, so it can be restarted any number of
    /// times.
    pub fn iter_edges(&self) -> impl ExactSizeIterator<Item = Edge> + '_ {
        self.edges.iter().copied()
    }

    /// Random access to the `i`-th edge.
    #[must_use]
    pub fn edge_at(&self, i: usize) -> Option<Edge> {
        self.edges.get(i).copied()
    }

    /// The whole edge slice, insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// BLAKE3 hash of the ordered edge sequence (`blake3:<hex>`).
    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// Fail with [`GraphError::OutOfRange`] unless `node < node_count()`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] for ids outside the node range.
    pub const fn check_node(&self, node: NodeId) -> Result<(), GraphError> {
        if node < self.node_count {
            Ok(())
        } else {
            Err(GraphError::OutOfRange {
                node,
                node_count: self.node_count,
            })
        }
    }
}

impl<'a> IntoIterator for &'a EdgeStore {
    type Item = Edge;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Edge>>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter().copied()
    }
}

impl FromIterator<Edge> for EdgeStore {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        Self::from_edges(iter)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Hash edges as little-endian `(source, target)` words.
fn compute_edge_hash(edges: &[Edge]) -> String {
    let mut hasher = blake3::Hasher::new();
    let mut buf = Vec::with_capacity(HASH_CHUNK_EDGES * 16);

    for chunk in edges.chunks(HASH_CHUNK_EDGES) {
        buf.clear();
        for edge in chunk {
            buf.extend_from_slice(&edge.source.to_le_bytes());
            buf.extend_from_slice(&edge.target.to_le_bytes());
        }
        hasher.update(&buf);
    }

    format!("blake3:{}", hasher.finalize().to_hex())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
