//! Breadth-first traversal over the undirected view of the edge list.
//!
//! # Overview
//!
//! Every node moves through `Unvisited -> Queued -> Visited`. The start node
//! is queued first; the loop pops the frontier head, records it as visited,
//! enumerates its neighbors and queues each one that is still unvisited.
//! Nodes outside the start's component are never touched.
//!
//! Edges are undirected here: `(c, u)` and `(u, c)` both make `u` a neighbor
//! of `c`.
//!
//! # Neighbor sources
//!
//! [`bfs`] enumerates neighbors with a linear scan of the [`EdgeStore`],
//! O(edges) per popped node and O(edges × nodes) overall. That is fine for
//! small graphs. For anything larger, build an [`AdjacencyIndex`] and call
//! [`bfs_indexed`]; it visits nodes in the same order in O(nodes + edges).
//!
//! # Scratch memory
//!
//! The frontier queue and visited bitset are allocated when a traversal
//! starts, sized to `node_count`, and handed to the returned [`Traversal`]
//! or dropped with it.

use std::collections::{HashSet, VecDeque};

use fixedbitset::FixedBitSet;
use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::adjacency::AdjacencyIndex;
use crate::graph::store::EdgeStore;
use crate::graph::{NodeId, dense_bitset, slot};

// ---------------------------------------------------------------------------
// Neighbor enumeration
// ---------------------------------------------------------------------------

/// Anything that can list the undirected neighbors of a node.
pub trait NeighborSource {
    /// Number of node ids (`0..node_count`).
    fn node_count(&self) -> u64;

    /// Append the neighbors of `node` to `out`, in edge order.
    ///
    /// Repeats are allowed; callers that need a set deduplicate. `node` is
    /// always `< node_count()`.
    fn extend_neighbors(&self, node: NodeId, out: &mut Vec<NodeId>);
}

impl NeighborSource for EdgeStore {
    fn node_count(&self) -> u64 {
        Self::node_count(self)
    }

    fn extend_neighbors(&self, node: NodeId, out: &mut Vec<NodeId>) {
        out.extend(self.iter_edges().filter_map(|edge| edge.opposite(node)));
    }
}

impl NeighborSource for AdjacencyIndex {
    fn node_count(&self) -> u64 {
        Self::node_count(self)
    }

    fn extend_neighbors(&self, node: NodeId, out: &mut Vec<NodeId>) {
        if let Ok(run) = self.neighbors(node) {
            out.extend_from_slice(run);
        }
    }
}

/// All distinct nodes adjacent to `node`, by a full scan of the edges.
///
/// For an edge touching `node` the opposite endpoint is collected; a
/// self-loop contributes `node` itself. Order is first appearance in the
/// edge list.
///
/// # Errors
///
/// Returns [`GraphError::OutOfRange`] if `node >= store.node_count()`.
pub fn neighbors(store: &EdgeStore, node: NodeId) -> Result<Vec<NodeId>, GraphError> {
    store.check_node(node)?;

    let mut raw = Vec::new();
    store.extend_neighbors(node, &mut raw);

    let mut seen = HashSet::with_capacity(raw.len());
    raw.retain(|n| seen.insert(*n));
    Ok(raw)
}

// ---------------------------------------------------------------------------
// Traversal result
// ---------------------------------------------------------------------------

/// Set of node ids reached by a traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitedSet {
    bits: FixedBitSet,
    len: usize,
}

impl VisitedSet {
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        usize::try_from(node).is_ok_and(|i| self.bits.contains(i))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Visited ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.bits.ones().map(|i| i as NodeId)
    }
}

/// Outcome of one breadth-first traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traversal {
    start: Option<NodeId>,
    order: Vec<NodeId>,
    visited: VisitedSet,
}

impl Traversal {
    fn empty() -> Self {
        Self {
            start: None,
            order: Vec::new(),
            visited: VisitedSet {
                bits: FixedBitSet::new(),
                len: 0,
            },
        }
    }

    /// The start node, `None` for the no-op traversal of an empty graph.
    #[must_use]
    pub const fn start(&self) -> Option<NodeId> {
        self.start
    }

    /// Nodes in the order they were visited.
    #[must_use]
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    #[must_use]
    pub const fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    #[must_use]
    pub fn is_visited(&self, node: NodeId) -> bool {
        self.visited.contains(node)
    }

    /// Number of visited nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Consume the traversal, keeping only the visitation order.
    #[must_use]
    pub fn into_order(self) -> Vec<NodeId> {
        self.order
    }
}

// ---------------------------------------------------------------------------
// BFS
// ---------------------------------------------------------------------------

/// Breadth-first traversal from `start`, scanning the edge list for
/// neighbors.
///
/// On a store with no nodes this is a no-op returning an empty traversal.
///
/// # Errors
///
/// Returns [`GraphError::OutOfRange`] if `start >= store.node_count()` on a
/// non-empty store.
#[instrument(skip(store), fields(nodes = store.node_count(), edges = store.edge_count()))]
pub fn bfs(store: &EdgeStore, start: NodeId) -> Result<Traversal, GraphError> {
    breadth_first(store, start)
}

/// Breadth-first traversal from `start` over a prebuilt adjacency index.
///
/// Visits the same nodes in the same order as [`bfs`] on the store the
/// index was built from.
///
/// # Errors
///
/// Returns [`GraphError::OutOfRange`] if `start >= index.node_count()` on a
/// non-empty index.
#[instrument(skip(index), fields(nodes = index.node_count()))]
pub fn bfs_indexed(index: &AdjacencyIndex, start: NodeId) -> Result<Traversal, GraphError> {
    breadth_first(index, start)
}

/// The shared frontier loop.
///
/// A set bit in `discovered` means the node is `Queued` (still in the
/// frontier) or `Visited` (already popped); a clear bit means `Unvisited`.
/// Once the frontier drains every discovered node has been visited, so the
/// same bitset becomes the result's visited set.
///
/// # Errors
///
/// - [`GraphError::OutOfRange`] if `start >= graph.node_count()` on a
///   non-empty graph.
/// - [`GraphError::TooLarge`] if the discovered set cannot be allocated.
pub fn breadth_first<G: NeighborSource + ?Sized>(
    graph: &G,
    start: NodeId,
) -> Result<Traversal, GraphError> {
    let node_count = graph.node_count();
    if node_count == 0 {
        return Ok(Traversal::empty());
    }
    if start >= node_count {
        return Err(GraphError::OutOfRange {
            node: start,
            node_count,
        });
    }

    let mut discovered = dense_bitset(node_count)?;
    let mut frontier = VecDeque::new();
    let mut order = Vec::new();
    let mut scratch = Vec::new();

    discovered.insert(slot(start));
    frontier.push_back(start);

    while let Some(current) = frontier.pop_front() {
        order.push(current);

        scratch.clear();
        graph.extend_neighbors(current, &mut scratch);
        for &next in &scratch {
            let i = slot(next);
            if !discovered.contains(i) {
                discovered.insert(i);
                frontier.push_back(next);
            }
        }
    }

    debug!(start, visited = order.len(), "bfs complete");

    let len = order.len();
    Ok(Traversal {
        start: Some(start),
        order,
        visited: VisitedSet {
            bits: discovered,
            len,
        },
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
