//! Graph representation for bulk numeric and traversal workloads.
//!
//! # Overview
//!
//! The graph is kept as a flat edge list ([`EdgeStore`]) with a derived
//! out-degree table ([`DegreeTable`]). Both are immutable once built and can
//! be shared by any number of read-only consumers.
//!
//! ## Pipeline
//!
//! ```text
//! edge list text
//!        ↓  io::loader::load_edge_list()
//! EdgeStore (insertion-ordered edges, node_count = 1 + max id)
//!        ├─ DegreeTable::build()     → PageRank, histogram, stats
//!        └─ AdjacencyIndex::build()  → indexed BFS (optional)
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use edgerank_core::graph::{DegreeTable, EdgeStore, GraphStats};
//!
//! let store = EdgeStore::from_pairs(&[(0, 1), (1, 2), (2, 0)]);
//! let degrees = DegreeTable::build(&store)?;
//! let stats = GraphStats::compute(&store, &degrees);
//!
//! assert_eq!(stats.node_count, 3);
//! assert_eq!(degrees.as_slice(), &[1, 1, 1]);
//! # Ok::<(), edgerank_core::error::GraphError>(())
//! ```

pub mod adjacency;
pub mod degree;
pub mod stats;
pub mod store;

use fixedbitset::FixedBitSet;

use crate::error::GraphError;

pub use adjacency::AdjacencyIndex;
pub use degree::DegreeTable;
pub use stats::GraphStats;
pub use store::{Edge, EdgeStore, MAX_NODE_ID};

/// Node identifier as read from the edge list.
pub type NodeId = u64;

/// Convert a node id or count into a vector index.
///
/// Ids that passed [`EdgeStore::check_node`] always fit, because a vector of
/// `node_count` slots was allocated for them.
#[allow(clippy::cast_possible_truncation)]
pub(crate) const fn slot(node: NodeId) -> usize {
    node as usize
}

/// A vector of `len` copies of `fill`, reserved up front.
///
/// Node ids index dense tables, so one huge id in a sparse input asks for a
/// huge table. That surfaces as [`GraphError::TooLarge`] rather than an
/// allocation abort.
pub(crate) fn dense_slots<T: Clone>(len: u64, fill: T) -> Result<Vec<T>, GraphError> {
    let too_large = || GraphError::TooLarge { nodes: len };
    let n = usize::try_from(len).map_err(|_| too_large())?;
    let mut slots = Vec::new();
    slots.try_reserve_exact(n).map_err(|_| too_large())?;
    slots.resize(n, fill);
    Ok(slots)
}

/// An all-clear bitset with `len` bits, reserved up front.
pub(crate) fn dense_bitset(len: u64) -> Result<FixedBitSet, GraphError> {
    // fixedbitset 0.4 stores bits in 32-bit blocks.
    let bits = usize::try_from(len).map_err(|_| GraphError::TooLarge { nodes: len })?;
    let blocks = dense_slots(bits.div_ceil(32) as u64, 0_u32)
        .map_err(|_| GraphError::TooLarge { nodes: len })?;
    Ok(FixedBitSet::with_capacity_and_blocks(bits, blocks))
}
