//! Analytics over an edge list.
//!
//! # Overview
//!
//! - **PageRank** (`pagerank`): in-place, edge-order power iteration over
//!   the directed edges. Fixed sweep count, no renormalization.
//! - **Traversal** (`traversal`): breadth-first search over the undirected
//!   view, by edge scan or by adjacency index.
//! - **Histogram** (`histogram`): out-degree distribution.
//!
//! All three borrow the [`crate::graph::EdgeStore`] and
//! [`crate::graph::DegreeTable`] read-only, so they can run repeatedly (or
//! from different threads) over the same graph.
//!
//! # Usage
//!
//! ```rust
//! use edgerank_core::graph::{DegreeTable, EdgeStore};
//! use edgerank_core::metrics::{histogram::DegreeHistogram, pagerank, traversal};
//!
//! let store = EdgeStore::from_pairs(&[(0, 1), (1, 2), (2, 0)]);
//! let degrees = DegreeTable::build(&store)?;
//!
//! let ranks = pagerank::pagerank(&store, &degrees, &pagerank::PageRankConfig::default())?;
//! let order = traversal::bfs(&store, 0)?;
//! let hist = DegreeHistogram::build(&degrees);
//!
//! assert_eq!(ranks.len(), 3);
//! assert_eq!(order.order(), &[0, 1, 2]);
//! assert_eq!(hist.counts(), &[0, 3]);
//! # Ok::<(), edgerank_core::error::GraphError>(())
//! ```

pub mod histogram;
pub mod pagerank;
pub mod traversal;
