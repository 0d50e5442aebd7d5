//! Edge-list input and result export.
//!
//! These are thin I/O layers around the graph and metrics modules: the
//! loader turns text into an [`crate::graph::EdgeStore`], the exporters turn
//! results back into text files. Neither performs any analysis.

pub mod export;
pub mod loader;

pub use loader::{LoadedEdges, MalformedLine, load_edge_list, load_edge_list_mapped, read_edge_list};
