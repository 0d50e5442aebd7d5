#![deny(unsafe_code)]
//! edgerank-core library.
//!
//! Edge-list graph storage, out-degree tables, the in-place PageRank engine,
//! breadth-first traversal and degree histograms, plus the loader, exporters
//! and run pipeline that tie them to files.
//!
//! # Conventions
//!
//! - **Errors**: typed [`error::GraphError`] from the engines; `anyhow::Result`
//!   with path/phase context for anything touching the filesystem.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`). The
//!   library never installs a subscriber.

pub mod config;
pub mod error;
pub mod graph;
pub mod io;
pub mod metrics;
pub mod pipeline;
pub mod timing;
