pub mod bfs;
pub mod completions;
pub mod degrees;
pub mod pagerank;
pub mod run;
pub mod stats;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use edgerank_core::config::InputConfig;
use edgerank_core::io::loader::LoadedEdges;
use edgerank_core::pipeline;
use tracing::debug;

/// Input options shared by the single-metric commands.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Edge list file: one `<source> <target>` pair per line.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Memory-map the input instead of reading it through a buffer.
    #[arg(long)]
    pub mmap: bool,

    /// Fail on a malformed line instead of treating it as the end of input.
    #[arg(long)]
    pub strict: bool,
}

impl InputArgs {
    /// Load the edge list these options describe.
    pub fn load(&self) -> Result<LoadedEdges> {
        let loaded = pipeline::load_input(
            &self.input,
            &InputConfig {
                path: Some(self.input.clone()),
                mmap: self.mmap,
                strict: self.strict,
            },
        )?;
        debug!(
            edges = loaded.store.edge_count(),
            nodes = loaded.store.node_count(),
            "input ready"
        );
        Ok(loaded)
    }
}
