//! Analysis configuration.
//!
//! A TOML file with four optional sections; every key has a default, so an
//! empty file (or no file) is a valid configuration:
//!
//! ```toml
//! [input]
//! path = "graph.txt"
//! mmap = false
//! strict = false           # fail on a malformed line instead of stopping
//!
//! [pagerank]
//! enabled = true
//! damping = 0.15
//! iterations = 100
//! zero_degree = "skip"     # or "reject"
//!
//! [traversal]
//! enabled = true
//! start = 0
//! strategy = "index"       # or "scan"
//!
//! [output]
//! degrees = "degrees.txt"
//! ranks = "proba.txt"
//! # bfs = "bfs.txt"
//! ```
//!
//! Lookup order for [`load_config`]: an explicit path, then
//! `./edgerank.toml`, then `<config dir>/edgerank/config.toml`. The first
//! file found wins; files are not merged. Command-line flags are applied on
//! top by the caller.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::graph::NodeId;
use crate::metrics::pagerank::PageRankConfig;

/// File name looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "edgerank.toml";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub pagerank: PageRankSection,
    #[serde(default)]
    pub traversal: TraversalConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputConfig {
    /// Edge list to analyse when none is given on the command line.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Memory-map the input instead of reading it through a buffer.
    #[serde(default)]
    pub mmap: bool,
    /// Treat a malformed line as an error rather than the end of input.
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRankSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(flatten)]
    pub engine: PageRankConfig,
}

impl Default for PageRankSection {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            engine: PageRankConfig::default(),
        }
    }
}

/// How BFS finds the neighbors of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalStrategy {
    /// Scan the whole edge list for every visited node.
    Scan,
    /// Build an adjacency index once, then look neighbors up.
    #[default]
    Index,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub start: NodeId,
    #[serde(default)]
    pub strategy: TraversalStrategy,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            start: 0,
            strategy: TraversalStrategy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Degree histogram file.
    #[serde(default = "default_degrees_path")]
    pub degrees: PathBuf,
    /// Rank vector file.
    #[serde(default = "default_ranks_path")]
    pub ranks: PathBuf,
    /// Traversal order file. Not written when unset.
    #[serde(default)]
    pub bfs: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            degrees: default_degrees_path(),
            ranks: default_ranks_path(),
            bfs: None,
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or a value has the
    /// wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse analysis config")
    }

    /// Serialize to TOML, e.g. to print the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serialize analysis config")
    }
}

/// A config file exists in the lookup (or was named explicitly) but could
/// not be read.
#[derive(Debug, thiserror::Error)]
#[error("read config {}", path.display())]
pub struct ConfigReadError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Read and parse the config file at `path`.
///
/// # Errors
///
/// Returns [`ConfigReadError`] if the file cannot be read, or a TOML error
/// (with path context) if it cannot be parsed.
pub fn load_config_file(path: &Path) -> Result<AnalysisConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigReadError {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str::<AnalysisConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// `<config dir>/edgerank/config.toml`, if the platform has a config dir.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("edgerank/config.toml"))
}

/// Resolve and load the configuration.
///
/// An explicit path must exist. Otherwise `./edgerank.toml` and then the
/// user config file are tried; when neither exists the defaults are used.
///
/// # Errors
///
/// Returns an error if the chosen file cannot be read or parsed.
pub fn load_config(explicit: Option<&Path>) -> Result<AnalysisConfig> {
    load_config_from(explicit, Path::new("."), user_config_path().as_deref())
}

fn load_config_from(
    explicit: Option<&Path>,
    project_root: &Path,
    user_path: Option<&Path>,
) -> Result<AnalysisConfig> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }

    let project_path = project_root.join(PROJECT_CONFIG_FILE);
    if project_path.exists() {
        return load_config_file(&project_path);
    }

    match user_path {
        Some(path) if path.exists() => load_config_file(path),
        _ => Ok(AnalysisConfig::default()),
    }
}

const fn default_true() -> bool {
    true
}

fn default_degrees_path() -> PathBuf {
    PathBuf::from("degrees.txt")
}

fn default_ranks_path() -> PathBuf {
    PathBuf::from("proba.txt")
}
