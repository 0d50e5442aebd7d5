use std::fmt;
use std::io;

use crate::config::ConfigReadError;
use crate::graph::NodeId;
use crate::io::export::ExportError;
use crate::io::loader::MalformedLine;

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    ConfigUnreadable,
    InputNotFound,
    MalformedInput,
    NodeOutOfRange,
    DivisionHazard,
    InvalidDamping,
    DegreeTableMismatch,
    GraphTooLarge,
    ExportWriteFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::ConfigUnreadable => "E1004",
            Self::InputNotFound => "E1002",
            Self::MalformedInput => "E1003",
            Self::NodeOutOfRange => "E2001",
            Self::DivisionHazard => "E2002",
            Self::InvalidDamping => "E2003",
            Self::DegreeTableMismatch => "E2004",
            Self::GraphTooLarge => "E2005",
            Self::ExportWriteFailed => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::ConfigUnreadable => "Config file could not be read",
            Self::InputNotFound => "Edge list not found",
            Self::MalformedInput => "Malformed edge line",
            Self::NodeOutOfRange => "Node index out of range",
            Self::DivisionHazard => "Source node has zero recorded out-degree",
            Self::InvalidDamping => "Damping factor outside [0, 1]",
            Self::DegreeTableMismatch => "Degree table does not match edge store",
            Self::GraphTooLarge => "Graph too large for per-node tables",
            Self::ExportWriteFailed => "Result export failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in edgerank.toml and retry."),
            Self::ConfigUnreadable => Some("Check the --config path and read permissions."),
            Self::InputNotFound => Some("Check the edge list path and read permissions."),
            Self::MalformedInput => {
                Some("Each line must hold two non-negative integers separated by whitespace.")
            }
            Self::NodeOutOfRange => Some("Node ids run from 0 to node_count - 1."),
            Self::DivisionHazard => {
                Some("Rebuild the degree table from the same edge store, or use the skip policy.")
            }
            Self::InvalidDamping => Some("Pass a damping factor between 0.0 and 1.0."),
            Self::DegreeTableMismatch => Some("Build the degree table from the same edge store."),
            Self::GraphTooLarge => {
                Some("Node ids are dense indices; renumber sparse ids to 0..n before loading.")
            }
            Self::ExportWriteFailed => Some("Check disk space and write permissions."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl ErrorCode {
    /// Pick the code for an error chain: the outermost cause with a known
    /// type decides.
    ///
    /// Untyped failures map to [`ErrorCode::InternalUnexpected`].
    #[must_use]
    pub fn classify(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if let Some(graph) = cause.downcast_ref::<GraphError>() {
                return graph.code();
            }
            if cause.is::<ExportError>() {
                return Self::ExportWriteFailed;
            }
            if cause.is::<MalformedLine>() {
                return Self::MalformedInput;
            }
            if cause.is::<ConfigReadError>() {
                return Self::ConfigUnreadable;
            }
            if cause.is::<toml::de::Error>() {
                return Self::ConfigParseError;
            }
            if let Some(io_err) = cause.downcast_ref::<io::Error>() {
                if io_err.kind() == io::ErrorKind::NotFound {
                    return Self::InputNotFound;
                }
            }
        }
        Self::InternalUnexpected
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised by the graph structures and analytics engines.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// A node index argument was outside `[0, node_count)`.
    #[error("node {node} out of range (node_count = {node_count})")]
    OutOfRange { node: NodeId, node_count: u64 },

    /// A PageRank sweep met an edge whose source has recorded degree 0.
    #[error("source node {node} has zero recorded out-degree")]
    DivisionHazard { node: NodeId },

    /// The damping factor is not a finite value in `[0, 1]`.
    #[error("damping factor {0} is outside [0, 1]")]
    InvalidDamping(f64),

    /// The degree table was built for a different node count.
    #[error("degree table covers {found} nodes but the edge store has {expected}")]
    DegreeTableMismatch { expected: u64, found: u64 },

    /// A dense per-node table for `nodes` ids could not be allocated.
    #[error("cannot allocate per-node tables for {nodes} nodes")]
    TooLarge { nodes: u64 },
}

impl GraphError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::OutOfRange { .. } => ErrorCode::NodeOutOfRange,
            Self::DivisionHazard { .. } => ErrorCode::DivisionHazard,
            Self::InvalidDamping(_) => ErrorCode::InvalidDamping,
            Self::DegreeTableMismatch { .. } => ErrorCode::DegreeTableMismatch,
            Self::TooLarge { .. } => ErrorCode::GraphTooLarge,
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}
