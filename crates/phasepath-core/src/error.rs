//! Error types for phasepath-core.

use crate::VertexId;
use thiserror::Error;

/// Error type for periodic graph loading and shortest path queries.
#[derive(Error, Debug)]
pub enum Error {
    /// A source or destination index outside `[0, V)`.
    #[error("invalid vertex {vertex}: graph has {vertex_count} vertices")]
    InvalidVertex {
        vertex: VertexId,
        vertex_count: usize,
    },

    /// The destination cannot be reached from the current source in any phase.
    #[error("no path from {from} to {to}")]
    NoPathFound { from: VertexId, to: VertexId },

    /// Structural precondition violated while building a graph.
    #[error("malformed graph: {0}")]
    MalformedGraph(String),

    /// A walk cost no longer fits below the unreached marker.
    #[error("path cost overflows at vertex {vertex} (phase {phase})")]
    CostOverflow { vertex: VertexId, phase: usize },

    /// A distance query was issued before any source was searched.
    #[error("no source has been searched yet")]
    NoSource,

    /// Text format error.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for the "destination unreachable" outcome, which callers usually
    /// print rather than treat as a failure.
    pub fn is_no_path(&self) -> bool {
        matches!(self, Self::NoPathFound { .. })
    }
}

/// `io::Error` and `serde_json::Error` are not `Clone`; copies of those
/// variants keep the kind and message.
impl Clone for Error {
    fn clone(&self) -> Self {
        match self {
            Self::InvalidVertex {
                vertex,
                vertex_count,
            } => Self::InvalidVertex {
                vertex: *vertex,
                vertex_count: *vertex_count,
            },
            Self::NoPathFound { from, to } => Self::NoPathFound {
                from: *from,
                to: *to,
            },
            Self::MalformedGraph(msg) => Self::MalformedGraph(msg.clone()),
            Self::CostOverflow { vertex, phase } => Self::CostOverflow {
                vertex: *vertex,
                phase: *phase,
            },
            Self::NoSource => Self::NoSource,
            Self::Parse { line, message } => Self::Parse {
                line: *line,
                message: message.clone(),
            },
            Self::Io(err) => Self::Io(std::io::Error::new(err.kind(), err.to_string())),
            Self::Json(err) => Self::Json(serde::de::Error::custom(err.to_string())),
        }
    }
}

/// Result type for phasepath operations.
pub type Result<T> = std::result::Result<T, Error>;
