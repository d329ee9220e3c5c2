//! Error types for facecrate

use thiserror::Error;

/// Main error type for facecrate operations.
///
/// A result that stopped short of its target is not an error; see
/// [`Completion`](crate::Completion).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed arguments: bad indices, fraction out of range, empty mesh.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The requested collapse target is not a real mesh edge.
    #[error("Invalid edge ({v1}, {v2}): {reason}")]
    InvalidEdge { v1: usize, v2: usize, reason: String },

    /// Zero-extent bounding box or an excessive share of zero-area faces.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Unexpected failure inside an algorithm step.
    #[error("Algorithm error: {0}")]
    Algorithm(String),
}

impl Error {
    /// Shorthand for an [`Error::InvalidEdge`].
    pub fn invalid_edge(v1: usize, v2: usize, reason: impl Into<String>) -> Self {
        Error::InvalidEdge {
            v1,
            v2,
            reason: reason.into(),
        }
    }

    /// Whether the error was raised by argument validation, before any work.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidInput(_) | Error::InvalidEdge { .. })
    }
}

/// Result type alias for facecrate operations
pub type Result<T> = std::result::Result<T, Error>;
