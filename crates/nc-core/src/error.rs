//! Error taxonomy for model operations.
//!
//! Every model-mutating operation validates before touching state, so a
//! returned error always means "nothing changed".

use std::error::Error;
use std::fmt;

/// The ways a graph operation can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// Self-loop, or an endpoint that does not exist.
    InvalidEdge,
    /// Reparenting would nest a group inside its own descendant.
    CycleDetected,
    /// A stale node/edge id (e.g. a late callback after deletion).
    NotFound,
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::InvalidEdge => write!(f, "invalid edge (self-loop or missing endpoint)"),
            GraphError::CycleDetected => write!(f, "reparenting would create a containment cycle"),
            GraphError::NotFound => write!(f, "no node or edge with that id"),
        }
    }
}

impl Error for GraphError {}
