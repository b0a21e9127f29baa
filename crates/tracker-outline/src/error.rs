//! Error types for the outline engine.

use thiserror::Error;

use crate::tree::NodeId;

/// Errors raised when a caller hands the engine a node it cannot use.
///
/// Missing hierarchy elements are never errors: they simply produce empty
/// child lists or neutral validity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OutlineError {
    /// The node was never created or has been destroyed by a reload.
    #[error("outline node {0} does not exist")]
    UnknownNode(NodeId),

    /// Component nodes have no children to expand.
    #[error("outline node {0} is a component and cannot be expanded")]
    NotExpandable(NodeId),
}

/// Result type alias for outline operations.
pub type Result<T> = std::result::Result<T, OutlineError>;
