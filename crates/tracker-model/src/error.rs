//! Error types for the tracker model.

use thiserror::Error;

use crate::attributes::{AttributeKey, AttributeKind};
use crate::ids::{ComponentRef, StateRef};

/// Errors raised by attribute sets and the in-memory hierarchy.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// The key is not part of this record's declared attributes, or the
    /// key name is not recognized at all.
    #[error("unsupported attribute key: {key}")]
    UnsupportedAttributeKey { key: String },

    /// A value of the wrong kind was written to an attribute.
    #[error("attribute '{key}' expects a {expected} value, got {found}")]
    AttributeKindMismatch {
        key: AttributeKey,
        expected: AttributeKind,
        found: AttributeKind,
    },

    /// A timestamp string did not match the tracking date format.
    #[error("invalid timestamp '{value}' (expected format {format})")]
    InvalidTimestamp { value: String, format: &'static str },

    /// The hierarchy state does not exist (or was removed).
    #[error("unknown hierarchy state: {0}")]
    UnknownState(StateRef),

    /// The component does not exist (or was removed).
    #[error("unknown component: {0}")]
    UnknownComponent(ComponentRef),

    /// No circuit definition with this name or id.
    #[error("unknown circuit: {0}")]
    UnknownCircuit(String),

    /// A circuit definition with this name already exists.
    #[error("circuit '{0}' is already defined")]
    DuplicateCircuit(String),

    /// Placing the circuit would make the hierarchy contain itself.
    #[error("circuit '{parent}' cannot contain '{child}': instantiation would be recursive")]
    RecursiveInstantiation { parent: String, child: String },

    /// The JSON design description is malformed or inconsistent.
    #[error("invalid design description: {reason}")]
    InvalidSpec { reason: String },
}

impl ModelError {
    /// Shorthand for an unsupported key error.
    pub fn unsupported(key: impl ToString) -> Self {
        Self::UnsupportedAttributeKey {
            key: key.to_string(),
        }
    }
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
