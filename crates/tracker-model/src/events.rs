//! Change events emitted by the hierarchy graph and attribute storage.

use crate::attributes::{AttributeKey, AttributeValue};
use crate::ids::{ElementRef, StateRef};

/// Kind of structural change reported for one hierarchy state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructuralChange {
    /// A component was placed in the state's circuit.
    ComponentAdded,
    /// A component was removed from the state's circuit.
    ComponentRemoved,
    /// Wiring changed without adding or removing components.
    ConnectivityChanged,
    /// The circuit was renamed.
    NameChanged,
    /// Transient "something may have changed" signal. Not a real edit.
    Invalidated,
}

impl StructuralChange {
    /// Whether the child list of the state may differ afterwards.
    pub const fn affects_topology(&self) -> bool {
        matches!(
            self,
            Self::ComponentAdded | Self::ComponentRemoved | Self::ConnectivityChanged
        )
    }
}

/// Change reported by an attribute set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeEvent {
    /// The declared key list changed.
    ListChanged,
    /// A value was written or cleared.
    ValueChanged {
        key: AttributeKey,
        old: Option<AttributeValue>,
        new: Option<AttributeValue>,
    },
}

impl AttributeEvent {
    /// Key touched by a value change.
    pub fn key(&self) -> Option<AttributeKey> {
        match self {
            Self::ListChanged => None,
            Self::ValueChanged { key, .. } => Some(*key),
        }
    }
}

/// Event queued by a hierarchy source for the outline engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesignEvent {
    Structural {
        state: StateRef,
        change: StructuralChange,
    },
    Attribute {
        target: ElementRef,
        event: AttributeEvent,
    },
}
