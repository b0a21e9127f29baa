//! Attribute keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Kind of value an attribute holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    Text,
    Timestamp,
    Direction,
}

impl AttributeKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Timestamp => "timestamp",
            Self::Direction => "direction",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of attribute keys known to the tracker.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKey {
    /// User label of a component (also shown for subcircuit placements).
    Label,
    /// Name of a circuit definition.
    CircuitName,
    /// Orientation of a component.
    Facing,
    /// Author that created or last signed the element.
    Owner,
    /// Time the tracking metadata was stamped.
    Date,
    /// Version string of the element.
    Version,
    /// Stable identifier of the element.
    Uuid,
    /// Stored salted hash over the other tracking fields.
    Integrity,
}

impl AttributeKey {
    /// Every key, in declaration order.
    pub const ALL: [AttributeKey; 8] = [
        Self::Label,
        Self::CircuitName,
        Self::Facing,
        Self::Owner,
        Self::Date,
        Self::Version,
        Self::Uuid,
        Self::Integrity,
    ];

    /// Keys that make up the tracking record.
    pub const TRACKING: [AttributeKey; 5] = [
        Self::Owner,
        Self::Date,
        Self::Version,
        Self::Uuid,
        Self::Integrity,
    ];

    /// Stable name used in design files and on the command line.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::CircuitName => "circuit",
            Self::Facing => "facing",
            Self::Owner => "owner",
            Self::Date => "date",
            Self::Version => "version",
            Self::Uuid => "uuid",
            Self::Integrity => "integrity",
        }
    }

    pub const fn kind(&self) -> AttributeKind {
        match self {
            Self::Date => AttributeKind::Timestamp,
            Self::Facing => AttributeKind::Direction,
            Self::Label
            | Self::CircuitName
            | Self::Owner
            | Self::Version
            | Self::Uuid
            | Self::Integrity => AttributeKind::Text,
        }
    }

    /// Whether a change to this key alters the text shown for a node.
    pub const fn is_display_label(&self) -> bool {
        matches!(self, Self::Label | Self::CircuitName)
    }

    pub const fn is_tracking(&self) -> bool {
        matches!(
            self,
            Self::Owner | Self::Date | Self::Version | Self::Uuid | Self::Integrity
        )
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AttributeKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.name() == normalized)
            .ok_or_else(|| ModelError::unsupported(s))
    }
}
