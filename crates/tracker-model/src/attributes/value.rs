//! Typed attribute values.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::key::AttributeKind;
use crate::error::{ModelError, Result};

/// Single date format used for tracking timestamps, both in design files and
/// in the integrity canonical form.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a timestamp with [`TIMESTAMP_FORMAT`].
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp written with [`TIMESTAMP_FORMAT`].
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map_err(|_| {
        ModelError::InvalidTimestamp {
            value: value.to_string(),
            format: TIMESTAMP_FORMAT,
        }
    })
}

/// Component orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    #[default]
    East,
    South,
    West,
}

impl Direction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute value, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    Text(String),
    Timestamp(NaiveDateTime),
    Direction(Direction),
}

impl AttributeValue {
    pub fn kind(&self) -> AttributeKind {
        match self {
            Self::Text(_) => AttributeKind::Text,
            Self::Timestamp(_) => AttributeKind::Timestamp,
            Self::Direction(_) => AttributeKind::Direction,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&NaiveDateTime> {
        match self {
            Self::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Timestamp(ts) => f.write_str(&format_timestamp(ts)),
            Self::Direction(dir) => dir.fmt(f),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDateTime> for AttributeValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

impl From<Direction> for AttributeValue {
    fn from(value: Direction) -> Self {
        Self::Direction(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_round_trip_format() {
        let ts = parse_timestamp("2024-03-01 08:15:00").unwrap();
        assert_eq!(format_timestamp(&ts), "2024-03-01 08:15:00");
        assert_eq!(AttributeValue::from(ts).to_string(), "2024-03-01 08:15:00");
    }

    #[test]
    fn test_invalid_timestamp() {
        let err = parse_timestamp("01/03/2024").unwrap_err();
        assert!(matches!(err, ModelError::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_value_kinds() {
        assert_eq!(AttributeValue::from("x").kind(), AttributeKind::Text);
        assert_eq!(
            AttributeValue::from(Direction::West).kind(),
            AttributeKind::Direction
        );
        assert_eq!(AttributeValue::from("x").as_text(), Some("x"));
        assert!(AttributeValue::from(Direction::West).as_text().is_none());
    }
}
