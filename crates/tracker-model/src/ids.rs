//! Identities used across the hierarchy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of one instantiation of a circuit within the design.
///
/// Two placements of the same circuit definition are two distinct refs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct StateRef(u64);

impl StateRef {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state#{}", self.0)
    }
}

/// Identity of a component placed in a circuit definition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ComponentRef(u64);

impl ComponentRef {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component#{}", self.0)
    }
}

/// Identity of a circuit definition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CircuitId(u64);

impl CircuitId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for CircuitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "circuit#{}", self.0)
    }
}

/// Attribute owner: a hierarchy level (its circuit's static attributes) or
/// a single component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRef {
    State(StateRef),
    Component(ComponentRef),
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::State(state) => state.fmt(f),
            Self::Component(component) => component.fmt(f),
        }
    }
}

impl From<StateRef> for ElementRef {
    fn from(state: StateRef) -> Self {
        Self::State(state)
    }
}

impl From<ComponentRef> for ElementRef {
    fn from(component: ComponentRef) -> Self {
        Self::Component(component)
    }
}

/// Position of a component on its circuit canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Canonical form `(x,y)`, used as the last ordering tie-breaker.
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_forms() {
        assert_eq!(StateRef::from_raw(3).to_string(), "state#3");
        assert_eq!(ComponentRef::from_raw(7).to_string(), "component#7");
        assert_eq!(Location::new(-10, 20).to_string(), "(-10,20)");
        assert_eq!(
            ElementRef::from(ComponentRef::from_raw(1)).to_string(),
            "component#1"
        );
    }
}
