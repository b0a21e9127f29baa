//! Deterministic child ordering.
//!
//! Sub-hierarchies come first, then leaves grouped by factory. Within a
//! group children sort by case-insensitive display name, then by location.
//! The element ref is the final tie-breaker so the order never depends on the
//! order the graph reported children in.

use std::cmp::Ordering;

use tracker_model::{ChildRef, ComponentInfo, StateInfo};

/// Grouping key of a child.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    SubHierarchy,
    /// Lower-cased factory identity.
    Leaf(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub category: Category,
    /// Lower-cased display name.
    pub name: String,
    /// Canonical `(x,y)` location string.
    pub location: String,
    pub child: ChildRef,
}

impl SortKey {
    pub fn for_state(child: ChildRef, info: &StateInfo) -> Self {
        Self {
            category: Category::SubHierarchy,
            name: display_name(&info.circuit, info.label.as_deref()).to_lowercase(),
            location: info.location.to_string(),
            child,
        }
    }

    pub fn for_component(child: ChildRef, info: &ComponentInfo) -> Self {
        Self {
            category: Category::Leaf(info.factory.to_lowercase()),
            name: display_name(&info.factory, info.label.as_deref()).to_lowercase(),
            location: info.location.to_string(),
            child,
        }
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.location.cmp(&other.location))
            .then_with(|| child_rank(self.child).cmp(&child_rank(other.child)))
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn child_rank(child: ChildRef) -> (u8, u64) {
    match child {
        ChildRef::State(state) => (0, state.get()),
        ChildRef::Component(component) => (1, component.get()),
    }
}

/// `name`, or `name - label` when a non-blank label is set.
pub fn display_name(name: &str, label: Option<&str>) -> String {
    match label.map(str::trim).filter(|l| !l.is_empty()) {
        Some(label) => format!("{name} - {label}"),
        None => name.to_string(),
    }
}
