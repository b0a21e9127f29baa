//! Hierarchy, attribute and event model for the design tracker.
//!
//! This crate holds everything the outline engine consumes from the outside
//! world:
//!
//! - `ids` - identities of hierarchy states, components and circuits
//! - `attributes/` - the enum-keyed attribute map and the tracking record
//! - `events` - structural and attribute change events
//! - `observer` - snapshotting listener bus used by every entity
//! - `hierarchy` - the [`HierarchySource`] trait the engine reads from
//! - `design/` - an in-memory hierarchy graph and its JSON description
//!
//! # Example
//!
//! ```ignore
//! use tracker_model::{DesignHierarchy, Location};
//!
//! let mut design = DesignHierarchy::new();
//! let main = design.add_circuit("main")?;
//! let adder = design.add_circuit("adder")?;
//! design.add_component(adder, "XOR Gate", Location::new(10, 20))?;
//! design.add_subcircuit(main, adder, Location::new(0, 0))?;
//! let root = design.instantiate_root(main)?;
//! ```

mod attributes;
mod design;
mod error;
mod events;
mod hierarchy;
mod ids;
mod observer;

pub use attributes::{
    AttributeKey, AttributeKind, AttributeRecord, AttributeSet, AttributeValue, Direction,
    TIMESTAMP_FORMAT, format_timestamp, parse_timestamp,
};
pub use design::{CircuitSpec, ComponentSpec, DesignHierarchy, DesignSpec, TrackingSpec};
pub use error::{ModelError, Result};
pub use events::{AttributeEvent, DesignEvent, StructuralChange};
pub use hierarchy::{ChildRef, ComponentInfo, DesignEvents, HierarchySource, StateInfo};
pub use ids::{CircuitId, ComponentRef, ElementRef, Location, StateRef};
pub use observer::{ListenerError, ListenerId, ListenerResult, Listeners};
