//! JSON description of a design.
//!
//! ```json
//! {
//!   "root": "main",
//!   "circuits": [
//!     {
//!       "name": "main",
//!       "components": [
//!         { "subcircuit": "adder", "x": 0, "y": 0, "label": "lsb" },
//!         { "factory": "Pin", "x": 40, "y": 10, "tracking": { "owner": "alice" } }
//!       ]
//!     },
//!     { "name": "adder", "components": [] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::DesignHierarchy;
use crate::attributes::{
    AttributeKey, AttributeSet, AttributeValue, Direction, format_timestamp, parse_timestamp,
};
use crate::error::{ModelError, Result};
use crate::ids::{CircuitId, Location, StateRef};

/// Whole design: circuit definitions plus the name of the root circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignSpec {
    pub root: String,
    #[serde(default)]
    pub circuits: Vec<CircuitSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "TrackingSpec::is_empty")]
    pub tracking: TrackingSpec,
    #[serde(default)]
    pub components: Vec<ComponentSpec>,
}

/// One placed component. Exactly one of `factory` and `subcircuit` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcircuit: Option<String>,
    pub x: i32,
    pub y: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facing: Option<Direction>,
    #[serde(default, skip_serializing_if = "TrackingSpec::is_empty")]
    pub tracking: TrackingSpec,
}

/// Tracking attributes as written in the file. Dates use
/// [`TIMESTAMP_FORMAT`](crate::TIMESTAMP_FORMAT).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity: Option<String>,
}

impl TrackingSpec {
    pub fn is_empty(&self) -> bool {
        self.owner.is_none()
            && self.date.is_none()
            && self.version.is_none()
            && self.uuid.is_none()
            && self.integrity.is_none()
    }

    fn apply(&self, set: &mut AttributeSet) -> Result<()> {
        let texts = [
            (AttributeKey::Owner, &self.owner),
            (AttributeKey::Version, &self.version),
            (AttributeKey::Uuid, &self.uuid),
            (AttributeKey::Integrity, &self.integrity),
        ];
        for (key, value) in texts {
            if let Some(value) = value {
                set.set(key, value.as_str())?;
            }
        }
        if let Some(date) = &self.date {
            set.set(AttributeKey::Date, parse_timestamp(date)?)?;
        }
        Ok(())
    }

    fn from_set(set: &AttributeSet) -> Self {
        let record = set.tracking_record();
        Self {
            owner: record.owner,
            date: record.date.as_ref().map(format_timestamp),
            version: record.version,
            uuid: record.uuid,
            integrity: record.integrity,
        }
    }
}

impl DesignSpec {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ModelError::InvalidSpec {
            reason: e.to_string(),
        })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ModelError::InvalidSpec {
            reason: e.to_string(),
        })
    }
}

impl DesignHierarchy {
    /// Build a design from its description and instantiate the root.
    ///
    /// Loading is not an edit: the returned design has no queued events.
    pub fn from_spec(spec: &DesignSpec) -> Result<(Self, StateRef)> {
        let mut design = Self::new();

        let mut ids: Vec<CircuitId> = Vec::with_capacity(spec.circuits.len());
        for circuit in &spec.circuits {
            let id = design.add_circuit(&circuit.name)?;
            design.modify_circuit_attributes(id, |set| {
                if let Some(label) = &circuit.label {
                    set.set(AttributeKey::Label, label.as_str())?;
                }
                circuit.tracking.apply(set)
            })?;
            ids.push(id);
        }

        for (circuit, id) in spec.circuits.iter().zip(ids.iter().copied()) {
            for component in &circuit.components {
                let location = Location::new(component.x, component.y);
                let placed = match (&component.factory, &component.subcircuit) {
                    (Some(factory), None) => design.add_component(id, factory, location)?,
                    (None, Some(sub)) => {
                        let sub = design
                            .circuit_by_name(sub)
                            .ok_or_else(|| ModelError::UnknownCircuit(sub.clone()))?;
                        design.add_subcircuit(id, sub, location)?
                    }
                    _ => {
                        return Err(ModelError::InvalidSpec {
                            reason: format!(
                                "component at {location} in '{}' must name exactly one of \
                                 factory or subcircuit",
                                circuit.name
                            ),
                        });
                    }
                };
                design.modify_component_attributes(placed, |set| {
                    if let Some(label) = &component.label {
                        set.set(AttributeKey::Label, label.as_str())?;
                    }
                    if let Some(facing) = component.facing {
                        set.set(AttributeKey::Facing, facing)?;
                    }
                    component.tracking.apply(set)
                })?;
            }
        }

        let root = design
            .circuit_by_name(&spec.root)
            .ok_or_else(|| ModelError::UnknownCircuit(spec.root.clone()))?;
        let root = design.instantiate_root(root)?;
        design.pending.clear();
        Ok((design, root))
    }

    /// Describe the design rooted at `root`.
    pub fn to_spec(&self, root: StateRef) -> Result<DesignSpec> {
        let root_circuit = self.circuit_of(root)?;
        let mut circuits = Vec::new();
        for id in self.circuits() {
            let attributes = self.circuit_attributes(id)?;
            let mut components = Vec::new();
            for component in self.components_of(id)? {
                let entry = self.component(*component)?;
                let subcircuit = match entry.subcircuit {
                    Some(sub) => Some(self.circuit_name(sub)?.to_string()),
                    None => None,
                };
                components.push(ComponentSpec {
                    factory: subcircuit.is_none().then(|| entry.factory.clone()),
                    subcircuit,
                    x: entry.location.x,
                    y: entry.location.y,
                    label: entry.attributes.display_label(),
                    facing: entry
                        .attributes
                        .get(AttributeKey::Facing)?
                        .and_then(|v| match v {
                            AttributeValue::Direction(d) => Some(*d),
                            _ => None,
                        }),
                    tracking: TrackingSpec::from_set(&entry.attributes),
                });
            }
            circuits.push(CircuitSpec {
                name: self.circuit_name(id)?.to_string(),
                label: attributes.display_label(),
                tracking: TrackingSpec::from_set(attributes),
                components,
            });
        }
        Ok(DesignSpec {
            root: self.circuit_name(root_circuit)?.to_string(),
            circuits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{ChildRef, HierarchySource};
    use crate::ids::ElementRef;

    const SAMPLE: &str = r#"{
        "root": "main",
        "circuits": [
            {
                "name": "main",
                "tracking": { "owner": "alice", "version": "1.0" },
                "components": [
                    { "subcircuit": "adder", "x": 0, "y": 0, "label": "lsb" },
                    { "factory": "Pin", "x": 40, "y": 10, "facing": "west" }
                ]
            },
            {
                "name": "adder",
                "components": [
                    { "factory": "XOR Gate", "x": 10, "y": 20,
                      "tracking": { "owner": "bob", "date": "2024-01-02 03:04:05" } }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_load_sample() {
        let spec = DesignSpec::from_json(SAMPLE).unwrap();
        let (design, root) = DesignHierarchy::from_spec(&spec).unwrap();
        assert_eq!(design.pending_events(), 0);

        let children = design.children(root);
        assert_eq!(children.len(), 2);
        let ChildRef::State(adder) = children[0] else {
            panic!("expected nested state first, got {:?}", children[0]);
        };
        let record = design.tracking_record(ElementRef::State(root)).unwrap();
        assert_eq!(record.owner.as_deref(), Some("alice"));

        let ChildRef::Component(xor) = design.children(adder)[0] else {
            panic!("expected a leaf");
        };
        let record = design.tracking_record(xor.into()).unwrap();
        assert_eq!(record.owner.as_deref(), Some("bob"));
        assert!(record.date.is_some());
    }

    #[test]
    fn test_to_spec_preserves_description() {
        let spec = DesignSpec::from_json(SAMPLE).unwrap();
        let (design, root) = DesignHierarchy::from_spec(&spec).unwrap();
        assert_eq!(design.to_spec(root).unwrap(), spec);
    }

    #[test]
    fn test_unknown_subcircuit_is_rejected() {
        let spec = DesignSpec::from_json(
            r#"{ "root": "main", "circuits": [
                { "name": "main", "components": [ { "subcircuit": "ghost", "x": 0, "y": 0 } ] }
            ] }"#,
        )
        .unwrap();
        let err = DesignHierarchy::from_spec(&spec).unwrap_err();
        assert!(matches!(err, ModelError::UnknownCircuit(name) if name == "ghost"));
    }

    #[test]
    fn test_component_needs_one_kind() {
        let spec = DesignSpec::from_json(
            r#"{ "root": "main", "circuits": [
                { "name": "main", "components": [ { "x": 0, "y": 0 } ] }
            ] }"#,
        )
        .unwrap();
        assert!(matches!(
            DesignHierarchy::from_spec(&spec),
            Err(ModelError::InvalidSpec { .. })
        ));
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let spec = DesignSpec::from_json(
            r#"{ "root": "main", "circuits": [
                { "name": "main", "tracking": { "date": "yesterday" } }
            ] }"#,
        )
        .unwrap();
        assert!(matches!(
            DesignHierarchy::from_spec(&spec),
            Err(ModelError::InvalidTimestamp { .. })
        ));
    }
}
