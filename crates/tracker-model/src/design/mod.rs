//! In-memory hierarchy graph.
//!
//! Circuits are definitions; components are placed in exactly one circuit;
//! states are instantiations. Placing a subcircuit component instantiates a
//! fresh child state in every existing state of the containing circuit, so a
//! circuit used twice yields two distinct subtrees.
//!
//! Every edit queues [`DesignEvent`]s which a consumer pulls through
//! [`DesignEvents::drain_events`].

mod spec;

use std::collections::BTreeMap;

use tracing::{debug, trace};

pub use spec::{CircuitSpec, ComponentSpec, DesignSpec, TrackingSpec};

use crate::attributes::{AttributeKey, AttributeRecord, AttributeSet, AttributeValue};
use crate::error::{ModelError, Result};
use crate::events::{AttributeEvent, DesignEvent, StructuralChange};
use crate::hierarchy::{ChildRef, ComponentInfo, DesignEvents, HierarchySource, StateInfo};
use crate::ids::{CircuitId, ComponentRef, ElementRef, Location, StateRef};

#[derive(Debug, Clone)]
struct Circuit {
    attributes: AttributeSet,
    components: Vec<ComponentRef>,
}

#[derive(Debug, Clone)]
struct Component {
    circuit: CircuitId,
    factory: String,
    subcircuit: Option<CircuitId>,
    location: Location,
    attributes: AttributeSet,
}

#[derive(Debug, Clone)]
struct State {
    circuit: CircuitId,
    parent: Option<StateRef>,
    placement: Option<ComponentRef>,
    /// Child instance per subcircuit component.
    nested: BTreeMap<ComponentRef, StateRef>,
}

/// Mutable, instantiated design.
#[derive(Debug, Default)]
pub struct DesignHierarchy {
    circuits: BTreeMap<CircuitId, Circuit>,
    components: BTreeMap<ComponentRef, Component>,
    states: BTreeMap<StateRef, State>,
    next_circuit: u64,
    next_component: u64,
    next_state: u64,
    pending: Vec<DesignEvent>,
}

impl DesignHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Circuit definitions
    // ---------------------------------------------------------------------

    /// Define a new, empty circuit.
    pub fn add_circuit(&mut self, name: &str) -> Result<CircuitId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ModelError::InvalidSpec {
                reason: "circuit name must not be empty".to_string(),
            });
        }
        if self.circuit_by_name(name).is_some() {
            return Err(ModelError::DuplicateCircuit(name.to_string()));
        }
        let id = CircuitId::from_raw(self.next_circuit);
        self.next_circuit += 1;

        let mut attributes = AttributeSet::for_circuit();
        attributes.set(AttributeKey::CircuitName, name)?;
        self.circuits.insert(
            id,
            Circuit {
                attributes,
                components: Vec::new(),
            },
        );
        debug!(circuit = %id, name, "defined circuit");
        Ok(id)
    }

    pub fn circuit_by_name(&self, name: &str) -> Option<CircuitId> {
        self.circuits
            .iter()
            .find(|(_, circuit)| Self::name_of(circuit) == name)
            .map(|(id, _)| *id)
    }

    pub fn circuit_name(&self, circuit: CircuitId) -> Result<&str> {
        Ok(Self::name_of(self.circuit(circuit)?))
    }

    /// All circuit definitions, in creation order.
    pub fn circuits(&self) -> impl Iterator<Item = CircuitId> + '_ {
        self.circuits.keys().copied()
    }

    /// Components placed in a circuit, in placement order.
    pub fn components_of(&self, circuit: CircuitId) -> Result<&[ComponentRef]> {
        Ok(&self.circuit(circuit)?.components)
    }

    pub fn circuit_attributes(&self, circuit: CircuitId) -> Result<&AttributeSet> {
        Ok(&self.circuit(circuit)?.attributes)
    }

    fn name_of(circuit: &Circuit) -> &str {
        circuit
            .attributes
            .text(AttributeKey::CircuitName)
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    fn circuit(&self, circuit: CircuitId) -> Result<&Circuit> {
        self.circuits
            .get(&circuit)
            .ok_or_else(|| ModelError::UnknownCircuit(circuit.to_string()))
    }

    fn circuit_mut(&mut self, circuit: CircuitId) -> Result<&mut Circuit> {
        self.circuits
            .get_mut(&circuit)
            .ok_or_else(|| ModelError::UnknownCircuit(circuit.to_string()))
    }

    /// Whether `outer` is `inner` or contains it at any depth.
    fn contains_circuit(&self, outer: CircuitId, inner: CircuitId) -> bool {
        if outer == inner {
            return true;
        }
        let Some(circuit) = self.circuits.get(&outer) else {
            return false;
        };
        circuit.components.iter().any(|component| {
            self.components
                .get(component)
                .and_then(|c| c.subcircuit)
                .is_some_and(|sub| self.contains_circuit(sub, inner))
        })
    }

    // ---------------------------------------------------------------------
    // Instantiation
    // ---------------------------------------------------------------------

    /// Instantiate a circuit as a hierarchy root.
    pub fn instantiate_root(&mut self, circuit: CircuitId) -> Result<StateRef> {
        self.circuit(circuit)?;
        let root = self.instantiate(circuit, None, None);
        debug!(circuit = %circuit, state = %root, "instantiated root");
        Ok(root)
    }

    fn instantiate(
        &mut self,
        circuit: CircuitId,
        parent: Option<StateRef>,
        placement: Option<ComponentRef>,
    ) -> StateRef {
        let state = StateRef::from_raw(self.next_state);
        self.next_state += 1;
        self.states.insert(
            state,
            State {
                circuit,
                parent,
                placement,
                nested: BTreeMap::new(),
            },
        );

        let placed: Vec<(ComponentRef, CircuitId)> = self
            .circuits
            .get(&circuit)
            .map(|c| {
                c.components
                    .iter()
                    .filter_map(|r| {
                        self.components
                            .get(r)
                            .and_then(|comp| comp.subcircuit.map(|sub| (*r, sub)))
                    })
                    .collect()
            })
            .unwrap_or_default();
        for (component, sub) in placed {
            let child = self.instantiate(sub, Some(state), Some(component));
            if let Some(entry) = self.states.get_mut(&state) {
                entry.nested.insert(component, child);
            }
        }
        state
    }

    fn destroy_state(&mut self, state: StateRef) {
        if let Some(removed) = self.states.remove(&state) {
            for child in removed.nested.into_values() {
                self.destroy_state(child);
            }
        }
    }

    /// Every live instantiation of a circuit.
    pub fn states_of(&self, circuit: CircuitId) -> Vec<StateRef> {
        self.states
            .iter()
            .filter(|(_, s)| s.circuit == circuit)
            .map(|(r, _)| *r)
            .collect()
    }

    pub fn circuit_of(&self, state: StateRef) -> Result<CircuitId> {
        self.states
            .get(&state)
            .map(|s| s.circuit)
            .ok_or(ModelError::UnknownState(state))
    }

    /// Child instance created in `state` by a subcircuit component.
    pub fn nested_state(&self, state: StateRef, component: ComponentRef) -> Option<StateRef> {
        self.states
            .get(&state)
            .and_then(|s| s.nested.get(&component).copied())
    }

    /// Number of live states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    // ---------------------------------------------------------------------
    // Components
    // ---------------------------------------------------------------------

    /// Place a leaf component.
    pub fn add_component(
        &mut self,
        circuit: CircuitId,
        factory: &str,
        location: Location,
    ) -> Result<ComponentRef> {
        self.circuit(circuit)?;
        let component = self.allocate_component(circuit, factory.to_string(), None, location);
        self.queue_structural(circuit, StructuralChange::ComponentAdded);
        Ok(component)
    }

    /// Place an instance of `child` inside `parent`.
    ///
    /// Every existing state of `parent` gets a fresh child state.
    pub fn add_subcircuit(
        &mut self,
        parent: CircuitId,
        child: CircuitId,
        location: Location,
    ) -> Result<ComponentRef> {
        self.circuit(parent)?;
        let child_name = self.circuit_name(child)?.to_string();
        if self.contains_circuit(child, parent) {
            return Err(ModelError::RecursiveInstantiation {
                parent: self.circuit_name(parent)?.to_string(),
                child: child_name,
            });
        }

        let component = self.allocate_component(parent, child_name, Some(child), location);
        for state in self.states_of(parent) {
            let nested = self.instantiate(child, Some(state), Some(component));
            if let Some(entry) = self.states.get_mut(&state) {
                entry.nested.insert(component, nested);
            }
        }
        self.queue_structural(parent, StructuralChange::ComponentAdded);
        Ok(component)
    }

    fn allocate_component(
        &mut self,
        circuit: CircuitId,
        factory: String,
        subcircuit: Option<CircuitId>,
        location: Location,
    ) -> ComponentRef {
        let component = ComponentRef::from_raw(self.next_component);
        self.next_component += 1;
        self.components.insert(
            component,
            Component {
                circuit,
                factory,
                subcircuit,
                location,
                attributes: AttributeSet::for_component(),
            },
        );
        if let Some(entry) = self.circuits.get_mut(&circuit) {
            entry.components.push(component);
        }
        component
    }

    /// Remove a component, destroying any instances it placed.
    pub fn remove_component(&mut self, component: ComponentRef) -> Result<()> {
        let removed = self
            .components
            .remove(&component)
            .ok_or(ModelError::UnknownComponent(component))?;
        if let Some(circuit) = self.circuits.get_mut(&removed.circuit) {
            circuit.components.retain(|c| *c != component);
        }
        for state in self.states_of(removed.circuit) {
            let nested = self
                .states
                .get_mut(&state)
                .and_then(|s| s.nested.remove(&component));
            if let Some(nested) = nested {
                self.destroy_state(nested);
            }
        }
        self.queue_structural(removed.circuit, StructuralChange::ComponentRemoved);
        Ok(())
    }

    /// Circuit a component is placed in.
    pub fn component_circuit(&self, component: ComponentRef) -> Result<CircuitId> {
        Ok(self.component(component)?.circuit)
    }

    /// Circuit instantiated by a subcircuit component.
    pub fn component_subcircuit(&self, component: ComponentRef) -> Result<Option<CircuitId>> {
        Ok(self.component(component)?.subcircuit)
    }

    pub fn component_location(&self, component: ComponentRef) -> Result<Location> {
        Ok(self.component(component)?.location)
    }

    pub fn component_attributes(&self, component: ComponentRef) -> Result<&AttributeSet> {
        Ok(&self.component(component)?.attributes)
    }

    fn component(&self, component: ComponentRef) -> Result<&Component> {
        self.components
            .get(&component)
            .ok_or(ModelError::UnknownComponent(component))
    }

    fn component_factory(&self, component: &Component) -> String {
        match component.subcircuit {
            Some(sub) => self
                .circuits
                .get(&sub)
                .map(|c| Self::name_of(c).to_string())
                .unwrap_or_else(|| component.factory.clone()),
            None => component.factory.clone(),
        }
    }

    // ---------------------------------------------------------------------
    // Attributes
    // ---------------------------------------------------------------------

    /// Rename a circuit definition.
    pub fn rename_circuit(&mut self, circuit: CircuitId, name: &str) -> Result<()> {
        self.set_circuit_attribute(circuit, AttributeKey::CircuitName, name)
    }

    /// Write a static attribute of a circuit.
    pub fn set_circuit_attribute(
        &mut self,
        circuit: CircuitId,
        key: AttributeKey,
        value: impl Into<AttributeValue>,
    ) -> Result<()> {
        let value = value.into();
        if key == AttributeKey::CircuitName {
            self.check_rename(circuit, &value)?;
        }
        let event = self.circuit_mut(circuit)?.attributes.set(key, value)?;
        if let Some(event) = event {
            self.queue_circuit_attribute(circuit, event);
        }
        Ok(())
    }

    pub fn clear_circuit_attribute(&mut self, circuit: CircuitId, key: AttributeKey) -> Result<()> {
        if key == AttributeKey::CircuitName {
            return Err(ModelError::InvalidSpec {
                reason: "a circuit name cannot be cleared".to_string(),
            });
        }
        let event = self.circuit_mut(circuit)?.attributes.clear(key)?;
        if let Some(event) = event {
            self.queue_circuit_attribute(circuit, event);
        }
        Ok(())
    }

    /// Write an attribute of a component.
    pub fn set_component_attribute(
        &mut self,
        component: ComponentRef,
        key: AttributeKey,
        value: impl Into<AttributeValue>,
    ) -> Result<()> {
        let event = self.component_mut(component)?.attributes.set(key, value)?;
        if let Some(event) = event {
            self.queue(DesignEvent::Attribute {
                target: component.into(),
                event,
            });
        }
        Ok(())
    }

    pub fn clear_component_attribute(
        &mut self,
        component: ComponentRef,
        key: AttributeKey,
    ) -> Result<()> {
        let event = self.component_mut(component)?.attributes.clear(key)?;
        if let Some(event) = event {
            self.queue(DesignEvent::Attribute {
                target: component.into(),
                event,
            });
        }
        Ok(())
    }

    /// Edit a circuit's static attributes in place.
    ///
    /// The closure works on a copy; nothing is applied if it fails. One event
    /// is queued per changed value.
    pub fn modify_circuit_attributes<F>(&mut self, circuit: CircuitId, edit: F) -> Result<()>
    where
        F: FnOnce(&mut AttributeSet) -> Result<()>,
    {
        let before = self.circuit(circuit)?.attributes.clone();
        let mut after = before.clone();
        edit(&mut after)?;
        let name = after.get(AttributeKey::CircuitName)?.cloned();
        if let Some(name) = name {
            self.check_rename(circuit, &name)?;
        }
        let events = before.diff(&after);
        self.circuit_mut(circuit)?.attributes = after;
        for event in events {
            self.queue_circuit_attribute(circuit, event);
        }
        Ok(())
    }

    /// Edit a component's attributes in place. See
    /// [`modify_circuit_attributes`](Self::modify_circuit_attributes).
    pub fn modify_component_attributes<F>(&mut self, component: ComponentRef, edit: F) -> Result<()>
    where
        F: FnOnce(&mut AttributeSet) -> Result<()>,
    {
        let before = self.component(component)?.attributes.clone();
        let mut after = before.clone();
        edit(&mut after)?;
        let events = before.diff(&after);
        self.component_mut(component)?.attributes = after;
        for event in events {
            self.queue(DesignEvent::Attribute {
                target: component.into(),
                event,
            });
        }
        Ok(())
    }

    fn component_mut(&mut self, component: ComponentRef) -> Result<&mut Component> {
        self.components
            .get_mut(&component)
            .ok_or(ModelError::UnknownComponent(component))
    }

    fn check_rename(&self, circuit: CircuitId, value: &AttributeValue) -> Result<()> {
        let Some(name) = value.as_text() else {
            return Ok(());
        };
        if name.trim().is_empty() {
            return Err(ModelError::InvalidSpec {
                reason: "circuit name must not be empty".to_string(),
            });
        }
        match self.circuit_by_name(name) {
            Some(existing) if existing != circuit => {
                Err(ModelError::DuplicateCircuit(name.to_string()))
            }
            _ => Ok(()),
        }
    }

    // ---------------------------------------------------------------------
    // Notifications
    // ---------------------------------------------------------------------

    /// Report a wiring change in every instance of a circuit.
    pub fn mark_connectivity_changed(&mut self, circuit: CircuitId) -> Result<()> {
        self.circuit(circuit)?;
        self.queue_structural(circuit, StructuralChange::ConnectivityChanged);
        Ok(())
    }

    /// Send a transient invalidation signal for every instance of a circuit.
    pub fn invalidate(&mut self, circuit: CircuitId) -> Result<()> {
        self.circuit(circuit)?;
        self.queue_structural(circuit, StructuralChange::Invalidated);
        Ok(())
    }

    /// Number of queued, undrained events.
    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }

    fn queue(&mut self, event: DesignEvent) {
        trace!(?event, "queued design event");
        self.pending.push(event);
    }

    fn queue_structural(&mut self, circuit: CircuitId, change: StructuralChange) {
        for state in self.states_of(circuit) {
            self.queue(DesignEvent::Structural { state, change });
        }
    }

    fn queue_circuit_attribute(&mut self, circuit: CircuitId, event: AttributeEvent) {
        let renamed = event.key() == Some(AttributeKey::CircuitName);
        for state in self.states_of(circuit) {
            self.queue(DesignEvent::Attribute {
                target: state.into(),
                event: event.clone(),
            });
            if renamed {
                self.queue(DesignEvent::Structural {
                    state,
                    change: StructuralChange::NameChanged,
                });
            }
        }
    }
}

impl HierarchySource for DesignHierarchy {
    fn children(&self, state: StateRef) -> Vec<ChildRef> {
        let Some(entry) = self.states.get(&state) else {
            return Vec::new();
        };
        let Some(circuit) = self.circuits.get(&entry.circuit) else {
            return Vec::new();
        };
        circuit
            .components
            .iter()
            .filter_map(|component| match entry.nested.get(component) {
                Some(nested) => Some(ChildRef::State(*nested)),
                None => self
                    .components
                    .get(component)
                    .filter(|c| c.subcircuit.is_none())
                    .map(|_| ChildRef::Component(*component)),
            })
            .collect()
    }

    fn parent(&self, state: StateRef) -> Option<StateRef> {
        self.states.get(&state).and_then(|s| s.parent)
    }

    fn describe_state(&self, state: StateRef) -> Option<StateInfo> {
        let entry = self.states.get(&state)?;
        let circuit = self.circuits.get(&entry.circuit)?;
        let placed = entry.placement.and_then(|p| self.components.get(&p));
        Some(StateInfo {
            circuit: Self::name_of(circuit).to_string(),
            placement: entry.placement,
            label: placed.and_then(|c| c.attributes.display_label()),
            location: placed.map(|c| c.location).unwrap_or_default(),
        })
    }

    fn describe_component(&self, component: ComponentRef) -> Option<ComponentInfo> {
        let entry = self.components.get(&component)?;
        Some(ComponentInfo {
            factory: self.component_factory(entry),
            label: entry.attributes.display_label(),
            location: entry.location,
        })
    }

    fn tracking_record(&self, target: ElementRef) -> Option<AttributeRecord> {
        match target {
            ElementRef::State(state) => {
                let entry = self.states.get(&state)?;
                self.circuits
                    .get(&entry.circuit)
                    .map(|c| c.attributes.tracking_record())
            }
            ElementRef::Component(component) => self
                .components
                .get(&component)
                .map(|c| c.attributes.tracking_record()),
        }
    }
}

impl DesignEvents for DesignHierarchy {
    fn drain_events(&mut self) -> Vec<DesignEvent> {
        std::mem::take(&mut self.pending)
    }

    fn has_pending_events(&self) -> bool {
        !self.pending.is_empty()
    }
}
