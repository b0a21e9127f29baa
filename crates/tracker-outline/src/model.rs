//! Read-only presentation surface over a [`TreeSyncEngine`].

use serde::Serialize;
use tracker_integrity::IntegrityStatus;
use tracker_model::{ElementRef, HierarchySource};

use crate::engine::TreeSyncEngine;
use crate::ordering::display_name;
use crate::tree::{NodeId, NodeKind};
use crate::validity::{NodeValidity, ValidityAggregator};

/// What a host should draw in front of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IconKey {
    /// A circuit instance, highlighted when it is the current view.
    Circuit { name: String, current_view: bool },
    /// A leaf component, drawn by its factory.
    Component { factory: String },
}

/// Tree-model queries for a view widget.
///
/// Child queries only see loaded levels; an unloaded circuit reports no
/// children until it is expanded.
pub struct OutlineModel<'a, S: ?Sized> {
    engine: &'a TreeSyncEngine,
    source: &'a S,
    validity: ValidityAggregator<'a>,
}

impl<'a, S> OutlineModel<'a, S>
where
    S: HierarchySource + ?Sized,
{
    pub fn new(engine: &'a TreeSyncEngine, source: &'a S, validity: ValidityAggregator<'a>) -> Self {
        Self {
            engine,
            source,
            validity,
        }
    }

    pub fn root(&self) -> NodeId {
        self.engine.root()
    }

    pub fn child_count(&self, node: NodeId) -> usize {
        self.engine.tree().children(node).map_or(0, <[_]>::len)
    }

    pub fn child(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.engine
            .tree()
            .children(node)
            .and_then(|children| children.get(index).copied())
    }

    pub fn index_of_child(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.engine
            .tree()
            .children(parent)
            .and_then(|children| children.iter().position(|c| *c == child))
    }

    /// Components are leaves; circuits never are, even when empty.
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.engine
            .tree()
            .get(node)
            .is_some_and(|n| n.is_component())
    }

    pub fn is_current_view(&self, node: NodeId) -> bool {
        self.engine.is_current_view(node)
    }

    pub fn validity(&self, node: NodeId) -> NodeValidity {
        self.element(node)
            .map(|element| self.validity.evaluate_element(self.source, element))
            .unwrap_or_default()
    }

    pub fn owner_validity(&self, node: NodeId) -> bool {
        self.validity(node).owner_valid
    }

    pub fn integrity_validity(&self, node: NodeId) -> IntegrityStatus {
        self.validity(node).integrity
    }

    pub fn icon(&self, node: NodeId) -> Option<IconKey> {
        let entry = self.engine.tree().get(node)?;
        match &entry.kind {
            NodeKind::Circuit(circuit) => {
                let info = self.source.describe_state(circuit.state)?;
                Some(IconKey::Circuit {
                    name: info.circuit,
                    current_view: self.is_current_view(node),
                })
            }
            NodeKind::Component(component) => {
                let info = self.source.describe_component(component.component)?;
                Some(IconKey::Component {
                    factory: info.factory,
                })
            }
        }
    }

    /// Display name: `name` or `name - label`.
    pub fn name(&self, node: NodeId) -> Option<String> {
        let entry = self.engine.tree().get(node)?;
        match &entry.kind {
            NodeKind::Circuit(circuit) => {
                let info = self.source.describe_state(circuit.state)?;
                Some(display_name(&info.circuit, info.label.as_deref()))
            }
            NodeKind::Component(component) => {
                let info = self.source.describe_component(component.component)?;
                Some(display_name(&info.factory, info.label.as_deref()))
            }
        }
    }

    /// Recorded owner, if non-empty.
    pub fn owner(&self, node: NodeId) -> Option<String> {
        let element = self.element(node)?;
        self.source
            .tracking_record(element)
            .and_then(|record| record.owner)
            .filter(|owner| !owner.is_empty())
    }

    /// Display name, followed by ` (owner)` when the element has one.
    pub fn label(&self, node: NodeId) -> Option<String> {
        let name = self.name(node)?;
        Some(match self.owner(node) {
            Some(owner) => format!("{name} ({owner})"),
            None => name,
        })
    }

    fn element(&self, node: NodeId) -> Option<ElementRef> {
        self.engine.tree().get(node).map(|n| n.element())
    }
}
