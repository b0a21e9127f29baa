//! Arena of materialized outline nodes.
//!
//! Nodes are owned by the arena and addressed by [`NodeId`]. A node has one
//! parent (the root has none). A circuit node is bound to exactly one
//! hierarchy state for its whole life; the arena keeps a state index so
//! events addressed to a state find their node without a walk.

use std::collections::HashMap;
use std::fmt;

use tracker_model::{ComponentRef, ElementRef, StateRef};

/// Handle of a materialized node. Never reused within one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Whether a circuit node's children have been computed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Unloaded,
    Loaded(Vec<NodeId>),
}

impl LoadState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn children(&self) -> Option<&[NodeId]> {
        match self {
            Self::Unloaded => None,
            Self::Loaded(children) => Some(children),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitNode {
    pub state: StateRef,
    /// Component that placed the state; `None` for the root.
    pub placement: Option<ComponentRef>,
    pub load: LoadState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentNode {
    pub component: ComponentRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Circuit(CircuitNode),
    Component(ComponentNode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl OutlineNode {
    pub fn as_circuit(&self) -> Option<&CircuitNode> {
        match &self.kind {
            NodeKind::Circuit(circuit) => Some(circuit),
            NodeKind::Component(_) => None,
        }
    }

    pub fn state(&self) -> Option<StateRef> {
        self.as_circuit().map(|c| c.state)
    }

    /// Element whose attributes describe this node.
    pub fn element(&self) -> ElementRef {
        match &self.kind {
            NodeKind::Circuit(circuit) => ElementRef::State(circuit.state),
            NodeKind::Component(component) => ElementRef::Component(component.component),
        }
    }

    pub fn is_component(&self) -> bool {
        matches!(self.kind, NodeKind::Component(_))
    }
}

/// The materialized outline.
#[derive(Debug, Clone)]
pub struct OutlineTree {
    nodes: HashMap<NodeId, OutlineNode>,
    by_state: HashMap<StateRef, NodeId>,
    root: NodeId,
    next_id: u64,
}

impl OutlineTree {
    /// Tree holding a single, unloaded root bound to `state`.
    pub fn new(state: StateRef) -> Self {
        let root = NodeId(0);
        let mut tree = Self {
            nodes: HashMap::new(),
            by_state: HashMap::new(),
            root,
            next_id: 1,
        };
        tree.nodes.insert(
            root,
            OutlineNode {
                id: root,
                parent: None,
                kind: NodeKind::Circuit(CircuitNode {
                    state,
                    placement: None,
                    load: LoadState::Unloaded,
                }),
            },
        );
        tree.by_state.insert(state, root);
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_state(&self) -> Option<StateRef> {
        self.get(self.root).and_then(OutlineNode::state)
    }

    pub fn get(&self, id: NodeId) -> Option<&OutlineNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of materialized nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root exists for the tree's whole life.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every materialized node, in id order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Circuit node bound to a state, if materialized.
    pub fn node_for_state(&self, state: StateRef) -> Option<NodeId> {
        self.by_state.get(&state).copied()
    }

    /// Loaded children of a node; `None` if unloaded or a component.
    pub fn children(&self, id: NodeId) -> Option<&[NodeId]> {
        self.get(id)
            .and_then(OutlineNode::as_circuit)
            .and_then(|c| c.load.children())
    }

    pub fn is_loaded(&self, id: NodeId) -> bool {
        self.children(id).is_some()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Ids from the root down to `id`, inclusive.
    pub fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.get(id).map(|n| n.id);
        while let Some(node) = current {
            path.push(node);
            current = self.parent(node);
        }
        path.reverse();
        path
    }

    /// Circuit nodes whose state was placed by `component`.
    pub fn nodes_placed_by(&self, component: ComponentRef) -> Vec<NodeId> {
        self.collect(|kind| match kind {
            NodeKind::Circuit(circuit) => circuit.placement == Some(component),
            NodeKind::Component(_) => false,
        })
    }

    /// Component nodes showing `component`.
    pub fn nodes_for_component(&self, component: ComponentRef) -> Vec<NodeId> {
        self.collect(|kind| match kind {
            NodeKind::Circuit(_) => false,
            NodeKind::Component(node) => node.component == component,
        })
    }

    fn collect(&self, pred: impl Fn(&NodeKind) -> bool) -> Vec<NodeId> {
        let mut found: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| pred(&n.kind))
            .map(|n| n.id)
            .collect();
        found.sort_unstable();
        found
    }

    pub(crate) fn insert_circuit(
        &mut self,
        parent: NodeId,
        state: StateRef,
        placement: Option<ComponentRef>,
    ) -> NodeId {
        let id = self.allocate();
        self.nodes.insert(
            id,
            OutlineNode {
                id,
                parent: Some(parent),
                kind: NodeKind::Circuit(CircuitNode {
                    state,
                    placement,
                    load: LoadState::Unloaded,
                }),
            },
        );
        self.by_state.insert(state, id);
        id
    }

    pub(crate) fn insert_component(&mut self, parent: NodeId, component: ComponentRef) -> NodeId {
        let id = self.allocate();
        self.nodes.insert(
            id,
            OutlineNode {
                id,
                parent: Some(parent),
                kind: NodeKind::Component(ComponentNode { component }),
            },
        );
        id
    }

    fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Replace a circuit node's load state.
    pub(crate) fn set_load(&mut self, id: NodeId, load: LoadState) {
        if let Some(OutlineNode {
            kind: NodeKind::Circuit(circuit),
            ..
        }) = self.nodes.get_mut(&id)
        {
            circuit.load = load;
        }
    }

    /// Destroy a node and everything below it.
    pub(crate) fn remove_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.remove(&current) else {
                continue;
            };
            if let NodeKind::Circuit(circuit) = node.kind {
                if self.by_state.get(&circuit.state) == Some(&current) {
                    self.by_state.remove(&circuit.state);
                }
                if let LoadState::Loaded(children) = circuit.load {
                    stack.extend(children);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_unloaded() {
        let tree = OutlineTree::new(StateRef::from_raw(5));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root_state(), Some(StateRef::from_raw(5)));
        assert_eq!(tree.node_for_state(StateRef::from_raw(5)), Some(tree.root()));
        assert!(!tree.is_loaded(tree.root()));
    }

    #[test]
    fn test_remove_subtree_clears_index() {
        let mut tree = OutlineTree::new(StateRef::from_raw(0));
        let root = tree.root();
        let child = tree.insert_circuit(root, StateRef::from_raw(1), Some(ComponentRef::from_raw(9)));
        let leaf = tree.insert_component(child, ComponentRef::from_raw(3));
        tree.set_load(child, LoadState::Loaded(vec![leaf]));
        tree.set_load(root, LoadState::Loaded(vec![child]));

        assert_eq!(tree.path_to(leaf), vec![root, child, leaf]);
        assert_eq!(tree.nodes_placed_by(ComponentRef::from_raw(9)), vec![child]);

        tree.remove_subtree(child);
        assert_eq!(tree.len(), 1);
        assert!(tree.node_for_state(StateRef::from_raw(1)).is_none());
        assert!(!tree.contains(leaf));
        assert!(tree.path_to(leaf).is_empty());
    }
}
