//! Keeps the materialized outline in step with the hierarchy graph.
//!
//! The root is loaded eagerly; every other circuit node is loaded when it is
//! expanded. Loading always rebuilds the child list from the graph, but
//! children whose element survived keep their node (and loaded subtree), so
//! a host's expansion state is not lost on every edit.
//!
//! Notifications produced by an operation are queued while the tree is
//! being mutated and delivered once the mutation is complete. Listeners only
//! see the event, never the engine, so they cannot re-enter a load.

use std::collections::HashMap;

use tracing::{debug, info_span, trace};
use tracker_model::{
    AttributeEvent, ChildRef, ElementRef, HierarchySource, Listeners, StateRef, StructuralChange,
};

use crate::config::OutlineConfig;
use crate::error::{OutlineError, Result};
use crate::ordering::SortKey;
use crate::path::PathResolver;
use crate::tree::{LoadState, NodeId, NodeKind, OutlineTree};

/// View-change notification, addressed by the root-to-node id path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineEvent {
    /// The node's presentation changed; its children did not.
    NodeChanged { path: Vec<NodeId> },
    /// The node's child list was rebuilt.
    StructureChanged { path: Vec<NodeId> },
}

impl OutlineEvent {
    pub fn path(&self) -> &[NodeId] {
        match self {
            Self::NodeChanged { path } | Self::StructureChanged { path } => path,
        }
    }

    /// Node the event is about.
    pub fn node(&self) -> Option<NodeId> {
        self.path().last().copied()
    }
}

/// Lazily materialized, incrementally updated outline.
#[derive(Debug)]
pub struct TreeSyncEngine {
    tree: OutlineTree,
    current_view: Option<StateRef>,
    config: OutlineConfig,
    listeners: Listeners<OutlineEvent>,
    queued: Vec<OutlineEvent>,
}

impl TreeSyncEngine {
    /// Build the root node for `root` and load its immediate children.
    pub fn construct<S>(source: &S, root: StateRef, config: OutlineConfig) -> Self
    where
        S: HierarchySource + ?Sized,
    {
        let mut engine = Self {
            tree: OutlineTree::new(root),
            current_view: None,
            config,
            listeners: Listeners::new(),
            queued: Vec::new(),
        };
        let root_node = engine.tree.root();
        engine.load_children(source, root_node);
        // Nobody can be subscribed yet.
        engine.queued.clear();
        engine
    }

    pub fn tree(&self) -> &OutlineTree {
        &self.tree
    }

    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Listener bus for view changes.
    pub fn listeners(&self) -> &Listeners<OutlineEvent> {
        &self.listeners
    }

    /// Compute (or recompute) a circuit node's children.
    ///
    /// Two expansions with no structural change in between return the same
    /// nodes in the same order. Emits `StructureChanged` for the node.
    pub fn expand<S>(&mut self, source: &S, node: NodeId) -> Result<Vec<NodeId>>
    where
        S: HierarchySource + ?Sized,
    {
        let entry = self.tree.get(node).ok_or(OutlineError::UnknownNode(node))?;
        if entry.is_component() {
            return Err(OutlineError::NotExpandable(node));
        }
        let children = self.load_children(source, node);
        self.flush();
        Ok(children)
    }

    /// Rebuild a circuit node's children from the graph and queue a
    /// `StructureChanged` for it.
    ///
    /// Children are reused when their element is still present; children
    /// whose element disappeared are destroyed with their subtrees.
    pub fn load_children<S>(&mut self, source: &S, node: NodeId) -> Vec<NodeId>
    where
        S: HierarchySource + ?Sized,
    {
        let Some(state) = self.tree.get(node).and_then(|n| n.state()) else {
            return Vec::new();
        };
        let _span = info_span!("expand", %state).entered();

        let previous: Vec<NodeId> = self.tree.children(node).map(<[_]>::to_vec).unwrap_or_default();
        let mut reusable: HashMap<ChildRef, NodeId> = previous
            .iter()
            .filter_map(|id| {
                let child = self.tree.get(*id)?;
                let key = match &child.kind {
                    NodeKind::Circuit(circuit) => ChildRef::State(circuit.state),
                    NodeKind::Component(component) => ChildRef::Component(component.component),
                };
                Some((key, *id))
            })
            .collect();

        let mut keyed: Vec<(SortKey, NodeId)> = Vec::new();
        for child in source.children(state) {
            let entry = match child {
                ChildRef::State(sub) => source.describe_state(sub).map(|info| {
                    let id = reusable
                        .remove(&child)
                        .unwrap_or_else(|| self.tree.insert_circuit(node, sub, info.placement));
                    (SortKey::for_state(child, &info), id)
                }),
                ChildRef::Component(component) => {
                    source.describe_component(component).map(|info| {
                        let id = reusable
                            .remove(&child)
                            .unwrap_or_else(|| self.tree.insert_component(node, component));
                        (SortKey::for_component(child, &info), id)
                    })
                }
            };
            match entry {
                Some(entry) => keyed.push(entry),
                None => trace!(?child, "child vanished while loading"),
            }
        }

        for (_, stale) in reusable {
            self.tree.remove_subtree(stale);
        }

        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        let children: Vec<NodeId> = keyed.into_iter().map(|(_, id)| id).collect();
        debug!(%node, count = children.len(), "loaded children");
        self.tree.set_load(node, LoadState::Loaded(children.clone()));
        self.queue_structure_changed(node);
        children
    }

    /// React to a structural change of the state `state`.
    pub fn on_structural_event<S>(&mut self, source: &S, state: StateRef, change: StructuralChange)
    where
        S: HierarchySource + ?Sized,
    {
        if change == StructuralChange::Invalidated {
            trace!(%state, "ignoring invalidation");
            return;
        }
        let Some(node) = self.tree.node_for_state(state) else {
            trace!(%state, ?change, "structural event for unmaterialized state");
            return;
        };
        match change {
            StructuralChange::NameChanged => self.queue_node_changed(node),
            _ if self.tree.is_loaded(node) => {
                self.load_children(source, node);
            }
            _ => self.queue_structure_changed(node),
        }
        self.flush();
    }

    /// React to an attribute change on a state's circuit or a component.
    ///
    /// Only label-like keys change what a node shows.
    pub fn on_attribute_event(&mut self, target: ElementRef, event: &AttributeEvent) {
        let Some(key) = event.key() else {
            return;
        };
        if !key.is_display_label() {
            trace!(%target, %key, "attribute change does not affect labels");
            return;
        }
        let nodes = match target {
            ElementRef::State(state) => self.tree.node_for_state(state).into_iter().collect(),
            ElementRef::Component(component) => {
                let mut nodes = self.tree.nodes_placed_by(component);
                nodes.extend(self.tree.nodes_for_component(component));
                nodes
            }
        };
        for node in nodes {
            self.queue_node_changed(node);
        }
        self.flush();
    }

    /// Notify every materialized node, e.g. after the author selection
    /// changed and every validity overlay must be redrawn.
    pub fn repaint(&mut self) {
        for node in self.tree.node_ids() {
            self.queue_node_changed(node);
        }
        self.flush();
    }

    pub fn current_view(&self) -> Option<StateRef> {
        self.current_view
    }

    /// Whether `node` is bound to the focused state.
    pub fn is_current_view(&self, node: NodeId) -> bool {
        self.current_view.is_some()
            && self.tree.get(node).and_then(|n| n.state()) == self.current_view
    }

    /// Move the focus. Old and new focus nodes that are materialized get a
    /// `NodeChanged`; unresolvable states are skipped silently.
    pub fn set_current_view<S>(&mut self, source: &S, state: Option<StateRef>)
    where
        S: HierarchySource + ?Sized,
    {
        if self.current_view == state {
            return;
        }
        let old = std::mem::replace(&mut self.current_view, state);
        for focus in [old, state].into_iter().flatten() {
            if let Some(node) = self.resolver().map_to_node(source, focus) {
                self.queue_node_changed(node);
            }
        }
        self.flush();
    }

    pub fn map_to_path<S>(&self, source: &S, state: StateRef) -> Option<Vec<NodeId>>
    where
        S: HierarchySource + ?Sized,
    {
        self.resolver().map_to_path(source, state)
    }

    pub fn map_to_node<S>(&self, source: &S, state: StateRef) -> Option<NodeId>
    where
        S: HierarchySource + ?Sized,
    {
        self.resolver().map_to_node(source, state)
    }

    pub fn resolver(&self) -> PathResolver<'_> {
        PathResolver::new(&self.tree, self.config.max_depth)
    }

    fn queue_node_changed(&mut self, node: NodeId) {
        let event = OutlineEvent::NodeChanged {
            path: self.tree.path_to(node),
        };
        self.queue(event);
    }

    fn queue_structure_changed(&mut self, node: NodeId) {
        let event = OutlineEvent::StructureChanged {
            path: self.tree.path_to(node),
        };
        self.queue(event);
    }

    fn queue(&mut self, event: OutlineEvent) {
        if !self.queued.contains(&event) {
            self.queued.push(event);
        }
    }

    /// Deliver queued notifications.
    fn flush(&mut self) {
        for event in std::mem::take(&mut self.queued) {
            self.listeners.emit(&event);
        }
    }
}
