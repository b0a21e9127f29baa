//! State-to-node resolution over the materialized outline.

use tracing::error;
use tracker_model::{HierarchySource, StateRef};

use crate::tree::{NodeId, OutlineTree};

/// Maps hierarchy states to outline paths without loading anything.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    tree: &'a OutlineTree,
    max_depth: usize,
}

impl<'a> PathResolver<'a> {
    pub fn new(tree: &'a OutlineTree, max_depth: usize) -> Self {
        Self { tree, max_depth }
    }

    /// Root-to-node path of the circuit node bound to `state`.
    ///
    /// Returns `None` if any ancestor's node is not materialized, if a level
    /// is unloaded, or if the ancestor chain does not end at the outline
    /// root.
    pub fn map_to_path<S>(&self, source: &S, state: StateRef) -> Option<Vec<NodeId>>
    where
        S: HierarchySource + ?Sized,
    {
        let chain = self.ancestors(source, state)?;
        let (first, rest) = chain.split_first()?;
        if self.tree.root_state() != Some(*first) {
            return None;
        }

        let mut node = self.tree.root();
        let mut path = Vec::with_capacity(chain.len());
        path.push(node);
        for wanted in rest {
            let children = self.tree.children(node)?;
            node = children.iter().copied().find(|child| {
                self.tree.get(*child).and_then(|n| n.state()) == Some(*wanted)
            })?;
            path.push(node);
        }
        Some(path)
    }

    /// Last node of [`map_to_path`](Self::map_to_path).
    pub fn map_to_node<S>(&self, source: &S, state: StateRef) -> Option<NodeId>
    where
        S: HierarchySource + ?Sized,
    {
        self.map_to_path(source, state)
            .and_then(|path| path.last().copied())
    }

    /// `state` and its ancestors, outermost first.
    fn ancestors<S>(&self, source: &S, state: StateRef) -> Option<Vec<StateRef>>
    where
        S: HierarchySource + ?Sized,
    {
        let mut chain = vec![state];
        let mut current = state;
        while let Some(parent) = source.parent(current) {
            if chain.len() > self.max_depth {
                error!(
                    %state,
                    max_depth = self.max_depth,
                    "ancestor chain exceeds maximum depth; hierarchy may be cyclic"
                );
                debug_assert!(false, "ancestor chain of {state} exceeds {}", self.max_depth);
                return None;
            }
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        Some(chain)
    }
}
