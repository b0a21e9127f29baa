//! Single-owner session tying a hierarchy graph to its outline.

use std::collections::HashSet;

use tracing::{debug, info_span, trace, warn};
use tracker_authors::AuthorRegistry;
use tracker_integrity::IntegrityCodec;
use tracker_model::{
    AttributeKey, DesignEvent, DesignEvents, ElementRef, HierarchySource, StateRef,
    StructuralChange,
};

use crate::config::OutlineConfig;
use crate::engine::TreeSyncEngine;
use crate::error::Result;
use crate::model::OutlineModel;
use crate::owners::discover_owners;
use crate::tree::NodeId;
use crate::validity::{NodeValidity, ValidityAggregator};

/// Outcome of one [`OutlineSession::pump`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpReport {
    /// Rounds that had at least one event.
    pub rounds: usize,
    /// Events drained across all rounds.
    pub events: usize,
    /// Events were still queued when the round bound was reached.
    pub leftover: bool,
}

/// Owns the hierarchy source, its outline, the author registry and the
/// integrity codec.
///
/// Every edit goes through [`edit`](Self::edit), after which queued
/// hierarchy events are pumped into the engine. Events that listeners cause
/// while being notified are handled in the following round.
#[derive(Debug)]
pub struct OutlineSession<S> {
    source: S,
    engine: TreeSyncEngine,
    authors: AuthorRegistry,
    codec: IntegrityCodec,
}

impl<S> OutlineSession<S>
where
    S: HierarchySource + DesignEvents,
{
    /// Build the outline for `root`. Events already queued on the source
    /// describe the state the outline was just built from and are dropped.
    pub fn new(
        mut source: S,
        root: StateRef,
        authors: AuthorRegistry,
        codec: IntegrityCodec,
        config: OutlineConfig,
    ) -> Self {
        let stale = source.drain_events();
        if !stale.is_empty() {
            debug!(count = stale.len(), "dropping events queued before construction");
        }
        let engine = TreeSyncEngine::construct(&source, root, config);
        Self {
            source,
            engine,
            authors,
            codec,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn engine(&self) -> &TreeSyncEngine {
        &self.engine
    }

    pub fn authors(&self) -> &AuthorRegistry {
        &self.authors
    }

    pub fn codec(&self) -> &IntegrityCodec {
        &self.codec
    }

    /// Apply an edit to the hierarchy, then pump its events.
    pub fn edit<T, F>(&mut self, edit: F) -> (T, PumpReport)
    where
        F: FnOnce(&mut S) -> T,
    {
        let value = edit(&mut self.source);
        let report = self.pump();
        (value, report)
    }

    /// Change the author registry. Every materialized node is notified
    /// afterwards since owner validity may have flipped anywhere.
    pub fn edit_authors<T, F>(&mut self, edit: F) -> T
    where
        F: FnOnce(&mut AuthorRegistry) -> T,
    {
        let value = edit(&mut self.authors);
        self.engine.repaint();
        value
    }

    /// Feed queued hierarchy events to the engine, round by round.
    ///
    /// Within a round each state is reloaded at most once and duplicate
    /// notifications are collapsed. At most `max_pump_rounds` rounds run;
    /// anything still queued afterwards waits for the next pump.
    pub fn pump(&mut self) -> PumpReport {
        let _span = info_span!("pump").entered();
        let max_rounds = self.engine.config().max_pump_rounds;
        let mut report = PumpReport::default();

        while report.rounds < max_rounds {
            let events = self.source.drain_events();
            if events.is_empty() {
                break;
            }
            report.rounds += 1;
            report.events += events.len();
            self.dispatch_round(events);
        }

        if self.source.has_pending_events() {
            report.leftover = true;
            warn!(
                rounds = report.rounds,
                max_rounds, "pump round bound reached; deferring remaining events"
            );
        }
        report
    }

    fn dispatch_round(&mut self, events: Vec<DesignEvent>) {
        let mut reloaded: HashSet<StateRef> = HashSet::new();
        let mut renamed: HashSet<StateRef> = HashSet::new();
        let mut touched: HashSet<(ElementRef, Option<AttributeKey>)> = HashSet::new();

        for event in events {
            match event {
                DesignEvent::Structural {
                    change: StructuralChange::Invalidated,
                    ..
                } => {}
                DesignEvent::Structural { state, change } => {
                    let first = if change.affects_topology() {
                        reloaded.insert(state)
                    } else {
                        renamed.insert(state)
                    };
                    if first {
                        self.engine
                            .on_structural_event(&self.source, state, change);
                    } else {
                        trace!(%state, ?change, "collapsed duplicate structural event");
                    }
                }
                DesignEvent::Attribute { target, event } => {
                    if touched.insert((target, event.key())) {
                        self.engine.on_attribute_event(target, &event);
                    }
                }
            }
        }
    }

    pub fn root(&self) -> NodeId {
        self.engine.root()
    }

    pub fn expand(&mut self, node: NodeId) -> Result<Vec<NodeId>> {
        self.engine.expand(&self.source, node)
    }

    /// Expand every circuit node shallower than `depth` (`None`: no limit
    /// beyond `max_depth`). Returns the number of nodes expanded.
    pub fn expand_to_depth(&mut self, depth: Option<usize>) -> Result<usize> {
        let limit = depth.unwrap_or(self.engine.config().max_depth);
        let mut expanded = 0;
        let mut frontier = vec![(self.engine.root(), 0usize)];
        while let Some((node, level)) = frontier.pop() {
            if level >= limit {
                continue;
            }
            let is_circuit = self
                .engine
                .tree()
                .get(node)
                .is_some_and(|n| !n.is_component());
            if !is_circuit {
                continue;
            }
            let children = self.engine.expand(&self.source, node)?;
            expanded += 1;
            frontier.extend(children.into_iter().map(|child| (child, level + 1)));
        }
        debug!(expanded, ?depth, "expanded outline");
        Ok(expanded)
    }

    pub fn set_current_view(&mut self, state: Option<StateRef>) {
        self.engine.set_current_view(&self.source, state);
    }

    pub fn map_to_path(&self, state: StateRef) -> Option<Vec<NodeId>> {
        self.engine.map_to_path(&self.source, state)
    }

    pub fn validity(&self, node: NodeId) -> NodeValidity {
        self.model().validity(node)
    }

    /// Presentation view borrowing the session.
    pub fn model(&self) -> OutlineModel<'_, S> {
        OutlineModel::new(
            &self.engine,
            &self.source,
            ValidityAggregator::new(&self.authors, &self.codec),
        )
    }

    /// Distinct owners anywhere below the outline root.
    pub fn discover_owners(&self) -> Vec<String> {
        match self.engine.tree().root_state() {
            Some(root) => discover_owners(&self.source, root, self.engine.config().max_depth),
            None => Vec::new(),
        }
    }
}
