//! Owner discovery over the hierarchy graph.

use std::collections::BTreeSet;

use tracing::{debug, warn};
use tracker_model::{ChildRef, ElementRef, HierarchySource, StateRef};

/// Every distinct owner recorded below `root`, sorted.
///
/// Walks the graph itself, not the outline, so unexpanded levels are
/// included. Circuit owners count as well as component owners. Empty owners
/// are ignored. Levels deeper than `max_depth` are skipped.
pub fn discover_owners<S>(source: &S, root: StateRef, max_depth: usize) -> Vec<String>
where
    S: HierarchySource + ?Sized,
{
    let mut owners = BTreeSet::new();
    let mut stack = vec![(root, 0usize)];
    let mut visited = 0usize;

    while let Some((state, depth)) = stack.pop() {
        if depth > max_depth {
            warn!(%state, max_depth, "owner discovery truncated at maximum depth");
            continue;
        }
        visited += 1;
        insert_owner(&mut owners, source, ElementRef::State(state));
        for child in source.children(state) {
            match child {
                ChildRef::State(nested) => stack.push((nested, depth + 1)),
                ChildRef::Component(component) => {
                    insert_owner(&mut owners, source, ElementRef::Component(component));
                }
            }
        }
    }

    debug!(%root, states = visited, owners = owners.len(), "discovered owners");
    owners.into_iter().collect()
}

fn insert_owner<S>(owners: &mut BTreeSet<String>, source: &S, element: ElementRef)
where
    S: HierarchySource + ?Sized,
{
    if let Some(owner) = source
        .tracking_record(element)
        .and_then(|record| record.owner)
        .filter(|owner| !owner.is_empty())
    {
        owners.insert(owner);
    }
}
