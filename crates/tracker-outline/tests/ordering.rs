//! Property tests for child ordering.

use proptest::prelude::*;

use tracker_model::{ChildRef, ComponentInfo, ComponentRef, Location, StateInfo, StateRef};
use tracker_outline::{Category, SortKey};

#[derive(Debug, Clone)]
struct Child {
    sub_hierarchy: bool,
    name: String,
    label: Option<String>,
    x: i32,
}

fn child_strategy() -> impl Strategy<Value = Child> {
    (
        any::<bool>(),
        prop::sample::select(vec!["Pin", "pin", "AND Gate", "adder", "Clock"]),
        prop::option::of("[a-cA-C]{0,2}"),
        0i32..4,
    )
        .prop_map(|(sub_hierarchy, name, label, x)| Child {
            sub_hierarchy,
            name: name.to_string(),
            label,
            x,
        })
}

fn keys(children: &[Child]) -> Vec<SortKey> {
    children
        .iter()
        .enumerate()
        .map(|(index, child)| {
            let id = index as u64;
            if child.sub_hierarchy {
                SortKey::for_state(
                    ChildRef::State(StateRef::from_raw(id)),
                    &StateInfo {
                        circuit: child.name.clone(),
                        placement: Some(ComponentRef::from_raw(id)),
                        label: child.label.clone(),
                        location: Location::new(child.x, 0),
                    },
                )
            } else {
                SortKey::for_component(
                    ChildRef::Component(ComponentRef::from_raw(id)),
                    &ComponentInfo {
                        factory: child.name.clone(),
                        label: child.label.clone(),
                        location: Location::new(child.x, 0),
                    },
                )
            }
        })
        .collect()
}

fn sorted(mut keys: Vec<SortKey>) -> Vec<ChildRef> {
    keys.sort();
    keys.into_iter().map(|key| key.child).collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn order_ignores_discovery_order(
        (original, shuffled) in prop::collection::vec(child_strategy(), 0..12)
            .prop_flat_map(|children| {
                let keys = keys(&children);
                (Just(keys.clone()), Just(keys).prop_shuffle())
            })
    ) {
        prop_assert_eq!(sorted(original), sorted(shuffled));
    }

    #[test]
    fn sub_hierarchies_never_follow_leaves(
        children in prop::collection::vec(child_strategy(), 0..12)
    ) {
        let mut keys = keys(&children);
        keys.sort();
        let first_leaf = keys
            .iter()
            .position(|key| key.category != Category::SubHierarchy)
            .unwrap_or(keys.len());
        prop_assert!(keys[first_leaf..]
            .iter()
            .all(|key| key.category != Category::SubHierarchy));
    }
}
