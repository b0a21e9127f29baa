//! Integration tests for the in-memory hierarchy graph.

use tracker_model::{
    AttributeEvent, AttributeKey, ChildRef, DesignEvent, DesignEvents, DesignHierarchy,
    ElementRef, HierarchySource, Location, ModelError, StructuralChange, parse_timestamp,
};

fn two_level() -> (DesignHierarchy, tracker_model::StateRef) {
    let mut design = DesignHierarchy::new();
    let main = design.add_circuit("main").unwrap();
    let mux = design.add_circuit("mux").unwrap();
    let nand = design.add_circuit("nand").unwrap();
    design.add_component(nand, "NAND Gate", Location::new(0, 0)).unwrap();
    design.add_subcircuit(mux, nand, Location::new(10, 0)).unwrap();
    design.add_component(mux, "Pin", Location::new(0, 10)).unwrap();
    design.add_subcircuit(main, mux, Location::new(20, 20)).unwrap();
    let root = design.instantiate_root(main).unwrap();
    (design, root)
}

#[test]
fn test_parent_chain_reaches_root() {
    let (design, root) = two_level();
    let ChildRef::State(mux) = design.children(root)[0] else {
        panic!("expected mux instance");
    };
    let nand = design
        .children(mux)
        .into_iter()
        .find_map(|c| match c {
            ChildRef::State(s) => Some(s),
            ChildRef::Component(_) => None,
        })
        .unwrap();

    assert_eq!(design.parent(nand), Some(mux));
    assert_eq!(design.parent(mux), Some(root));
    assert_eq!(design.parent(root), None);
}

#[test]
fn test_nested_placement_reaches_every_instance() {
    let (mut design, root) = two_level();
    let main = design.circuit_of(root).unwrap();
    let mux = design.circuit_by_name("mux").unwrap();
    design.add_subcircuit(main, mux, Location::new(60, 20)).unwrap();
    design.drain_events();

    let nand = design.circuit_by_name("nand").unwrap();
    assert_eq!(design.states_of(mux).len(), 2);
    assert_eq!(design.states_of(nand).len(), 2);

    design.add_component(nand, "Clock", Location::new(5, 5)).unwrap();
    let events = design.drain_events();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| matches!(
        e,
        DesignEvent::Structural {
            change: StructuralChange::ComponentAdded,
            ..
        }
    )));
}

#[test]
fn test_attribute_edits_queue_value_changes() {
    let (mut design, root) = two_level();
    let mux = design.circuit_by_name("mux").unwrap();
    let pin = design.components_of(mux).unwrap()[1];

    design
        .set_component_attribute(pin, AttributeKey::Label, "sel")
        .unwrap();
    design
        .set_component_attribute(pin, AttributeKey::Label, "sel")
        .unwrap();
    design
        .set_circuit_attribute(design.circuit_of(root).unwrap(), AttributeKey::Owner, "alice")
        .unwrap();

    let events = design.drain_events();
    assert_eq!(
        events,
        vec![
            DesignEvent::Attribute {
                target: ElementRef::Component(pin),
                event: AttributeEvent::ValueChanged {
                    key: AttributeKey::Label,
                    old: None,
                    new: Some("sel".into()),
                },
            },
            DesignEvent::Attribute {
                target: ElementRef::State(root),
                event: AttributeEvent::ValueChanged {
                    key: AttributeKey::Owner,
                    old: None,
                    new: Some("alice".into()),
                },
            },
        ]
    );
}

#[test]
fn test_unsupported_keys_surface_as_errors() {
    let (mut design, root) = two_level();
    let main = design.circuit_of(root).unwrap();
    let err = design
        .set_circuit_attribute(main, AttributeKey::Facing, tracker_model::Direction::North)
        .unwrap_err();
    assert!(matches!(err, ModelError::UnsupportedAttributeKey { .. }));
    assert!("colour".parse::<AttributeKey>().is_err());
}

#[test]
fn test_tracking_record_follows_edits() {
    let (mut design, _) = two_level();
    let nand = design.circuit_by_name("nand").unwrap();
    let gate = design.components_of(nand).unwrap()[0];
    let date = parse_timestamp("2024-05-06 07:08:09").unwrap();

    design
        .modify_component_attributes(gate, |set| {
            set.set(AttributeKey::Owner, "carol")?;
            set.set(AttributeKey::Date, date)?;
            Ok(())
        })
        .unwrap();
    assert_eq!(design.drain_events().len(), 2);

    let record = design.tracking_record(gate.into()).unwrap();
    assert_eq!(record.owner.as_deref(), Some("carol"));
    assert_eq!(record.date, Some(date));

    design.remove_component(gate).unwrap();
    assert!(design.tracking_record(gate.into()).is_none());
}

#[test]
fn test_connectivity_and_invalidation_signals() {
    let (mut design, root) = two_level();
    let main = design.circuit_of(root).unwrap();
    design.mark_connectivity_changed(main).unwrap();
    design.invalidate(main).unwrap();
    assert_eq!(
        design.drain_events(),
        vec![
            DesignEvent::Structural {
                state: root,
                change: StructuralChange::ConnectivityChanged,
            },
            DesignEvent::Structural {
                state: root,
                change: StructuralChange::Invalidated,
            },
        ]
    );
}
