//! Read-side contract between a hierarchy graph and the outline engine.

use std::cell::RefCell;
use std::rc::Rc;

use crate::attributes::AttributeRecord;
use crate::events::DesignEvent;
use crate::ids::{ComponentRef, ElementRef, Location, StateRef};

/// One entry of a hierarchy state's child list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildRef {
    /// A nested instantiation of another circuit.
    State(StateRef),
    /// A leaf component.
    Component(ComponentRef),
}

/// Presentation facts about one hierarchy state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateInfo {
    /// Name of the instantiated circuit definition.
    pub circuit: String,
    /// Component that placed this instance; `None` for a root.
    pub placement: Option<ComponentRef>,
    /// Label of the placing component, if non-blank.
    pub label: Option<String>,
    /// Location of the placing component on the parent canvas.
    pub location: Location,
}

/// Presentation facts about one leaf component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentInfo {
    /// Factory (class) identity, e.g. `"AND Gate"`.
    pub factory: String,
    pub label: Option<String>,
    pub location: Location,
}

/// Hierarchy graph as seen by the outline engine.
///
/// Every query answers from the graph's current state. Unknown refs yield
/// empty lists or `None`, never errors: the engine treats a vanished element
/// as "nothing to show".
pub trait HierarchySource {
    /// Children of a state, in the graph's own order.
    fn children(&self, state: StateRef) -> Vec<ChildRef>;

    /// Instantiating state of `state`; `None` for a root or unknown ref.
    fn parent(&self, state: StateRef) -> Option<StateRef>;

    fn describe_state(&self, state: StateRef) -> Option<StateInfo>;

    fn describe_component(&self, component: ComponentRef) -> Option<ComponentInfo>;

    /// Tracking fields of a state's circuit or of a component.
    fn tracking_record(&self, target: ElementRef) -> Option<AttributeRecord>;
}

/// Queue of change events produced by edits to a hierarchy graph.
pub trait DesignEvents {
    /// Take every event queued since the last call, oldest first.
    fn drain_events(&mut self) -> Vec<DesignEvent>;

    /// Whether any event is waiting to be drained.
    fn has_pending_events(&self) -> bool;
}

/// A graph shared with listeners. Each query takes a short borrow, so a
/// listener holding the same handle may edit the graph between queries.
impl<T: HierarchySource + ?Sized> HierarchySource for Rc<RefCell<T>> {
    fn children(&self, state: StateRef) -> Vec<ChildRef> {
        self.borrow().children(state)
    }

    fn parent(&self, state: StateRef) -> Option<StateRef> {
        self.borrow().parent(state)
    }

    fn describe_state(&self, state: StateRef) -> Option<StateInfo> {
        self.borrow().describe_state(state)
    }

    fn describe_component(&self, component: ComponentRef) -> Option<ComponentInfo> {
        self.borrow().describe_component(component)
    }

    fn tracking_record(&self, target: ElementRef) -> Option<AttributeRecord> {
        self.borrow().tracking_record(target)
    }
}

impl<T: DesignEvents + ?Sized> DesignEvents for Rc<RefCell<T>> {
    fn drain_events(&mut self) -> Vec<DesignEvent> {
        self.borrow_mut().drain_events()
    }

    fn has_pending_events(&self) -> bool {
        self.borrow().has_pending_events()
    }
}
