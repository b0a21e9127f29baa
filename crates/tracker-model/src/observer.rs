//! Listener bus shared by every observable entity.
//!
//! Dispatch works on a snapshot of the listener list, so a listener may
//! subscribe or unsubscribe (itself or others) while an event is being
//! delivered. A listener that fails or panics is logged and skipped; the
//! remaining listeners still receive the event.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use tracing::warn;

/// Error returned by a failing listener.
pub type ListenerError = Box<dyn std::error::Error>;

/// Result returned by every listener.
pub type ListenerResult = std::result::Result<(), ListenerError>;

/// Handle used to unsubscribe a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

type Callback<E> = Rc<dyn Fn(&E) -> ListenerResult>;

/// Typed listener list for events of type `E`.
///
/// Single-threaded by construction (`Rc`/`RefCell`).
pub struct Listeners<E> {
    entries: RefCell<Vec<(ListenerId, Callback<E>)>>,
    next_id: Cell<u64>,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.len())
            .finish()
    }
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Register a listener. Returns the handle needed to remove it.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&E) -> ListenerResult + 'static,
    {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Deliver an event to every listener registered when the call began.
    ///
    /// Returns the number of listeners that failed.
    pub fn emit(&self, event: &E) -> usize {
        let snapshot: Vec<(ListenerId, Callback<E>)> = self.entries.borrow().clone();
        let mut failures = 0;
        for (id, listener) in snapshot {
            match catch_unwind(AssertUnwindSafe(|| listener(event))) {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    failures += 1;
                    warn!(listener = %id, %error, "listener failed");
                }
                Err(_) => {
                    failures += 1;
                    warn!(listener = %id, "listener panicked");
                }
            }
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_reaches_all_listeners() {
        let bus: Listeners<u32> = Listeners::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for tag in 0..3 {
            let seen = Rc::clone(&seen);
            bus.subscribe(move |value: &u32| {
                seen.borrow_mut().push((tag, *value));
                Ok(())
            });
        }
        assert_eq!(bus.emit(&7), 0);
        assert_eq!(*seen.borrow(), vec![(0, 7), (1, 7), (2, 7)]);
    }

    #[test]
    fn test_unsubscribe() {
        let bus: Listeners<()> = Listeners::new();
        let id = bus.subscribe(|_| Ok(()));
        assert_eq!(bus.len(), 1);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert!(bus.is_empty());
    }

    #[test]
    fn test_self_removal_during_dispatch() {
        let bus: Rc<Listeners<u32>> = Rc::new(Listeners::new());
        let count = Rc::new(Cell::new(0));
        let own_id: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));

        let id = {
            let bus = Rc::clone(&bus);
            let own_id = Rc::clone(&own_id);
            let count = Rc::clone(&count);
            // Holds a strong reference back to the bus; dropped with the test.
            let bus_handle = Rc::clone(&bus);
            bus_handle.subscribe(move |_| {
                count.set(count.get() + 1);
                if let Some(id) = own_id.get() {
                    bus.unsubscribe(id);
                }
                Ok(())
            })
        };
        own_id.set(Some(id));

        let other = Rc::new(Cell::new(0));
        {
            let other = Rc::clone(&other);
            bus.subscribe(move |_| {
                other.set(other.get() + 1);
                Ok(())
            });
        }

        bus.emit(&1);
        bus.emit(&2);
        assert_eq!(count.get(), 1);
        assert_eq!(other.get(), 2);
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn test_removed_peer_still_gets_in_flight_event() {
        let bus: Rc<Listeners<u32>> = Rc::new(Listeners::new());
        let peer_id: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
        let peer_hits = Rc::new(Cell::new(0));

        {
            let bus_inner = Rc::clone(&bus);
            let peer_id = Rc::clone(&peer_id);
            bus.subscribe(move |_| {
                if let Some(id) = peer_id.get() {
                    bus_inner.unsubscribe(id);
                }
                Ok(())
            });
        }
        {
            let peer_hits = Rc::clone(&peer_hits);
            peer_id.set(Some(bus.subscribe(move |_| {
                peer_hits.set(peer_hits.get() + 1);
                Ok(())
            })));
        }

        bus.emit(&1);
        assert_eq!(peer_hits.get(), 1);
        bus.emit(&2);
        assert_eq!(peer_hits.get(), 1);
    }

    #[test]
    fn test_failing_listener_does_not_block_others() {
        let bus: Listeners<u32> = Listeners::new();
        let delivered = Rc::new(Cell::new(0));

        bus.subscribe(|_| Err("boom".into()));
        bus.subscribe(|_| panic!("listener bug"));
        {
            let delivered = Rc::clone(&delivered);
            bus.subscribe(move |_| {
                delivered.set(delivered.get() + 1);
                Ok(())
            });
        }

        assert_eq!(bus.emit(&1), 2);
        assert_eq!(delivered.get(), 1);
    }
}
