/// Observer notifications
///
/// Fire-and-forget hooks for pool and cursor state changes. Registration
/// hands back a `Subscription` guard; dropping the guard removes the
/// observer, so teardown can never leak a stale callback the way paired
/// subscribe/unsubscribe calls can.
///
/// Single-threaded by design: the whole subsystem runs inside one update
/// loop, so `Rc<RefCell>` is enough.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::entity::EntityId;

/// Raised whenever the pool's backing collection changes structurally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolEvent {
    Changed { len: usize },
}

/// Raised by the placement cursor as focus and drag state move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorEvent {
    Focused(EntityId),
    DragStarted(EntityId),
    /// An entity was dropped in a valid spot.
    Selected(EntityId),
}

type Slot<E> = (u64, Box<dyn Fn(&E)>);

/// Observer registry for one event type. No ordering guarantee across
/// observers, no return values.
pub struct Observers<E> {
    slots: Rc<RefCell<Vec<Slot<E>>>>,
    next_id: RefCell<u64>,
}

impl<E> Observers<E> {
    pub fn new() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Vec::new())),
            next_id: RefCell::new(0),
        }
    }

    /// Register an observer. The observer stays live until the returned
    /// guard is dropped.
    pub fn subscribe(&self, observer: impl Fn(&E) + 'static) -> Subscription<E> {
        let mut next = self.next_id.borrow_mut();
        let id = *next;
        *next += 1;

        self.slots.borrow_mut().push((id, Box::new(observer)));
        Subscription {
            id,
            slots: Rc::downgrade(&self.slots),
        }
    }

    /// Notify every registered observer.
    pub fn emit(&self, event: &E) {
        for (_, observer) in self.slots.borrow().iter() {
            observer(event);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard for one observer registration.
pub struct Subscription<E> {
    id: u64,
    slots: Weak<RefCell<Vec<Slot<E>>>>,
}

impl<E> Drop for Subscription<E> {
    fn drop(&mut self) {
        if let Some(slots) = self.slots.upgrade() {
            slots.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}
