//! Bounded event queue for the system task

use core::cell::RefCell;
use critical_section::Mutex;
use ets_core::{EtsError, EtsResult};
use heapless::Deque;

/// Bounded FIFO event queue
///
/// The system task's inbound collaborator: producers `put`, the statechart
/// pulls at most one event per step. Overflow policy: a `put` on a full
/// queue rejects the new event and returns [`EtsError::QueueFull`]; the
/// queued backlog is never overwritten.
pub struct EventQueue<E, const N: usize> {
    queue: Mutex<RefCell<Deque<E, N>>>,
}

impl<E, const N: usize> EventQueue<E, N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Append an event, rejecting it when the queue is full
    pub fn put(&self, event: E) -> EtsResult<()> {
        critical_section::with(|cs| {
            self.queue
                .borrow_ref_mut(cs)
                .push_back(event)
                .map_err(|_| EtsError::QueueFull)
        })
    }

    /// Remove and return the oldest pending event
    pub fn get(&self) -> Option<E> {
        critical_section::with(|cs| self.queue.borrow_ref_mut(cs).pop_front())
    }

    /// Whether any event is pending
    pub fn any(&self) -> bool {
        !self.is_empty()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        critical_section::with(|cs| self.queue.borrow_ref(cs).is_empty())
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.queue.borrow_ref(cs).len())
    }

    /// Maximum capacity
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Discard all pending events
    pub fn clear(&self) {
        critical_section::with(|cs| self.queue.borrow_ref_mut(cs).clear());
    }
}

impl<E, const N: usize> Default for EventQueue<E, N> {
    fn default() -> Self {
        Self::new()
    }
}
