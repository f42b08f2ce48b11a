//! Single-slot event mailbox

use core::cell::Cell;
use critical_section::Mutex;

/// Degenerate one-element mailbox with last-write-wins overwrite
///
/// Models the per-instance `(flag, event)` pair of a statechart: `Some`
/// means an event is pending and unconsumed. A post unconditionally
/// overwrites any unconsumed value; the caller never observes failure and
/// intermediate events are silently dropped. That drop is part of the
/// contract, not an accident: producers faster than the tick rate lose
/// events by design.
///
/// Single-writer-per-field discipline: producers only [`post`](Mailbox::post);
/// the owning statechart step [`peek`](Mailbox::peek)s and, on a matched
/// transition only, [`clear`](Mailbox::clear)s.
pub struct Mailbox<E> {
    slot: Mutex<Cell<Option<E>>>,
}

impl<E: Copy> Mailbox<E> {
    /// Create an empty mailbox
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(None)),
        }
    }

    /// Deposit an event, overwriting any unconsumed one
    pub fn post(&self, event: E) {
        critical_section::with(|cs| self.slot.borrow(cs).set(Some(event)));
    }

    /// The pending event, if any, without consuming it
    pub fn peek(&self) -> Option<E> {
        critical_section::with(|cs| self.slot.borrow(cs).get())
    }

    /// Drop the pending event
    pub fn clear(&self) {
        critical_section::with(|cs| self.slot.borrow(cs).set(None));
    }

    /// Whether an unconsumed event is pending
    pub fn is_pending(&self) -> bool {
        self.peek().is_some()
    }
}

impl<E: Copy> Default for Mailbox<E> {
    fn default() -> Self {
        Self::new()
    }
}
