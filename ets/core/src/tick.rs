//! Interrupt-safe tick accounting
//!
//! A hardware timer interrupt credits forward progress by incrementing one
//! global tick counter plus one counter per task. The foreground consumers
//! (scheduler, tasks) drain their own counter one tick at a time. Both
//! sides go through a critical section, so a foreground read-modify-write
//! can never observe a torn value from the interrupt context.

use core::cell::Cell;
use critical_section::{CriticalSection, Mutex};

/// Interrupt-safe tick counter
///
/// The interrupt side only increments; the owning foreground consumer only
/// decrements, and a decrement never drives the counter below zero.
/// Increments saturate at `u32::MAX` instead of wrapping: a counter that
/// far behind means the system has already missed every deadline, and a
/// silent wrap would conjure ticks out of nothing.
pub struct TickCounter {
    count: Mutex<Cell<u32>>,
}

impl TickCounter {
    /// Create a new counter at zero
    pub const fn new() -> Self {
        Self {
            count: Mutex::new(Cell::new(0)),
        }
    }

    /// Credit one tick (interrupt context)
    pub fn increment(&self) {
        critical_section::with(|cs| self.increment_in(cs));
    }

    /// Credit one tick inside an already-held critical section
    pub fn increment_in(&self, cs: CriticalSection) {
        let count = self.count.borrow(cs);
        count.set(count.get().saturating_add(1));
    }

    /// Atomic test-and-decrement
    ///
    /// Returns `true` when a tick was owed and has been consumed.
    pub fn try_decrement(&self) -> bool {
        critical_section::with(|cs| {
            let count = self.count.borrow(cs);
            let value = count.get();
            if value > 0 {
                count.set(value - 1);
                true
            } else {
                false
            }
        })
    }

    /// Run `step` once per owed tick until the counter reads zero
    ///
    /// This is the shared drain-loop pattern: each consumed tick produces
    /// exactly one invocation of `step`, and the counter is re-checked
    /// after every invocation so ticks credited mid-drain are not lost.
    pub fn drain(&self, mut step: impl FnMut()) {
        while self.try_decrement() {
            step();
        }
    }

    /// Current backlog
    pub fn value(&self) -> u32 {
        critical_section::with(|cs| self.count.borrow(cs).get())
    }

    /// Reset the counter to zero
    pub fn reset(&self) {
        critical_section::with(|cs| self.reset_in(cs));
    }

    /// Reset the counter inside an already-held critical section
    pub fn reset_in(&self, cs: CriticalSection) {
        self.count.borrow(cs).set(0);
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TickCounter {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "TickCounter({})", self.value());
    }
}

/// The periodic tick interrupt body
///
/// Holds the global counter and every per-task counter; the surrounding
/// firmware registers [`TickSource::on_tick`] against the hardware timer
/// (conventionally a 1 ms SysTick). The handler does nothing but credit
/// each counter once, inside a single critical section, so its execution
/// time stays bounded and minimal.
pub struct TickSource<'a> {
    counters: &'a [&'a TickCounter],
}

impl<'a> TickSource<'a> {
    /// Create a tick source over the given counters
    pub const fn new(counters: &'a [&'a TickCounter]) -> Self {
        Self { counters }
    }

    /// Interrupt handler body: credit every counter by exactly one
    pub fn on_tick(&self) {
        critical_section::with(|cs| {
            for counter in self.counters {
                counter.increment_in(cs);
            }
        });
    }

    /// Atomically zero every counter
    ///
    /// Used by scheduler init after all tasks have been initialized, while
    /// the tick interrupt may already be firing.
    pub fn reset_all(&self) {
        critical_section::with(|cs| {
            for counter in self.counters {
                counter.reset_in(cs);
            }
        });
    }

    /// Number of counters driven by this source
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// Whether this source drives no counters
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}
