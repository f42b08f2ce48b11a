//! Elapsed-time measurement for WCET tracking

/// Hardware timer period backing one tick, in milliseconds
pub const TICK_PERIOD_MS: u32 = 1;

/// Monotonic microsecond-resolution elapsed-time source
///
/// Used by the scheduler to time each task `update` invocation. Assumed
/// non-blocking; called from the foreground context only.
pub trait CycleCounter {
    /// Restart the measurement window
    fn reset(&mut self);

    /// Microseconds elapsed since the last [`reset`](CycleCounter::reset)
    fn elapsed_us(&mut self) -> u32;
}

/// Elapsed-time source that always reports zero
///
/// A valid substitute wherever WCET figures are not needed; the scheduler
/// depends on the measurement only for statistics, never for correctness.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCycleCounter;

impl CycleCounter for NullCycleCounter {
    fn reset(&mut self) {}

    fn elapsed_us(&mut self) -> u32 {
        0
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for NullCycleCounter {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "NullCycleCounter");
    }
}
