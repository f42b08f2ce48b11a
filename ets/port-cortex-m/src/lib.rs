#![no_std]
#![forbid(unsafe_code)]

//! # ETS Cortex-M Port
//!
//! Cortex-M bindings for the ETS runtime: a [`CycleCounter`] over the DWT
//! cycle counter for WCET measurement, and SysTick configuration for the
//! 1 ms tick period. The SysTick exception handler itself lives in the
//! application, which calls `TickSource::on_tick` from it.

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::{DCB, DWT, SYST};
use ets_core::{CycleCounter, TICK_PERIOD_MS};

/// Microsecond elapsed-time source backed by the DWT cycle counter
pub struct DwtCycleCounter {
    cycles_per_us: u32,
    start: u32,
}

impl DwtCycleCounter {
    /// Enable the cycle counter and create a measurement source
    ///
    /// Requires trace to be enabled through the DCB before the DWT
    /// counter starts counting.
    pub fn new(dcb: &mut DCB, dwt: &mut DWT, sysclk_hz: u32) -> Self {
        dcb.enable_trace();
        dwt.enable_cycle_counter();

        Self {
            // Clocks below 1 MHz still measure, at reduced resolution.
            cycles_per_us: (sysclk_hz / 1_000_000).max(1),
            start: DWT::cycle_count(),
        }
    }
}

impl CycleCounter for DwtCycleCounter {
    fn reset(&mut self) {
        self.start = DWT::cycle_count();
    }

    fn elapsed_us(&mut self) -> u32 {
        // Wrapping subtraction handles one counter rollover per window.
        DWT::cycle_count().wrapping_sub(self.start) / self.cycles_per_us
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DwtCycleCounter {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "DwtCycleCounter({}cyc/us)", self.cycles_per_us);
    }
}

/// Configure SysTick for the tick period and enable its interrupt
///
/// After this returns, the SysTick exception fires every
/// [`TICK_PERIOD_MS`] milliseconds; the application's handler forwards
/// each firing to `TickSource::on_tick`.
pub fn start_systick(syst: &mut SYST, sysclk_hz: u32) {
    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(sysclk_hz / 1_000 * TICK_PERIOD_MS - 1);
    syst.clear_current();
    syst.enable_counter();
    syst.enable_interrupt();
}
