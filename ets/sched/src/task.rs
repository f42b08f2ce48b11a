//! Task capability and per-task runtime statistics

/// A cooperatively scheduled task
///
/// Tasks are registered in a fixed table whose order defines execution and
/// WCET-accounting order within each scheduler pass. Implementations must
/// never block: `update` runs to completion before the scheduler moves on,
/// so a task that stalls starves every task after it in every remaining
/// pass. The configuration a C-style task table would pass through an
/// opaque pointer lives in the implementing type itself, which lets one
/// generic driver body serve several configured instances.
pub trait Task {
    /// One-time initialization, invoked once by scheduler init
    fn init(&mut self);

    /// Drain this task's private tick backlog, one statechart step per
    /// owed tick
    fn update(&mut self);
}

/// Per-task runtime statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskStats {
    wcet_us: u32,
}

impl TaskStats {
    /// Fresh statistics with WCET at zero
    pub const fn new() -> Self {
        Self { wcet_us: 0 }
    }

    /// Fold one observed execution duration into the statistics
    ///
    /// WCET is monotonically non-decreasing: the stored value is only
    /// overwritten when the new observation exceeds it.
    pub fn record(&mut self, elapsed_us: u32) {
        if self.wcet_us < elapsed_us {
            self.wcet_us = elapsed_us;
        }
    }

    /// Worst-case execution time observed so far, in microseconds
    pub const fn wcet_us(&self) -> u32 {
        self.wcet_us
    }

    /// Reset the statistics to their initial state
    pub fn reset(&mut self) {
        self.wcet_us = 0;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TaskStats {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "TaskStats{{wcet: {}us}}", self.wcet_us);
    }
}
