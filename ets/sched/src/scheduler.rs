//! Cooperative tick-drain scheduler with WCET bookkeeping

use crate::{Task, TaskStats};
use ets_core::{ets_info, CycleCounter, TickCounter, TickSource};

/// Cooperative scheduler over a fixed table of `N` tasks
///
/// Owns the per-task statistics and the elapsed-time source; borrows the
/// global tick counter shared with the tick interrupt. The task table
/// itself is passed into [`init`](Scheduler::init) and
/// [`update`](Scheduler::update) so the caller keeps ownership of the
/// task instances.
pub struct Scheduler<'a, C, const N: usize> {
    ticks: &'a TickCounter,
    cycle: C,
    stats: [TaskStats; N],
    pass_count: u32,
    pass_runtime_us: u32,
}

impl<'a, C: CycleCounter, const N: usize> Scheduler<'a, C, N> {
    /// Create a scheduler over the global tick counter
    pub const fn new(ticks: &'a TickCounter, cycle: C) -> Self {
        Self {
            ticks,
            cycle,
            stats: [TaskStats::new(); N],
            pass_count: 0,
            pass_runtime_us: 0,
        }
    }

    /// Initialize every task and reset tick accounting
    ///
    /// Tasks are initialized in table order and their WCET statistics
    /// zeroed. Only afterwards are the global and per-task tick counters
    /// reset, atomically through `source`, since the tick interrupt may
    /// already be firing while initialization runs.
    pub fn init(&mut self, tasks: &mut [&mut dyn Task; N], source: &TickSource) {
        ets_info!("scheduler init: {} tasks", N as u32);

        for (task, stats) in tasks.iter_mut().zip(self.stats.iter_mut()) {
            task.init();
            stats.reset();
        }

        self.pass_count = 0;
        self.pass_runtime_us = 0;
        source.reset_all();
    }

    /// Drain the global tick backlog
    ///
    /// Each owed tick produces exactly one full pass: every task's
    /// `update` is invoked once, in table order, and timed. Ticks are
    /// consumed one at a time and never coalesced, so a backlog of K
    /// ticks yields K complete passes (catch-up semantics). The counter
    /// is re-checked after every pass, picking up ticks credited while
    /// the pass ran.
    pub fn update(&mut self, tasks: &mut [&mut dyn Task; N]) {
        while self.ticks.try_decrement() {
            self.run_pass(tasks);
        }
    }

    /// One full pass over the task table
    fn run_pass(&mut self, tasks: &mut [&mut dyn Task; N]) {
        self.pass_count = self.pass_count.wrapping_add(1);
        self.pass_runtime_us = 0;

        let cycle = &mut self.cycle;
        for (task, stats) in tasks.iter_mut().zip(self.stats.iter_mut()) {
            cycle.reset();
            task.update();
            let elapsed_us = cycle.elapsed_us();

            self.pass_runtime_us = self.pass_runtime_us.saturating_add(elapsed_us);
            stats.record(elapsed_us);
        }
    }

    /// Worst-case execution time observed for the task at `index`
    pub fn wcet_us(&self, index: usize) -> Option<u32> {
        self.stats.get(index).map(TaskStats::wcet_us)
    }

    /// Statistics for the task at `index`
    pub fn stats(&self, index: usize) -> Option<&TaskStats> {
        self.stats.get(index)
    }

    /// Number of full passes executed since init
    pub fn pass_count(&self) -> u32 {
        self.pass_count
    }

    /// Summed task runtime of the most recent pass, in microseconds
    pub fn last_pass_runtime_us(&self) -> u32 {
        self.pass_runtime_us
    }

    /// Current global tick backlog
    pub fn backlog(&self) -> u32 {
        self.ticks.value()
    }
}

#[cfg(feature = "defmt")]
impl<'a, C, const N: usize> defmt::Format for Scheduler<'a, C, N> {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Scheduler{{tasks: {}, passes: {}}}",
            N as u32,
            self.pass_count
        );
    }
}
