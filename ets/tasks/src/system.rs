//! System task: the application-level supervisory statechart

use crate::{put_led_event, EventQueue, LedEvent, Mailbox, LED_A, SYS_QUEUE_DEPTH};
use ets_core::{ets_info, TickCounter};
use ets_sched::Task;

/// Minimum supervisory delay, in ticks
pub const SYS_DELAY_MIN: u32 = 0;
/// Medium supervisory delay, in ticks (declared configuration)
pub const SYS_DELAY_MED: u32 = 50;
/// Maximum supervisory delay, in ticks (declared configuration)
pub const SYS_DELAY_MAX: u32 = 500;

/// System statechart states
///
/// Only `Idle` and `Active1` carry transition logic; `Active2` through
/// `Active6` are reachable no-op placeholders preserving the enum's shape
/// for future extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SysState {
    Idle,
    Active1,
    Active2,
    Active3,
    Active4,
    Active5,
    Active6,
}

/// System statechart events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SysEvent {
    Idle,
    LoopDetected,
}

#[cfg(feature = "defmt")]
impl defmt::Format for SysState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            SysState::Idle => defmt::write!(fmt, "Idle"),
            SysState::Active1 => defmt::write!(fmt, "Active1"),
            SysState::Active2 => defmt::write!(fmt, "Active2"),
            SysState::Active3 => defmt::write!(fmt, "Active3"),
            SysState::Active4 => defmt::write!(fmt, "Active4"),
            SysState::Active5 => defmt::write!(fmt, "Active5"),
            SysState::Active6 => defmt::write!(fmt, "Active6"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SysEvent {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            SysEvent::Idle => defmt::write!(fmt, "Idle"),
            SysEvent::LoopDetected => defmt::write!(fmt, "LoopDetected"),
        }
    }
}

/// The system task
///
/// Pulls at most one event per statechart step from its bounded inbound
/// queue and commands the actuator task through its mailboxes:
/// `Idle --LoopDetected--> Active1` turns instance [`LED_A`] on,
/// `Active1 --Idle--> Idle` turns it off.
pub struct SystemTask<'a> {
    tick: &'a TickCounter,
    inbox: &'a EventQueue<SysEvent, SYS_QUEUE_DEPTH>,
    led_inbox: &'a [Mailbox<LedEvent>],
    state: SysState,
    event: SysEvent,
    flag: bool,
    delay: u32,
    step_count: u32,
}

impl<'a> SystemTask<'a> {
    /// Create the task over its private tick counter, inbound event queue
    /// and the actuator mailbox array it commands
    pub fn new(
        tick: &'a TickCounter,
        inbox: &'a EventQueue<SysEvent, SYS_QUEUE_DEPTH>,
        led_inbox: &'a [Mailbox<LedEvent>],
    ) -> Self {
        Self {
            tick,
            inbox,
            led_inbox,
            state: SysState::Idle,
            event: SysEvent::Idle,
            flag: false,
            delay: SYS_DELAY_MIN,
            step_count: 0,
        }
    }

    /// Current statechart state
    pub fn state(&self) -> SysState {
        self.state
    }

    /// Whether a latched event is pending and unconsumed
    pub fn event_pending(&self) -> bool {
        self.flag
    }

    /// Statechart steps executed since init
    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    /// Current value of the supervisory delay counter, in ticks
    pub fn delay_ticks(&self) -> u32 {
        self.delay
    }

    /// One statechart step
    ///
    /// Polls the queue once: a dequeued event is latched into the
    /// `(flag, event)` pair, overwriting any unconsumed latch. The
    /// dispatch then fires at most one transition; a matched transition
    /// clears the flag, an unmatched pair leaves state, flag and event
    /// untouched.
    fn step(&mut self) {
        self.step_count = self.step_count.wrapping_add(1);

        if let Some(event) = self.inbox.get() {
            self.flag = true;
            self.event = event;
        }

        match self.state {
            SysState::Idle => {
                if self.flag && self.event == SysEvent::LoopDetected {
                    self.flag = false;
                    put_led_event(self.led_inbox, LedEvent::On, LED_A);
                    self.state = SysState::Active1;
                }
            }

            SysState::Active1 => {
                if self.flag && self.event == SysEvent::Idle {
                    self.flag = false;
                    put_led_event(self.led_inbox, LedEvent::Off, LED_A);
                    self.state = SysState::Idle;
                }
            }

            // Declared states without transition logic in this revision.
            SysState::Active2
            | SysState::Active3
            | SysState::Active4
            | SysState::Active5
            | SysState::Active6 => {}
        }
    }
}

impl<'a> Task for SystemTask<'a> {
    fn init(&mut self) {
        ets_info!("system task init");

        self.inbox.clear();
        self.state = SysState::Idle;
        self.event = SysEvent::Idle;
        self.flag = false;
        self.delay = SYS_DELAY_MIN;
        self.step_count = 0;
    }

    fn update(&mut self) {
        let tick = self.tick;
        tick.drain(|| self.step());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture<'a>(
        tick: &'a TickCounter,
        queue: &'a EventQueue<SysEvent, SYS_QUEUE_DEPTH>,
        led_inbox: &'a [Mailbox<LedEvent>; 1],
    ) -> SystemTask<'a> {
        let mut task = SystemTask::new(tick, queue, led_inbox);
        task.init();
        task
    }

    fn run_steps(task: &mut SystemTask<'_>, steps: u32) {
        for _ in 0..steps {
            task.tick.increment();
        }
        task.update();
    }

    #[test]
    fn loop_detected_activates_and_commands_led_on() {
        let tick = TickCounter::new();
        let queue = EventQueue::new();
        let led_inbox = [Mailbox::new()];
        let mut task = fixture(&tick, &queue, &led_inbox);

        queue.put(SysEvent::LoopDetected).unwrap();
        run_steps(&mut task, 1);

        assert_eq!(task.state(), SysState::Active1);
        assert!(!task.event_pending());
        assert_eq!(led_inbox[LED_A].peek(), Some(LedEvent::On));
    }

    #[test]
    fn idle_event_deactivates_and_commands_led_off() {
        let tick = TickCounter::new();
        let queue = EventQueue::new();
        let led_inbox = [Mailbox::new()];
        let mut task = fixture(&tick, &queue, &led_inbox);

        queue.put(SysEvent::LoopDetected).unwrap();
        queue.put(SysEvent::Idle).unwrap();
        run_steps(&mut task, 2);

        assert_eq!(task.state(), SysState::Idle);
        assert_eq!(led_inbox[LED_A].peek(), Some(LedEvent::Off));
    }

    #[test]
    fn unmatched_event_stays_latched_without_side_effect() {
        let tick = TickCounter::new();
        let queue = EventQueue::new();
        let led_inbox = [Mailbox::new()];
        let mut task = fixture(&tick, &queue, &led_inbox);

        // Idle --(Idle)--> is undefined: the latch survives, nothing fires.
        queue.put(SysEvent::Idle).unwrap();
        run_steps(&mut task, 1);

        assert_eq!(task.state(), SysState::Idle);
        assert!(task.event_pending());
        assert_eq!(led_inbox[LED_A].peek(), None);
    }

    #[test]
    fn one_queue_poll_per_step() {
        let tick = TickCounter::new();
        let queue = EventQueue::new();
        let led_inbox = [Mailbox::new()];
        let mut task = fixture(&tick, &queue, &led_inbox);

        queue.put(SysEvent::LoopDetected).unwrap();
        queue.put(SysEvent::Idle).unwrap();

        // A single step consumes only the first event.
        run_steps(&mut task, 1);
        assert_eq!(task.state(), SysState::Active1);
        assert_eq!(queue.len(), 1);
    }
}
