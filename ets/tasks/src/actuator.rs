//! Actuator task: one statechart instance per managed output

use crate::Mailbox;
use embedded_hal::digital::{OutputPin, PinState};
use ets_core::{ets_info, TickCounter};
use ets_sched::Task;

/// Instance index of the primary LED
pub const LED_A: usize = 0;

/// Default blink half-period, in ticks
pub const LED_BLINK_TICKS: u32 = 500;
/// Default pulse width, in ticks
pub const LED_PULSE_TICKS: u32 = 250;
/// Initial value of the per-instance delay counter
pub const LED_DELAY_MIN: u32 = 0;

/// Actuator statechart states
///
/// Only `Off` and `On` carry transition logic in this revision. The blink
/// and pulse states are reachable no-op placeholders kept to preserve the
/// statechart's shape for future extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedState {
    Off,
    On,
    BlinkOn,
    BlinkOff,
    Pulse,
}

/// Actuator statechart events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedEvent {
    On,
    Off,
    Blink,
    NotBlink,
    Pulse,
}

#[cfg(feature = "defmt")]
impl defmt::Format for LedState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            LedState::Off => defmt::write!(fmt, "Off"),
            LedState::On => defmt::write!(fmt, "On"),
            LedState::BlinkOn => defmt::write!(fmt, "BlinkOn"),
            LedState::BlinkOff => defmt::write!(fmt, "BlinkOff"),
            LedState::Pulse => defmt::write!(fmt, "Pulse"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LedEvent {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            LedEvent::On => defmt::write!(fmt, "On"),
            LedEvent::Off => defmt::write!(fmt, "Off"),
            LedEvent::Blink => defmt::write!(fmt, "Blink"),
            LedEvent::NotBlink => defmt::write!(fmt, "NotBlink"),
            LedEvent::Pulse => defmt::write!(fmt, "Pulse"),
        }
    }
}

/// Static per-instance configuration
#[derive(Debug, Clone, Copy)]
pub struct LedConfig {
    /// Pin level that lights the LED
    pub on_level: PinState,
    /// Pin level that darkens the LED
    pub off_level: PinState,
    /// Blink half-period (declared configuration; no transition logic yet)
    pub blink_period_ticks: u32,
    /// Pulse width (declared configuration; no transition logic yet)
    pub pulse_width_ticks: u32,
}

impl LedConfig {
    /// Configuration for an active-high LED with the default timings
    pub const fn active_high() -> Self {
        Self {
            on_level: PinState::High,
            off_level: PinState::Low,
            blink_period_ticks: LED_BLINK_TICKS,
            pulse_width_ticks: LED_PULSE_TICKS,
        }
    }

    /// Configuration for an active-low LED with the default timings
    pub const fn active_low() -> Self {
        Self {
            on_level: PinState::Low,
            off_level: PinState::High,
            blink_period_ticks: LED_BLINK_TICKS,
            pulse_width_ticks: LED_PULSE_TICKS,
        }
    }
}

/// Mutable per-instance statechart data
///
/// The pending `(flag, event)` pair lives in the instance's [`Mailbox`],
/// not here, so producers never touch this struct.
#[derive(Debug, Clone, Copy)]
struct LedChart {
    state: LedState,
    delay: u32,
}

impl LedChart {
    const fn new() -> Self {
        Self {
            state: LedState::Off,
            delay: LED_DELAY_MIN,
        }
    }
}

/// Post an actuator event to the targeted instance's mailbox
///
/// Unconditional overwrite, never fails; an out-of-range target is
/// silently ignored.
pub fn put_led_event(inbox: &[Mailbox<LedEvent>], event: LedEvent, target: usize) {
    if let Some(slot) = inbox.get(target) {
        slot.post(event);
    }
}

/// The actuator task: drives `N` output lines from `N` statechart
/// instances sharing one driver body
///
/// Works against any [`OutputPin`] implementation; transition effects set
/// the pin to the configured on/off level and the driver never consumes
/// the pin's return value.
pub struct ActuatorTask<'a, P, const N: usize> {
    tick: &'a TickCounter,
    inbox: &'a [Mailbox<LedEvent>; N],
    configs: [LedConfig; N],
    pins: [P; N],
    charts: [LedChart; N],
    step_count: u32,
}

impl<'a, P: OutputPin, const N: usize> ActuatorTask<'a, P, N> {
    /// Create the task over its private tick counter, inbound mailboxes,
    /// per-instance configuration and output pins
    pub fn new(
        tick: &'a TickCounter,
        inbox: &'a [Mailbox<LedEvent>; N],
        configs: [LedConfig; N],
        pins: [P; N],
    ) -> Self {
        Self {
            tick,
            inbox,
            configs,
            pins,
            charts: [LedChart::new(); N],
            step_count: 0,
        }
    }

    /// Current state of the instance at `index`
    pub fn state(&self, index: usize) -> Option<LedState> {
        self.charts.get(index).map(|chart| chart.state)
    }

    /// Statechart steps executed since init
    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    /// Current value of the delay counter for the instance at `index`
    pub fn delay_ticks(&self, index: usize) -> Option<u32> {
        self.charts.get(index).map(|chart| chart.delay)
    }

    /// One statechart step: dispatch every instance once, in index order
    fn step(&mut self) {
        self.step_count = self.step_count.wrapping_add(1);

        for index in 0..N {
            let config = &self.configs[index];
            let chart = &mut self.charts[index];
            let pin = &mut self.pins[index];
            let slot = &self.inbox[index];
            let event = slot.peek();

            match chart.state {
                LedState::Off => {
                    if let Some(LedEvent::On) = event {
                        slot.clear();
                        let _ = pin.set_state(config.on_level);
                        chart.state = LedState::On;
                    }
                }

                LedState::On => {
                    if let Some(LedEvent::Off) = event {
                        slot.clear();
                        let _ = pin.set_state(config.off_level);
                        chart.state = LedState::Off;
                    }
                }

                // Declared states without transition logic in this
                // revision; events addressed to them stay pending.
                LedState::BlinkOn | LedState::BlinkOff | LedState::Pulse => {}
            }
        }
    }
}

impl<'a, P: OutputPin, const N: usize> Task for ActuatorTask<'a, P, N> {
    fn init(&mut self) {
        ets_info!("actuator task init: {} instances", N as u32);

        for index in 0..N {
            self.charts[index] = LedChart::new();
            self.inbox[index].clear();
            let _ = self.pins[index].set_state(self.configs[index].off_level);
        }
        self.step_count = 0;
    }

    fn update(&mut self) {
        let tick = self.tick;
        tick.drain(|| self.step());
    }
}
