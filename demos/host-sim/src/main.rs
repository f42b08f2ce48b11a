//! Host simulation of the ETS firmware main loop
//!
//! Wires the tick source, scheduler and both statechart tasks exactly the
//! way the embedded application does, but drives the "timer interrupt"
//! from a plain loop and the output line to the console. Useful for
//! watching the event flow without a board attached.

use std::convert::Infallible;
use std::time::Instant;

use embedded_hal::digital::OutputPin;
use ets_sched::{CycleCounter, Scheduler, Task, TickCounter, TickSource};
use ets_tasks::{
    ActuatorTask, EventQueue, LedConfig, LedEvent, Mailbox, SysEvent, SystemTask, SYS_QUEUE_DEPTH,
};

/// Microsecond elapsed-time source over `std::time::Instant`
struct InstantCycleCounter {
    start: Instant,
}

impl InstantCycleCounter {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl CycleCounter for InstantCycleCounter {
    fn reset(&mut self) {
        self.start = Instant::now();
    }

    fn elapsed_us(&mut self) -> u32 {
        self.start.elapsed().as_micros() as u32
    }
}

/// Output line that reports level changes on the console
struct ConsolePin {
    label: &'static str,
}

impl embedded_hal::digital::ErrorType for ConsolePin {
    type Error = Infallible;
}

impl OutputPin for ConsolePin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        println!("[{:>4}] {} -> LOW", TICK.value(), self.label);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        println!("[{:>4}] {} -> HIGH", TICK.value(), self.label);
        Ok(())
    }
}

// Shared counters and handoff slots, static as they are in the firmware.
static TICK: TickCounter = TickCounter::new();
static GLOBAL_TICKS: TickCounter = TickCounter::new();
static SYSTEM_TICKS: TickCounter = TickCounter::new();
static ACTUATOR_TICKS: TickCounter = TickCounter::new();
static SYSTEM_QUEUE: EventQueue<SysEvent, SYS_QUEUE_DEPTH> = EventQueue::new();
static LED_INBOX: [Mailbox<LedEvent>; 1] = [Mailbox::new()];

fn main() {
    let counters: [&TickCounter; 3] = [&GLOBAL_TICKS, &SYSTEM_TICKS, &ACTUATOR_TICKS];
    let source = TickSource::new(&counters);

    let mut system = SystemTask::new(&SYSTEM_TICKS, &SYSTEM_QUEUE, &LED_INBOX);
    let mut actuator = ActuatorTask::new(
        &ACTUATOR_TICKS,
        &LED_INBOX,
        [LedConfig::active_high()],
        [ConsolePin { label: "LED_A" }],
    );

    let mut sched: Scheduler<_, 2> = Scheduler::new(&GLOBAL_TICKS, InstantCycleCounter::new());
    let mut tasks: [&mut dyn Task; 2] = [&mut system, &mut actuator];
    sched.init(&mut tasks, &source);

    println!("ets host-sim: 1000 simulated ticks");

    for ms in 0u32..1_000 {
        // One simulated timer firing per millisecond of model time.
        TICK.increment();
        source.on_tick();

        match ms {
            100 => {
                SYSTEM_QUEUE.put(SysEvent::LoopDetected).expect("queue full");
                println!("[{:>4}] producer: LoopDetected", TICK.value());
            }
            600 => {
                SYSTEM_QUEUE.put(SysEvent::Idle).expect("queue full");
                println!("[{:>4}] producer: Idle", TICK.value());
            }
            // Simulated foreground stall: skip nine drains, then catch up.
            300..=308 => continue,
            _ => {}
        }

        sched.update(&mut tasks);
    }
    sched.update(&mut tasks);

    println!();
    println!("passes executed:     {}", sched.pass_count());
    println!("system steps:        {}", system.step_count());
    println!("actuator steps:      {}", actuator.step_count());
    println!("system WCET [us]:    {}", sched.wcet_us(0).unwrap_or(0));
    println!("actuator WCET [us]:  {}", sched.wcet_us(1).unwrap_or(0));
}
