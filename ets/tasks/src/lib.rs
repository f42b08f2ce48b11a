#![no_std]
#![forbid(unsafe_code)]

//! # ETS Tasks
//!
//! The event handoff primitives (single-slot mailbox, bounded event queue)
//! and the two concrete statechart tasks of the runtime: the system task
//! and the actuator task. Every task follows the same pattern: drain the
//! private tick counter, and per owed tick run exactly one statechart
//! step consuming at most one pending event.

pub mod actuator;
pub mod mailbox;
pub mod queue;
pub mod system;

pub use actuator::*;
pub use mailbox::*;
pub use queue::*;
pub use system::*;

/// Depth of the system task's inbound event queue
pub const SYS_QUEUE_DEPTH: usize = 8;
