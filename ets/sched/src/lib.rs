#![no_std]
#![forbid(unsafe_code)]

//! # ETS Scheduler
//!
//! The cooperative scheduler: turns accumulated ticks into bounded bursts
//! of task execution while tracking worst-case execution time per task.
//! Tasks run to completion, in table order, one full pass per owed tick.

pub mod scheduler;
pub mod task;

pub use ets_core::*;
pub use scheduler::*;
pub use task::*;
