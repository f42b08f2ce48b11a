#![no_std]
#![forbid(unsafe_code)]

//! # ETS Core
//!
//! Core types for the ETS cooperative event-triggered task runtime.
//! This crate provides the interrupt-safe tick accounting primitives and
//! the elapsed-time abstraction the scheduler builds on.

use core::fmt;

pub mod diag;
pub mod tick;
pub mod time;

pub use tick::*;
pub use time::*;

/// ETS framework version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type used throughout the ETS runtime
pub type EtsResult<T> = Result<T, EtsError>;

/// Error types for ETS runtime operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtsError {
    /// Event queue is full
    QueueFull,
    /// Event queue is empty
    QueueEmpty,
    /// Task table capacity exceeded
    TooManyTasks,
    /// Elapsed-time measurement failed
    TimerError,
}

impl fmt::Display for EtsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EtsError::QueueFull => write!(f, "Event queue is full"),
            EtsError::QueueEmpty => write!(f, "Event queue is empty"),
            EtsError::TooManyTasks => write!(f, "Task table capacity exceeded"),
            EtsError::TimerError => write!(f, "Elapsed-time measurement failed"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EtsError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            EtsError::QueueFull => defmt::write!(fmt, "QueueFull"),
            EtsError::QueueEmpty => defmt::write!(fmt, "QueueEmpty"),
            EtsError::TooManyTasks => defmt::write!(fmt, "TooManyTasks"),
            EtsError::TimerError => defmt::write!(fmt, "TimerError"),
        }
    }
}
