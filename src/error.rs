//! Unified error type for sensor-beacon.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for efficient
//! on-target logging.
//!
//! Only the timer chain has a failure path. Sensor reads, pin reads and
//! radio-stack calls are assumed infallible: pins are bounded by
//! `Error = Infallible` and the port traits return plain values.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The one-shot timer could not be (re)armed. Fatal.
    Timer(TimerError),

    /// The controller halted after a timer failure; no further events
    /// are processed.
    Halted,

    /// An event arrived before `start()` armed the first timer.
    NotStarted,
}

/// Reasons a one-shot timer cannot be armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// The single timer slot still holds an outstanding timer.
    SlotBusy,
    /// The platform ran out of timer resources.
    Exhausted,
}

// Convenience conversions

impl From<TimerError> for Error {
    fn from(e: TimerError) -> Self {
        Error::Timer(e)
    }
}
