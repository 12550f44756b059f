//! Periodic tick built on a one-shot timer primitive.
//!
//! The platform only offers timers that fire once.  `PeriodicTimer`
//! turns that into a recurring tick by arming the next timer as the
//! very first thing the fire handler does, before any of the tick's
//! work, so a slow tick cannot swallow the next one.  Platforms should
//! chain deadlines with [`next_deadline`] so the period does not drift
//! by the handling latency of every tick.
//!
//! There is no cancel: once started, the chain runs until reset.  If
//! arming ever fails the chain is broken for good and the caller must
//! halt.

use crate::error::TimerError;

/// One-shot timer primitive with a single slot.
pub trait OneShotTimer {
    /// Arm a timer that fires once after `interval_ms`.
    fn arm(&mut self, interval_ms: u32) -> Result<(), TimerError>;
}

/// Recurring tick over a [`OneShotTimer`].
pub struct PeriodicTimer<T> {
    timer: T,
    interval_ms: u32,
    started: bool,
    ticks: u32,
}

impl<T: OneShotTimer> PeriodicTimer<T> {
    pub fn new(timer: T, interval_ms: u32) -> Self {
        Self {
            timer,
            interval_ms,
            started: false,
            ticks: 0,
        }
    }

    /// Arm the first timer. A second call is rejected: there is only one
    /// timer slot.
    pub fn start(&mut self) -> Result<(), TimerError> {
        if self.started {
            return Err(TimerError::SlotBusy);
        }
        self.timer.arm(self.interval_ms)?;
        self.started = true;
        Ok(())
    }

    /// Handle a firing: re-arm for the same interval and return the
    /// 1-based tick number. Must run before the tick's work.
    pub fn on_fire(&mut self) -> Result<u32, TimerError> {
        self.timer.arm(self.interval_ms)?;
        self.ticks = self.ticks.wrapping_add(1);
        Ok(self.ticks)
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn inner(&self) -> &T {
        &self.timer
    }
}

/// Deadline for the next firing, in platform ticks.
///
/// Counted from the previous deadline rather than from `now` so handling
/// latency does not accumulate into the period. If the chain has fallen
/// more than a period behind, it restarts from `now` instead of firing a
/// burst of catch-up ticks. `None` on overflow.
pub fn next_deadline(previous: Option<u64>, now: u64, period: u64) -> Option<u64> {
    match previous.and_then(|prev| prev.checked_add(period)) {
        Some(next) if next > now => Some(next),
        _ => now.checked_add(period),
    }
}
