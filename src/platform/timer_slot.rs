//! Single-slot one-shot timer.
//!
//! `arm` records a deadline and hands it to the timer task; when it
//! expires the task frees the slot and queues a `TimerTick`.  Arming
//! while a timer is still outstanding fails with `SlotBusy`.
//!
//! Deadlines are chained off the previous one, not off the moment `arm`
//! runs, so queueing and dispatch latency do not stretch the period.

use core::sync::atomic::{AtomicBool, Ordering};

use defmt::trace;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Timer};
use sensor_beacon::timer::next_deadline;
use sensor_beacon::{BeaconEvent, OneShotTimer, TimerError};

use super::EVENTS;

static DEADLINE: Signal<CriticalSectionRawMutex, Instant> = Signal::new();
static OUTSTANDING: AtomicBool = AtomicBool::new(false);

pub struct TimerSlot {
    last: Option<Instant>,
}

impl TimerSlot {
    pub const fn new() -> Self {
        Self { last: None }
    }
}

impl OneShotTimer for TimerSlot {
    fn arm(&mut self, interval_ms: u32) -> Result<(), TimerError> {
        if OUTSTANDING.swap(true, Ordering::AcqRel) {
            return Err(TimerError::SlotBusy);
        }

        let period = Duration::from_millis(interval_ms.into()).as_ticks();
        let now = Instant::now().as_ticks();
        let Some(deadline) = next_deadline(self.last.map(|i| i.as_ticks()), now, period) else {
            OUTSTANDING.store(false, Ordering::Release);
            return Err(TimerError::Exhausted);
        };

        let deadline = Instant::from_ticks(deadline);
        self.last = Some(deadline);
        DEADLINE.signal(deadline);
        Ok(())
    }
}

#[embassy_executor::task]
pub async fn timer_task() -> ! {
    loop {
        let deadline = DEADLINE.wait().await;
        Timer::at(deadline).await;
        OUTSTANDING.store(false, Ordering::Release);
        trace!("Timer fired");
        EVENTS.send(BeaconEvent::TimerTick).await;
    }
}
