//! GPIO input task.
//!
//! The line is configured with a weak pull-up; GPIOTE wakes the task on
//! every rising and falling edge.  No debouncing: each edge is reported
//! so the frame always reflects the latest level.

use defmt::debug;
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use sensor_beacon::DigitalInputWatcher;

use super::EVENTS;

/// Configure the monitored line.
pub fn watcher(pin: AnyPin) -> DigitalInputWatcher<Input<'static>> {
    DigitalInputWatcher::new(Input::new(pin, Pull::Up))
}

#[embassy_executor::task]
pub async fn input_task(mut watcher: DigitalInputWatcher<Input<'static>>) -> ! {
    loop {
        watcher.line_mut().wait_for_any_edge().await;
        let event = watcher.on_edge();
        debug!("Input: {} (edge #{})", event, watcher.edges());
        EVENTS.send(event).await;
    }
}
