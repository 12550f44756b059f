//! Digital input watcher.
//!
//! The platform delivers a notification on every rising and falling
//! edge of the monitored line (weak pull-up).  Each notification is
//! turned into an event carrying the level read at that moment, so the
//! new state goes on air without waiting for the next telemetry tick.

use core::convert::Infallible;

use embedded_hal::digital::InputPin;

use crate::ble::payload::InputLevel;
use crate::controller::BeaconEvent;

pub struct DigitalInputWatcher<P> {
    line: P,
    edges: u32,
}

impl<P> DigitalInputWatcher<P>
where
    P: InputPin<Error = Infallible>,
{
    /// Watch `line`. The caller has already configured the pull-up and
    /// both-edge sensing on it.
    pub fn new(line: P) -> Self {
        Self { line, edges: 0 }
    }

    /// Current level of the line.
    pub fn level(&mut self) -> InputLevel {
        match self.line.is_high() {
            Ok(high) => InputLevel::from(high),
            Err(never) => match never {},
        }
    }

    /// Handle one edge notification.
    pub fn on_edge(&mut self) -> BeaconEvent {
        self.edges = self.edges.wrapping_add(1);
        BeaconEvent::InputEdge(self.level())
    }

    /// Edge notifications seen so far (wrapping).
    pub fn edges(&self) -> u32 {
        self.edges
    }

    /// Access to the line for the platform's edge wait.
    pub fn line_mut(&mut self) -> &mut P {
        &mut self.line
    }
}
