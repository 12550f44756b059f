//! Beacon controller - wires timer, sampler, encoder and publisher.
//!
//! Execution model: one consumer drains a queue of [`BeaconEvent`]s and
//! hands each to [`BeaconController::dispatch`], which runs to
//! completion before the next event is taken.  Nothing else touches
//! [`BeaconState`], so the payload buffer needs no locking.
//!
//! ```text
//!   Idle ──start()──▶ Running ──timer arm fails──▶ Halted
//!                      │  ▲
//!          TimerTick / InputEdge
//! ```

use core::convert::Infallible;

use embedded_hal::digital::StatefulOutputPin;

use crate::ble::payload::{encode_input_state, encode_telemetry, AdvertisementPayload, InputLevel};
use crate::ble::publisher::{AdvertisementPublisher, AdvertisingRadio};
use crate::error::Error;
use crate::sensor::{SensorReading, TelemetrySampler};
use crate::timer::{OneShotTimer, PeriodicTimer};

/// The two things that can happen to a running beacon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BeaconEvent {
    /// The one-shot timer fired.
    TimerTick,
    /// The digital input changed; carries the level read on the edge.
    InputEdge(InputLevel),
}

/// Controller lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Built, first timer not armed yet.
    Idle,
    /// Timer chain alive, events are processed.
    Running,
    /// Timer chain broken. Terminal until reset.
    Halted,
}

/// Everything the beacon mutates, owned by the controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeaconState {
    pub payload: AdvertisementPayload,
    pub phase: Phase,
    /// Last telemetry sample, taken at start and on every tick.
    pub last_reading: Option<SensorReading>,
}

impl BeaconState {
    pub const fn new() -> Self {
        Self {
            payload: AdvertisementPayload::new(),
            phase: Phase::Idle,
            last_reading: None,
        }
    }
}

impl Default for BeaconState {
    fn default() -> Self {
        Self::new()
    }
}

/// What a successfully handled event did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Tick handled: re-armed, sampled, published.
    Tick { tick: u32, reading: SensorReading },
    /// Edge handled: input state published.
    Edge(InputLevel),
}

pub struct BeaconController<T, S, R, H> {
    state: BeaconState,
    timer: PeriodicTimer<T>,
    sampler: S,
    publisher: AdvertisementPublisher<R>,
    heartbeat: H,
}

impl<T, S, R, H> BeaconController<T, S, R, H>
where
    T: OneShotTimer,
    S: TelemetrySampler,
    R: AdvertisingRadio,
    H: StatefulOutputPin<Error = Infallible>,
{
    pub fn new(
        timer: PeriodicTimer<T>,
        sampler: S,
        publisher: AdvertisementPublisher<R>,
        heartbeat: H,
    ) -> Self {
        Self {
            state: BeaconState::new(),
            timer,
            sampler,
            publisher,
            heartbeat,
        }
    }

    /// Arm the first timer, then do one tick's work right away so real
    /// telemetry is on air from boot instead of the placeholder bytes.
    ///
    /// A timer failure here is fatal exactly like one during a tick.
    pub fn start(&mut self) -> Result<(), Error> {
        match self.state.phase {
            Phase::Idle => {}
            Phase::Running => return Ok(()),
            Phase::Halted => return Err(Error::Halted),
        }

        if let Err(e) = self.timer.start() {
            self.state.phase = Phase::Halted;
            return Err(e.into());
        }

        self.sample_and_publish();
        self.state.phase = Phase::Running;
        Ok(())
    }

    /// Handle one event to completion.
    pub fn dispatch(&mut self, event: BeaconEvent) -> Result<Outcome, Error> {
        match self.state.phase {
            Phase::Idle => return Err(Error::NotStarted),
            Phase::Halted => return Err(Error::Halted),
            Phase::Running => {}
        }

        match event {
            BeaconEvent::TimerTick => self.on_timer_tick(),
            BeaconEvent::InputEdge(level) => Ok(self.on_input_edge(level)),
        }
    }

    fn on_timer_tick(&mut self) -> Result<Outcome, Error> {
        // Re-arm before anything else; a broken chain halts the beacon.
        let tick = match self.timer.on_fire() {
            Ok(tick) => tick,
            Err(e) => {
                self.state.phase = Phase::Halted;
                return Err(e.into());
            }
        };

        let reading = self.sample_and_publish();
        Ok(Outcome::Tick { tick, reading })
    }

    /// Heartbeat, sample, encode, publish. The timer is already armed.
    fn sample_and_publish(&mut self) -> SensorReading {
        match self.heartbeat.toggle() {
            Ok(()) => {}
            Err(never) => match never {},
        }

        let reading = self.sampler.sample();
        encode_telemetry(&mut self.state.payload, &reading);
        self.publisher.publish(&self.state.payload);
        self.state.last_reading = Some(reading);
        reading
    }

    fn on_input_edge(&mut self, level: InputLevel) -> Outcome {
        encode_input_state(&mut self.state.payload, level);
        self.publisher.publish(&self.state.payload);
        Outcome::Edge(level)
    }

    pub fn state(&self) -> &BeaconState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn payload(&self) -> &AdvertisementPayload {
        &self.state.payload
    }

    pub fn publisher(&self) -> &AdvertisementPublisher<R> {
        &self.publisher
    }

    pub fn timer(&self) -> &PeriodicTimer<T> {
        &self.timer
    }

    pub fn heartbeat(&self) -> &H {
        &self.heartbeat
    }
}
