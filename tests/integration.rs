//! Integration tests for sensor-beacon host-testable logic.
//!
//! The controller is driven through mock ports the way the firmware
//! drives it: events are queued, then drained one at a time.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};
use heapless::Deque;
use sensor_beacon::ble::payload::INPUT_STATE_OFFSET;
use sensor_beacon::{
    AdvertisementPayload, AdvertisementPublisher, AdvertisingParams, AdvertisingRadio,
    BeaconController, BeaconEvent, Error, InputLevel, OneShotTimer, Outcome, PeriodicTimer, Phase,
    SensorReading, TelemetrySampler, TimerError,
};

// ═══════════════════════════════════════════════════════════════════════════
// Mock ports
// ═══════════════════════════════════════════════════════════════════════════

/// One-shot timer that can be armed `budget` times.
struct MockTimer {
    budget: usize,
    armed: Vec<u32>,
}

impl OneShotTimer for MockTimer {
    fn arm(&mut self, interval_ms: u32) -> Result<(), TimerError> {
        if self.armed.len() >= self.budget {
            return Err(TimerError::Exhausted);
        }
        self.armed.push(interval_ms);
        Ok(())
    }
}

/// Returns readings from a script, repeating the last one.
struct ScriptedSampler {
    script: Vec<SensorReading>,
    calls: usize,
}

impl TelemetrySampler for ScriptedSampler {
    fn sample(&mut self) -> SensorReading {
        let i = self.calls.min(self.script.len() - 1);
        self.calls += 1;
        self.script[i]
    }
}

#[derive(Default)]
struct MockRadio {
    /// Frames stored at full length, in order.
    frames: Vec<Vec<u8>>,
    clears: usize,
    starts: Vec<AdvertisingParams>,
}

impl AdvertisingRadio for MockRadio {
    fn store_adv_data(&mut self, data: &[u8]) {
        if data.is_empty() {
            self.clears += 1;
        } else {
            self.frames.push(data.to_vec());
        }
    }

    fn start_advertising(&mut self, params: &AdvertisingParams) {
        self.starts.push(*params);
    }
}

#[derive(Default)]
struct MockLed {
    high: bool,
    toggles: usize,
}

impl ErrorType for MockLed {
    type Error = Infallible;
}

impl OutputPin for MockLed {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.high = true;
        Ok(())
    }
}

impl StatefulOutputPin for MockLed {
    fn is_set_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.high)
    }

    fn is_set_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.high)
    }

    fn toggle(&mut self) -> Result<(), Infallible> {
        self.toggles += 1;
        self.high = !self.high;
        Ok(())
    }
}

type TestController = BeaconController<MockTimer, ScriptedSampler, MockRadio, MockLed>;

fn controller(timer_budget: usize, script: Vec<SensorReading>) -> TestController {
    BeaconController::new(
        PeriodicTimer::new(
            MockTimer {
                budget: timer_budget,
                armed: Vec::new(),
            },
            1000,
        ),
        ScriptedSampler { script, calls: 0 },
        AdvertisementPublisher::new(MockRadio::default()),
        MockLed::default(),
    )
}

fn reading(temperature: i16, battery_mv: u16) -> SensorReading {
    SensorReading {
        temperature,
        battery_mv,
    }
}

/// Drain the queue the way the firmware's controller task does.
fn drain<const N: usize>(
    ctl: &mut TestController,
    queue: &mut Deque<BeaconEvent, N>,
) -> Vec<Result<Outcome, Error>> {
    let mut results = Vec::new();
    while let Some(event) = queue.pop_front() {
        results.push(ctl.dispatch(event));
    }
    results
}

// ═══════════════════════════════════════════════════════════════════════════
// Lifecycle
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn start_arms_timer_and_publishes_sampled_frame() {
    let mut ctl = controller(8, vec![reading(0x0050, 3700)]);
    assert_eq!(ctl.phase(), Phase::Idle);

    ctl.start().unwrap();

    assert_eq!(ctl.phase(), Phase::Running);
    assert_eq!(ctl.timer().inner().armed, vec![1000]);
    assert_eq!(ctl.heartbeat().toggles, 1);
    assert_eq!(ctl.state().last_reading, Some(reading(0x0050, 3700)));

    let radio = ctl.publisher().radio();
    assert_eq!(radio.frames.len(), 1);
    // Real telemetry from boot, not the 0x01/0x00/0x01 placeholders.
    assert_eq!(&radio.frames[0][22..25], &[170, 0x00, 0x50]);
    assert_eq!(radio.frames[0][INPUT_STATE_OFFSET], 0);
    let startup = AdvertisementPayload::new();
    assert_eq!(&radio.frames[0][..22], &startup.as_bytes()[..22]);
    assert_eq!(radio.starts, vec![AdvertisingParams::BROADCASTER]);
}

#[test]
fn start_sample_is_not_a_timer_tick() {
    let mut ctl = controller(8, vec![reading(1, 3300), reading(2, 3400)]);
    ctl.start().unwrap();
    assert_eq!(ctl.timer().ticks(), 0);

    assert_eq!(
        ctl.dispatch(BeaconEvent::TimerTick),
        Ok(Outcome::Tick {
            tick: 1,
            reading: reading(2, 3400)
        })
    );
    assert_eq!(ctl.timer().inner().armed.len(), 2);
}

#[test]
fn events_before_start_are_rejected() {
    let mut ctl = controller(8, vec![reading(0, 3300)]);
    assert_eq!(ctl.dispatch(BeaconEvent::TimerTick), Err(Error::NotStarted));
    assert_eq!(
        ctl.dispatch(BeaconEvent::InputEdge(InputLevel::High)),
        Err(Error::NotStarted)
    );
    assert_eq!(ctl.publisher().published(), 0);
}

#[test]
fn start_is_idempotent_while_running() {
    let mut ctl = controller(8, vec![reading(0, 3300)]);
    ctl.start().unwrap();
    ctl.start().unwrap();
    assert_eq!(ctl.timer().inner().armed.len(), 1);
    assert_eq!(ctl.publisher().published(), 1);
}

#[test]
fn start_failure_halts_without_publishing() {
    let mut ctl = controller(0, vec![reading(0, 3300)]);
    assert_eq!(ctl.start(), Err(Error::Timer(TimerError::Exhausted)));
    assert_eq!(ctl.phase(), Phase::Halted);
    assert_eq!(ctl.publisher().published(), 0);
    assert_eq!(ctl.start(), Err(Error::Halted));
}

// ═══════════════════════════════════════════════════════════════════════════
// Timer cadence
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn n_ticks_give_n_publishes_and_n_toggles() {
    const N: usize = 5;
    let mut ctl = controller(N + 1, vec![reading(100, 3300)]);
    ctl.start().unwrap();
    let before = ctl.publisher().published();

    let mut queue: Deque<BeaconEvent, 8> = Deque::new();
    for _ in 0..N {
        queue.push_back(BeaconEvent::TimerTick).unwrap();
    }
    let results = drain(&mut ctl, &mut queue);

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(ctl.publisher().published() - before, N as u32);
    // One toggle from start, then one per tick.
    assert_eq!(ctl.heartbeat().toggles, N + 1);
    assert_eq!(ctl.timer().ticks(), N as u32);
    assert!(ctl.timer().inner().armed.iter().all(|&ms| ms == 1000));
    assert_eq!(ctl.timer().inner().armed.len(), N + 1);
}

#[test]
fn tick_encodes_latest_sample() {
    let mut ctl = controller(
        8,
        vec![reading(0, 3000), reading(0x0102, 3300), reading(-5, 2500)],
    );
    ctl.start().unwrap();

    let first = ctl.dispatch(BeaconEvent::TimerTick).unwrap();
    assert_eq!(
        first,
        Outcome::Tick {
            tick: 1,
            reading: reading(0x0102, 3300)
        }
    );
    assert_eq!(&ctl.payload().as_bytes()[22..25], &[130, 0x01, 0x02]);

    ctl.dispatch(BeaconEvent::TimerTick).unwrap();
    assert_eq!(ctl.payload().battery_byte(), 50);
    assert_eq!(ctl.payload().temperature(), -5);
    assert_eq!(ctl.state().last_reading, Some(reading(-5, 2500)));

    let last = ctl.publisher().radio().frames.last().unwrap();
    assert_eq!(last.as_slice(), ctl.payload().as_bytes());
}

#[test]
fn every_publish_clears_first() {
    let mut ctl = controller(8, vec![reading(0, 3300)]);
    ctl.start().unwrap();
    ctl.dispatch(BeaconEvent::TimerTick).unwrap();
    ctl.dispatch(BeaconEvent::InputEdge(InputLevel::High)).unwrap();

    let radio = ctl.publisher().radio();
    assert_eq!(radio.clears, 3);
    assert_eq!(radio.frames.len(), 3);
    assert_eq!(radio.starts.len(), 3);
}

// ═══════════════════════════════════════════════════════════════════════════
// Input edges
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn edge_between_ticks_publishes_immediately() {
    let mut ctl = controller(8, vec![reading(0, 3300)]);
    ctl.start().unwrap();
    ctl.dispatch(BeaconEvent::TimerTick).unwrap();
    let published = ctl.publisher().published();

    let outcome = ctl.dispatch(BeaconEvent::InputEdge(InputLevel::High)).unwrap();

    assert_eq!(outcome, Outcome::Edge(InputLevel::High));
    assert_eq!(ctl.publisher().published(), published + 1);
    let last = ctl.publisher().radio().frames.last().unwrap();
    assert_eq!(last[INPUT_STATE_OFFSET], 1);
    // No timer activity on an edge.
    assert_eq!(ctl.timer().inner().armed.len(), 2);
    assert_eq!(ctl.heartbeat().toggles, 2);
}

#[test]
fn edges_interleave_with_ticks() {
    let mut ctl = controller(8, vec![reading(20, 3000)]);
    ctl.start().unwrap();

    let mut queue: Deque<BeaconEvent, 8> = Deque::new();
    for event in [
        BeaconEvent::TimerTick,
        BeaconEvent::InputEdge(InputLevel::High),
        BeaconEvent::InputEdge(InputLevel::Low),
        BeaconEvent::TimerTick,
        BeaconEvent::InputEdge(InputLevel::High),
    ] {
        queue.push_back(event).unwrap();
    }
    let results = drain(&mut ctl, &mut queue);

    let input_bytes: Vec<u8> = ctl
        .publisher()
        .radio()
        .frames
        .iter()
        .map(|f| f[INPUT_STATE_OFFSET])
        .collect();
    // startup, tick, high, low, tick, high
    assert_eq!(input_bytes, vec![0, 0, 1, 0, 0, 1]);
    let edges = results
        .iter()
        .filter(|r| matches!(r, Ok(Outcome::Edge(_))))
        .count();
    assert_eq!(edges, 3);
    assert_eq!(ctl.timer().ticks(), 2);
}

#[test]
fn tick_does_not_touch_input_state() {
    let mut ctl = controller(8, vec![reading(1, 4000)]);
    ctl.start().unwrap();
    ctl.dispatch(BeaconEvent::InputEdge(InputLevel::High)).unwrap();
    ctl.dispatch(BeaconEvent::TimerTick).unwrap();
    assert_eq!(ctl.payload().input_state(), 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// Frame invariants
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn fixed_fields_identical_across_all_publishes() {
    let mut ctl = controller(
        16,
        vec![
            reading(i16::MIN, 0),
            reading(-1, 5200),
            reading(i16::MAX, u16::MAX),
        ],
    );
    ctl.start().unwrap();
    for i in 0..6 {
        ctl.dispatch(BeaconEvent::TimerTick).unwrap();
        ctl.dispatch(BeaconEvent::InputEdge(InputLevel::from(i % 2 == 0)))
            .unwrap();
    }

    let startup = AdvertisementPayload::new();
    for frame in &ctl.publisher().radio().frames {
        assert_eq!(frame.len(), 26);
        assert_eq!(&frame[..21], &startup.as_bytes()[..21]);
        assert_eq!(frame[25], startup.as_bytes()[25]);
    }
}

#[test]
fn out_of_range_battery_saturates_on_air() {
    let mut ctl = controller(8, vec![reading(0, 5200)]);
    ctl.start().unwrap();
    ctl.dispatch(BeaconEvent::TimerTick).unwrap();
    assert_eq!(ctl.payload().battery_byte(), 255);
}

// ═══════════════════════════════════════════════════════════════════════════
// Fatal path
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn rearm_failure_halts_with_zero_further_publishes() {
    // Budget covers start + 2 re-arms; the third tick cannot re-arm.
    let mut ctl = controller(3, vec![reading(0, 3300)]);
    ctl.start().unwrap();
    ctl.dispatch(BeaconEvent::TimerTick).unwrap();
    ctl.dispatch(BeaconEvent::TimerTick).unwrap();
    let published = ctl.publisher().published();
    let toggles = ctl.heartbeat().toggles;

    assert_eq!(
        ctl.dispatch(BeaconEvent::TimerTick),
        Err(Error::Timer(TimerError::Exhausted))
    );
    assert_eq!(ctl.phase(), Phase::Halted);

    // Nothing gets through once halted, not even input edges.
    assert_eq!(ctl.dispatch(BeaconEvent::TimerTick), Err(Error::Halted));
    assert_eq!(
        ctl.dispatch(BeaconEvent::InputEdge(InputLevel::High)),
        Err(Error::Halted)
    );
    assert_eq!(ctl.publisher().published(), published);
    assert_eq!(ctl.heartbeat().toggles, toggles);
    assert_eq!(ctl.timer().ticks(), 2);
}

#[test]
fn failed_tick_does_not_sample() {
    let mut ctl = controller(1, vec![reading(7, 3300), reading(9, 4000)]);
    ctl.start().unwrap();
    assert!(ctl.dispatch(BeaconEvent::TimerTick).is_err());
    // Only the start sample was taken.
    assert_eq!(ctl.state().last_reading, Some(reading(7, 3300)));
    assert_eq!(ctl.publisher().published(), 1);
}
