//! sensor-beacon firmware entry point (nRF52840 + SoftDevice S140).
//!
//! Broadcasts temperature, battery level and one digital input in a
//! non-connectable manufacturer-specific advertisement.
//!
//! Tasks:
//! - `softdevice_task` - SoftDevice event loop
//! - `advertiser_task` - keeps the latest frame on air
//! - `timer_task`      - fires the one-shot timer, queues `TimerTick`
//! - `input_task`      - GPIOTE edges, queues `InputEdge`
//!
//! The main task is the single consumer of the event queue and the only
//! owner of the beacon state.
//!
//! DEFMT_LOG=debug cargo run --release --features embedded

#![no_std]
#![no_main]

mod platform;

use defmt::{debug, error, info, unwrap};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Level, Output, OutputDrive, Pin};
use embassy_nrf::interrupt::Priority;
use nrf_softdevice::Softdevice;
use panic_probe as _;
use sensor_beacon::config::TICK_INTERVAL_MS;
use sensor_beacon::{AdvertisementPublisher, BeaconController, Error, Outcome, PeriodicTimer};

use platform::radio::SoftdeviceRadio;
use platform::sampler::NrfSampler;
use platform::timer_slot::TimerSlot;

type Beacon = BeaconController<TimerSlot, NrfSampler<'static>, SoftdeviceRadio, Output<'static>>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("sensor-beacon starting");

    // SoftDevice reserves priorities 0, 1 and 4.
    let mut config = embassy_nrf::config::Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(config);

    let sd: &'static Softdevice = Softdevice::enable(&platform::softdevice_config());
    unwrap!(spawner.spawn(platform::softdevice_task(sd)));
    platform::power::enter_low_power(sd);

    // Heartbeat LED (active-low on the DK) and the monitored input.
    let heartbeat = Output::new(p.P0_13.degrade(), Level::High, OutputDrive::Standard);
    let watcher = platform::input::watcher(p.P0_11.degrade());
    let sampler = NrfSampler::new(sd, p.SAADC).await;

    let mut beacon: Beacon = BeaconController::new(
        PeriodicTimer::new(TimerSlot::new(), TICK_INTERVAL_MS),
        sampler,
        AdvertisementPublisher::new(SoftdeviceRadio::new()),
        heartbeat,
    );

    unwrap!(spawner.spawn(platform::radio::advertiser_task(sd)));
    unwrap!(spawner.spawn(platform::timer_slot::timer_task()));
    unwrap!(spawner.spawn(platform::input::input_task(watcher)));

    if let Err(e) = beacon.start() {
        halt(e);
    }
    info!("Beacon running ({} ms tick)", TICK_INTERVAL_MS);

    loop {
        let event = platform::EVENTS.receive().await;
        match beacon.dispatch(event) {
            Ok(Outcome::Tick { tick, reading }) => debug!(
                "Tick {}: temp={} battery={} mV",
                tick, reading.temperature, reading.battery_mv
            ),
            Ok(Outcome::Edge(level)) => info!("Input -> {}", level),
            Err(e) => halt(e),
        }
    }
}

/// The timer chain is broken: a stale beacon is worse than none, reset.
fn halt(e: Error) -> ! {
    error!("Beacon halted: {}", e);
    cortex_m::peripheral::SCB::sys_reset()
}
