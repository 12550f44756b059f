//! nRF52840 + SoftDevice S140 adapters behind the library's ports.
//!
//! - **radio**   - `AdvertisingRadio` over non-connectable SoftDevice
//!   advertising.
//! - **sampler** - `TelemetrySampler` over the SoftDevice die temperature
//!   sensor and the SAADC VDD channel.
//! - **timer_slot** - `OneShotTimer` over an embassy timer task with a
//!   single slot.
//! - **input**   - GPIOTE edge task feeding the digital input watcher.
//! - **power**   - DC/DC + low-power mode requests.
//!
//! All event sources feed [`EVENTS`]; the controller in `main.rs` is its
//! only consumer.

pub mod input;
pub mod power;
pub mod radio;
pub mod sampler;
pub mod timer_slot;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use nrf_softdevice::{raw, Softdevice};
use sensor_beacon::config::EVENT_QUEUE_DEPTH;
use sensor_beacon::BeaconEvent;

/// Single-consumer event queue: timer ticks and input edges.
pub static EVENTS: Channel<CriticalSectionRawMutex, BeaconEvent, EVENT_QUEUE_DEPTH> =
    Channel::new();

/// SoftDevice configuration for a broadcaster: one advertising set, no
/// connection roles.
pub fn softdevice_config() -> nrf_softdevice::Config {
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 0,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        ..Default::default()
    }
}

/// Drives the SoftDevice event loop.
#[embassy_executor::task]
pub async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}
