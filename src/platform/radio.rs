//! SoftDevice broadcaster.
//!
//! `store_adv_data` / `start_advertising` are synchronous and only stage
//! the frame; the advertiser task owns the actual SoftDevice advertising
//! and restarts it whenever a new frame is signalled.  The device's
//! factory random static address is used on air.

use defmt::{debug, info};
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use heapless::Vec;
use nrf_softdevice::ble::peripheral::{self, FilterPolicy, NonconnectableAdvertisement};
use nrf_softdevice::Softdevice;
use sensor_beacon::ble::payload::{encode_ad_structure, MAX_ADV_DATA};
use sensor_beacon::{AdvertisingParams, AdvertisingRadio};

/// Advertising interval unit used by the SoftDevice (0.625 ms).
const ADV_INTERVAL_UNIT_US: u32 = 625;

/// A frame ready to go on air.
#[derive(Clone)]
pub struct Refresh {
    data: Vec<u8, MAX_ADV_DATA>,
    params: AdvertisingParams,
}

static REFRESH: Signal<CriticalSectionRawMutex, Refresh> = Signal::new();

/// Stages advertising data for the advertiser task.
pub struct SoftdeviceRadio {
    staged: Vec<u8, MAX_ADV_DATA>,
}

impl SoftdeviceRadio {
    pub const fn new() -> Self {
        Self { staged: Vec::new() }
    }
}

impl AdvertisingRadio for SoftdeviceRadio {
    fn store_adv_data(&mut self, data: &[u8]) {
        self.staged.clear();
        if data.is_empty() {
            // Drop any frame the advertiser has not picked up yet.
            REFRESH.reset();
            return;
        }

        // The SoftDevice takes complete AD structures: prepend the length.
        let mut buf = [0u8; MAX_ADV_DATA];
        match encode_ad_structure(data, &mut buf).and_then(|len| Vec::from_slice(&buf[..len]).ok()) {
            Some(staged) => self.staged = staged,
            None => defmt::panic!("advertising data exceeds {} bytes", MAX_ADV_DATA),
        }
    }

    fn start_advertising(&mut self, params: &AdvertisingParams) {
        if params.connectable || params.discoverable || params.whitelist {
            defmt::panic!("broadcaster supports non-connectable, non-discoverable only");
        }
        REFRESH.signal(Refresh {
            data: self.staged.clone(),
            params: *params,
        });
    }
}

fn advertising_config(params: &AdvertisingParams) -> peripheral::Config {
    peripheral::Config {
        interval: params.interval_ms * 1000 / ADV_INTERVAL_UNIT_US,
        filter_policy: FilterPolicy::Any,
        timeout: None,
        ..Default::default()
    }
}

/// Runs SoftDevice advertising with the latest frame.
///
/// A new frame stops the running advertisement (dropping the future
/// stops it in the SoftDevice) and starts over with the new data.
#[embassy_executor::task]
pub async fn advertiser_task(sd: &'static Softdevice) -> ! {
    let mut current = REFRESH.wait().await;
    info!(
        "Advertising started ({} ms interval)",
        current.params.interval_ms
    );

    loop {
        let config = advertising_config(&current.params);
        let adv = NonconnectableAdvertisement::NonscannableUndirected {
            adv_data: &current.data,
        };

        let result = select(peripheral::advertise(sd, adv, &config), REFRESH.wait()).await;
        match result {
            Either::First(Ok(())) => debug!("Advertising ended, restarting"),
            Either::First(Err(e)) => defmt::panic!("advertising failed: {:?}", e),
            Either::Second(next) => {
                debug!("Advertising data refreshed ({} bytes)", next.data.len());
                current = next;
            }
        }
    }
}
