//! Pushes the advertisement frame to the radio stack.
//!
//! The radio stack caches advertising data, so every payload change goes
//! through the same three steps, even when advertising is already running:
//!
//! 1. store zero-length data (drops the cached frame),
//! 2. store the full frame,
//! 3. (re)enable broadcasting.

use crate::ble::payload::AdvertisementPayload;
use crate::config::ADV_INTERVAL_MS;

/// Address used on air.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressKind {
    /// Fixed device-generated address, stable across the process lifetime.
    Static,
}

/// Advertising parameters, fixed at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdvertisingParams {
    /// Advertising interval (ms); min and max are equal.
    pub interval_ms: u32,
    pub connectable: bool,
    pub discoverable: bool,
    pub address: AddressKind,
    pub whitelist: bool,
}

impl AdvertisingParams {
    /// Broadcaster role: non-connectable, non-discoverable, static address,
    /// whitelist disabled.
    pub const BROADCASTER: Self = Self {
        interval_ms: ADV_INTERVAL_MS,
        connectable: false,
        discoverable: false,
        address: AddressKind::Static,
        whitelist: false,
    };
}

/// Radio-stack boundary.
///
/// Both calls are assumed to succeed; an implementation that hits an
/// unexpected stack error should treat it as a defect and panic.
pub trait AdvertisingRadio {
    /// Replace the advertising data. An empty slice clears it.
    fn store_adv_data(&mut self, data: &[u8]);

    /// Start advertising, or restart it so the stored data is picked up.
    fn start_advertising(&mut self, params: &AdvertisingParams);
}

/// Clear-then-set-then-enable publisher.
pub struct AdvertisementPublisher<R> {
    radio: R,
    params: AdvertisingParams,
    published: u32,
}

impl<R: AdvertisingRadio> AdvertisementPublisher<R> {
    pub fn new(radio: R) -> Self {
        Self {
            radio,
            params: AdvertisingParams::BROADCASTER,
            published: 0,
        }
    }

    /// Broadcast `payload`. Runs all three steps unconditionally.
    pub fn publish(&mut self, payload: &AdvertisementPayload) {
        self.radio.store_adv_data(&[]);
        self.radio.store_adv_data(payload.as_bytes());
        self.radio.start_advertising(&self.params);
        self.published = self.published.wrapping_add(1);
    }

    /// Number of publish calls since startup (wrapping).
    pub fn published(&self) -> u32 {
        self.published
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }
}
