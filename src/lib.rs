//! Host-testable core of sensor-beacon.
//!
//! Everything with state, timing or byte-layout rules lives here, generic
//! over small port traits and the `embedded-hal` pin traits.  The
//! embedded binary (`main.rs`, `embedded` feature) only adds the nRF52840
//! adapters behind those ports.
//!
//! Usage: `cargo test` (no hardware required)
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main].

#![cfg_attr(not(test), no_std)]

pub mod ble;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod sensor;
pub mod timer;

pub use ble::payload::{AdvertisementPayload, InputLevel};
pub use ble::publisher::{AdvertisementPublisher, AdvertisingParams, AdvertisingRadio};
pub use controller::{BeaconController, BeaconEvent, BeaconState, Outcome, Phase};
pub use error::{Error, TimerError};
pub use input::DigitalInputWatcher;
pub use sensor::{SensorReading, TelemetrySampler};
pub use timer::{OneShotTimer, PeriodicTimer};

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests - frame-level properties across encoder and config
// ═══════════════════════════════════════════════════════════════════════════
