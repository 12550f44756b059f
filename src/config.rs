//! Application-wide constants and compile-time configuration.
//!
//! Frame layout, timing parameters and pin assignments live here so
//! they can be tuned in one place.

// Timing

/// Telemetry period: one sample + publish per tick (ms).
pub const TICK_INTERVAL_MS: u32 = 1000;

/// BLE advertising interval (ms). Used as both min and max.
pub const ADV_INTERVAL_MS: u32 = 500;

// Advertisement frame

/// Total length of the manufacturer-specific AD structure (bytes).
pub const PAYLOAD_LEN: usize = 26;

/// AD type for manufacturer-specific data.
pub const AD_TYPE_MANUFACTURER: u8 = 0xFF;

/// Bluetooth SIG company identifier, sent little-endian at offsets 1-2.
pub const COMPANY_ID: u16 = 0x004C;

/// Sub-type / length marker at offset 3.
pub const SUBTYPE_MARKER: u8 = 0x02;

/// Device/group identity block at offsets 4..=20.
pub const IDENTIFIER_BLOCK: [u8; 17] = [
    0x15, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E,
    0x0F, 0x10,
];

/// Placeholder for the mutable bytes (offsets 21..=24) until the first
/// tick overwrites them.
pub const PLACEHOLDER_FIELDS: [u8; 4] = [0x00, 0x01, 0x00, 0x01];

/// Fixed trailer byte at offset 25.
pub const TRAILER: u8 = 0x30;

// Battery encoding

/// Voltage represented by a battery byte of 0 (mV).
pub const BATTERY_OFFSET_MV: u16 = 2000;

/// Voltage step per battery byte count (mV). 0..=255 covers 2.00 V - 4.55 V.
pub const BATTERY_STEP_MV: u16 = 10;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Digital input (weak pull-up, both edges) → P0.11
//   Heartbeat LED                            → P0.13

// Event dispatch

/// Depth of the single-consumer event queue feeding the controller.
pub const EVENT_QUEUE_DEPTH: usize = 4;
