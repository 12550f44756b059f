//! Manufacturer-specific advertisement frame and its encoder.
//!
//! Layout (26 bytes; [`ad_structure`] prepends the AD length byte):
//! ```text
//! Byte 0:      AD type (0xFF, manufacturer-specific)
//! Byte 1-2:    Company identifier (little-endian)
//! Byte 3:      Sub-type / length marker
//! Byte 4-20:   Identifier block (device/group identity)
//! Byte 21:     Digital input state (0 or 1)             MUTABLE
//! Byte 22:     Battery level, (mV / 10) - 200           MUTABLE
//! Byte 23-24:  Temperature, raw sensor units, big-endian MUTABLE
//! Byte 25:     Trailer
//! ```
//!
//! The buffer is built once at startup and then only ever mutated
//! through [`encode_telemetry`] and [`encode_input_state`].

use crate::config::{
    AD_TYPE_MANUFACTURER, BATTERY_OFFSET_MV, BATTERY_STEP_MV, COMPANY_ID, IDENTIFIER_BLOCK,
    PAYLOAD_LEN, PLACEHOLDER_FIELDS, SUBTYPE_MARKER, TRAILER,
};
use crate::sensor::SensorReading;

/// Offset of the digital input state byte.
pub const INPUT_STATE_OFFSET: usize = 21;
/// Offset of the battery level byte.
pub const BATTERY_OFFSET: usize = 22;
/// Offset of the temperature high byte.
pub const TEMPERATURE_HI_OFFSET: usize = 23;
/// Offset of the temperature low byte.
pub const TEMPERATURE_LO_OFFSET: usize = 24;
/// Offset of the trailer byte.
pub const TRAILER_OFFSET: usize = 25;

/// Level of the monitored digital input line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputLevel {
    Low,
    High,
}

impl InputLevel {
    /// Wire representation: 0 = low, 1 = high.
    pub const fn as_byte(self) -> u8 {
        match self {
            InputLevel::Low => 0,
            InputLevel::High => 1,
        }
    }
}

impl From<bool> for InputLevel {
    fn from(high: bool) -> Self {
        if high {
            InputLevel::High
        } else {
            InputLevel::Low
        }
    }
}

/// Fixed-size advertisement buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdvertisementPayload {
    bytes: [u8; PAYLOAD_LEN],
}

impl AdvertisementPayload {
    /// Build the startup frame: static header, placeholder telemetry.
    pub const fn new() -> Self {
        let mut bytes = [0u8; PAYLOAD_LEN];
        let company = COMPANY_ID.to_le_bytes();
        bytes[0] = AD_TYPE_MANUFACTURER;
        bytes[1] = company[0];
        bytes[2] = company[1];
        bytes[3] = SUBTYPE_MARKER;

        let mut i = 0;
        while i < IDENTIFIER_BLOCK.len() {
            bytes[4 + i] = IDENTIFIER_BLOCK[i];
            i += 1;
        }

        let mut i = 0;
        while i < PLACEHOLDER_FIELDS.len() {
            bytes[INPUT_STATE_OFFSET + i] = PLACEHOLDER_FIELDS[i];
            i += 1;
        }

        bytes[TRAILER_OFFSET] = TRAILER;
        Self { bytes }
    }

    /// The frame exactly as it goes on air.
    pub fn as_bytes(&self) -> &[u8; PAYLOAD_LEN] {
        &self.bytes
    }

    /// Bytes that never change for the life of the process (0..=20, 25).
    pub fn fixed_fields(&self) -> ([u8; INPUT_STATE_OFFSET], u8) {
        let mut header = [0u8; INPUT_STATE_OFFSET];
        header.copy_from_slice(&self.bytes[..INPUT_STATE_OFFSET]);
        (header, self.bytes[TRAILER_OFFSET])
    }

    pub fn input_state(&self) -> u8 {
        self.bytes[INPUT_STATE_OFFSET]
    }

    pub fn battery_byte(&self) -> u8 {
        self.bytes[BATTERY_OFFSET]
    }

    /// Temperature as broadcast, decoded from the big-endian pair.
    pub fn temperature(&self) -> i16 {
        i16::from_be_bytes([
            self.bytes[TEMPERATURE_HI_OFFSET],
            self.bytes[TEMPERATURE_LO_OFFSET],
        ])
    }
}

impl Default for AdvertisementPayload {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a battery voltage to its one-byte wire form.
///
/// `mv / 10 - 200`, saturating at both ends: anything at or below
/// 2.00 V reads 0, anything at or above 4.55 V reads 255.
pub fn battery_byte(battery_mv: u16) -> u8 {
    let steps = (battery_mv / BATTERY_STEP_MV).saturating_sub(BATTERY_OFFSET_MV / BATTERY_STEP_MV);
    u8::try_from(steps).unwrap_or(u8::MAX)
}

/// Write battery level (offset 22) and temperature (offsets 23-24).
pub fn encode_telemetry(payload: &mut AdvertisementPayload, reading: &SensorReading) {
    let [hi, lo] = reading.temperature.to_be_bytes();
    payload.bytes[BATTERY_OFFSET] = battery_byte(reading.battery_mv);
    payload.bytes[TEMPERATURE_HI_OFFSET] = hi;
    payload.bytes[TEMPERATURE_LO_OFFSET] = lo;
}

/// Write the digital input state (offset 21).
pub fn encode_input_state(payload: &mut AdvertisementPayload, level: InputLevel) {
    payload.bytes[INPUT_STATE_OFFSET] = level.as_byte();
}

/// Frame length including the AD length byte.
pub const AD_STRUCTURE_LEN: usize = PAYLOAD_LEN + 1;

/// Legacy advertising data limit (bytes).
pub const MAX_ADV_DATA: usize = 31;

const _: () = assert!(AD_STRUCTURE_LEN <= MAX_ADV_DATA);

/// Prepend the AD length byte to `data`, writing into `out`.
///
/// Returns the number of bytes written, or `None` when `data` is empty,
/// does not fit a length byte or `out` is too short.
pub fn encode_ad_structure(data: &[u8], out: &mut [u8]) -> Option<usize> {
    let len = u8::try_from(data.len()).ok().filter(|&len| len > 0)?;
    let total = data.len() + 1;
    let out = out.get_mut(..total)?;
    out[0] = len;
    out[1..].copy_from_slice(data);
    Some(total)
}

/// The complete AD structure for `payload`: length byte, then the frame.
pub fn ad_structure(payload: &AdvertisementPayload) -> [u8; AD_STRUCTURE_LEN] {
    let mut out = [0u8; AD_STRUCTURE_LEN];
    out[0] = PAYLOAD_LEN as u8;
    out[1..].copy_from_slice(&payload.bytes);
    out
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests (run on host, not embedded)
// ═══════════════════════════════════════════════════════════════════════════
