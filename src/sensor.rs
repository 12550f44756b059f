//! Telemetry sampling boundary.
//!
//! Values are forwarded raw: no averaging, filtering or calibration.
//! On the nRF52840 the temperature is the SoftDevice die sensor in
//! 0.25 °C counts and the battery is VDD in millivolts.

/// One sample of the on-board sensors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorReading {
    /// Temperature in raw sensor units.
    pub temperature: i16,
    /// Battery voltage (mV).
    pub battery_mv: u16,
}

/// Synchronous, non-blocking sensor read.
///
/// Runs inside the tick handler, so implementations must complete in
/// well under a millisecond. Failures are not expected in the normal
/// operating envelope; an implementation that sees one should panic.
pub trait TelemetrySampler {
    fn sample(&mut self) -> SensorReading;
}

/// Convert a raw SAADC count to millivolts.
///
/// `full_scale_mv` is the input range for the configured gain/reference
/// (3600 mV for gain 1/6 with the internal 0.6 V reference) and
/// `resolution_bits` the converter resolution. Negative counts (noise
/// around 0 V) read as 0.
pub fn adc_to_millivolts(raw: i16, full_scale_mv: u32, resolution_bits: u8) -> u16 {
    let raw = u32::from(raw.max(0).unsigned_abs());
    let mv = (raw * full_scale_mv) >> resolution_bits;
    u16::try_from(mv).unwrap_or(u16::MAX)
}

/// Narrow a raw temperature count to the 16-bit wire width, saturating.
pub fn saturate_temperature(raw: i32) -> i16 {
    raw.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adc_full_scale_12bit() {
        assert_eq!(adc_to_millivolts(4096, 3600, 12), 3600);
        assert_eq!(adc_to_millivolts(2048, 3600, 12), 1800);
        assert_eq!(adc_to_millivolts(0, 3600, 12), 0);
    }

    #[test]
    fn adc_typical_coin_cell() {
        // 3000 mV on a 12-bit, 3.6 V range reads ~3413 counts.
        assert_eq!(adc_to_millivolts(3413, 3600, 12), 2999);
    }

    #[test]
    fn adc_negative_noise_is_zero() {
        assert_eq!(adc_to_millivolts(-3, 3600, 12), 0);
    }

    #[test]
    fn temperature_saturates_to_i16() {
        assert_eq!(saturate_temperature(100), 100);
        assert_eq!(saturate_temperature(-160), -160);
        assert_eq!(saturate_temperature(40_000), i16::MAX);
        assert_eq!(saturate_temperature(-40_000), i16::MIN);
    }
}
