//! Die temperature + battery voltage.
//!
//! Temperature comes from the SoftDevice (it owns the TEMP peripheral)
//! as an I30F2 value; its raw bits, 0.25 °C counts, go on air unchanged.
//! Battery voltage is VDD measured on the SAADC's internal VDD input.

use embassy_nrf::interrupt::{self, InterruptExt};
use embassy_nrf::peripherals::SAADC;
use embassy_nrf::saadc::{self, ChannelConfig, Resolution, Saadc, VddInput};
use embassy_nrf::{bind_interrupts, Peripheral};
use nrf_softdevice::Softdevice;
use sensor_beacon::sensor::{adc_to_millivolts, saturate_temperature};
use sensor_beacon::{SensorReading, TelemetrySampler};

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
});

/// Input range for gain 1/6 with the internal 0.6 V reference (mV).
const VDD_FULL_SCALE_MV: u32 = 3600;

const ADC_RESOLUTION_BITS: u8 = 12;

pub struct NrfSampler<'d> {
    sd: &'static Softdevice,
    saadc: Saadc<'d, 1>,
}

impl<'d> NrfSampler<'d> {
    /// Configure the SAADC for VDD and run its offset calibration.
    pub async fn new(sd: &'static Softdevice, adc: impl Peripheral<P = SAADC> + 'd) -> Self {
        // SoftDevice reserves priorities 0, 1 and 4.
        interrupt::SAADC.set_priority(interrupt::Priority::P3);

        let mut config = saadc::Config::default();
        config.resolution = Resolution::_12BIT;
        let channel = ChannelConfig::single_ended(VddInput);
        let saadc = Saadc::new(adc, Irqs, config, [channel]);
        saadc.calibrate().await;

        Self { sd, saadc }
    }
}

impl TelemetrySampler for NrfSampler<'_> {
    fn sample(&mut self) -> SensorReading {
        let temperature = match nrf_softdevice::temperature_celsius(self.sd) {
            Ok(t) => saturate_temperature(t.to_bits()),
            Err(_) => defmt::panic!("die temperature read failed"),
        };

        // One conversion, a few tens of microseconds.
        let mut buf = [0i16; 1];
        embassy_futures::block_on(self.saadc.sample(&mut buf));

        SensorReading {
            temperature,
            battery_mv: adc_to_millivolts(buf[0], VDD_FULL_SCALE_MV, ADC_RESOLUTION_BITS),
        }
    }
}
