//! Power management - lowest-power resting state between events.
//!
//! nRF52840 power modes:
//! - System ON, constant latency: fastest wake-up, highest idle current
//! - System ON, low power: peripherals gated between events
//! - System OFF: deepest sleep, wake by reset only
//!
//! The beacon must keep its RTC timer and GPIOTE sense alive, so System
//! ON low-power is the deepest usable mode.  The SoftDevice owns the
//! POWER peripheral; requests go through its API.  The embassy executor
//! sleeps in WFE whenever no task is ready.

use defmt::{info, warn};
use nrf_softdevice::{raw, RawError, Softdevice};

/// The DC/DC regulator needs the external inductor (fitted on the DK).
const DCDC_ENABLED: bool = true;

/// Request low-power System ON as the default resting state.
///
/// Takes the SoftDevice to make sure it is enabled before calling into it.
pub fn enter_low_power(_sd: &Softdevice) {
    if DCDC_ENABLED {
        let ret = unsafe {
            raw::sd_power_dcdc_mode_set(raw::NRF_POWER_DCDC_MODES_NRF_POWER_DCDC_ENABLE as u8)
        };
        if let Err(e) = RawError::convert(ret) {
            warn!("Power: DC/DC enable failed: {:?}", e);
        }
    }

    let ret = unsafe { raw::sd_power_mode_set(raw::NRF_POWER_MODES_NRF_POWER_MODE_LOWPWR as u8) };
    match RawError::convert(ret) {
        Ok(()) => info!("Power: low-power mode requested"),
        Err(e) => warn!("Power: low-power mode request failed: {:?}", e),
    }
}
