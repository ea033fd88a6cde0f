//! Monitor configuration
//!
//! Every field has a default matching the reference hardware, so an empty
//! configuration document reproduces the fixed behaviour.

use serde::{Deserialize, Serialize};

use crate::trigger::TriggerPolicy;

/// Bus address of the real-time clock (decimal 104).
pub const RTC_ADDRESS: u8 = 0x68;
/// Bus address of the temperature sensor (decimal 77).
pub const SENSOR_ADDRESS: u8 = 0x4D;
/// Clock divider for both devices. 250 MHz / 2500 = 100 kHz.
pub const CLOCK_DIVIDER: u16 = 2500;
/// Delay between two loop iterations.
pub const POLL_INTERVAL_MS: u64 = 1000;

/// Where a device lives on the bus and how fast to talk to it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    pub address: u8,
    #[serde(default = "default_clock_divider")]
    pub clock_divider: u16,
}

impl DeviceConfig {
    pub const fn rtc() -> Self {
        Self {
            address: RTC_ADDRESS,
            clock_divider: CLOCK_DIVIDER,
        }
    }

    pub const fn sensor() -> Self {
        Self {
            address: SENSOR_ADDRESS,
            clock_divider: CLOCK_DIVIDER,
        }
    }
}

fn default_clock_divider() -> u16 {
    CLOCK_DIVIDER
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct MonitorConfig {
    pub rtc: DeviceConfig,
    pub sensor: DeviceConfig,
    pub trigger: TriggerPolicy,
    pub poll_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            rtc: DeviceConfig::rtc(),
            sensor: DeviceConfig::sensor(),
            trigger: TriggerPolicy::default(),
            poll_interval_ms: POLL_INTERVAL_MS,
        }
    }
}
