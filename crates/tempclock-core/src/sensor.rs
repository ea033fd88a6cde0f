//! Temperature sensor driver
//!
//! The sensor has no register map: any read returns one byte holding the
//! temperature in whole degrees Celsius.

use crate::bus::BusTransport;
use crate::config::DeviceConfig;
use crate::error::BusError;

/// One temperature sample and the wall-clock second it was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    /// Whole degrees Celsius.
    pub temperature: i8,
    /// Seconds since the Unix epoch.
    pub sampled_at: u64,
}

/// Driver for a temperature sensor that answers every read with a single
/// signed byte of whole degrees.
#[derive(Debug, Clone, Copy)]
pub struct TemperatureSensor {
    device: DeviceConfig,
}

impl TemperatureSensor {
    pub const fn new(device: DeviceConfig) -> Self {
        Self { device }
    }

    pub fn read_temperature<B: BusTransport>(&self, bus: &mut B) -> Result<i8, BusError> {
        let DeviceConfig {
            address,
            clock_divider,
        } = self.device;

        let bytes = bus.read(address, clock_divider, 1)?;

        match bytes.first() {
            Some(&raw) => Ok(raw as i8),
            None => Err(BusError::ShortRead {
                address,
                expected: 1,
                actual: 0,
            }),
        }
    }

    pub fn sample<B: BusTransport>(&self, bus: &mut B, now: u64) -> Result<Reading, BusError> {
        Ok(Reading {
            temperature: self.read_temperature(bus)?,
            sampled_at: now,
        })
    }
}
