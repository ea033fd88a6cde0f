//! Real-time-clock driver
//!
//! The RTC exposes its calendar as seven consecutive registers starting at
//! register 0: seconds, minutes, hours, weekday, date, month, year. Values are
//! kept exactly as the device returns them; any decoding for display happens
//! in [`crate::report`].

use serde::{Deserialize, Serialize};

use crate::bus::BusTransport;
use crate::config::DeviceConfig;
use crate::error::BusError;

/// Number of timekeeping registers.
pub const TIMESTAMP_LEN: usize = 7;

/// First timekeeping register.
const TIME_REGISTER: u8 = 0x00;

/// Calendar moment as read from the RTC, one raw byte per field.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Timestamp {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    /// Day of week index, 0 = Sunday.
    pub weekday: u8,
    /// Day of month.
    pub date: u8,
    pub month: u8,
    /// Two-digit year.
    pub year: u8,
}

impl Timestamp {
    /// Baseline written by [`RtcClock::reset`]: midnight, weekday 1, 1/1/1.
    pub const BASELINE: Self = Self {
        seconds: 0,
        minutes: 0,
        hours: 0,
        weekday: 1,
        date: 1,
        month: 1,
        year: 1,
    };

    /// Decode the seven timekeeping registers in wire order.
    pub const fn from_registers(registers: &[u8; TIMESTAMP_LEN]) -> Self {
        Self {
            seconds: registers[0],
            minutes: registers[1],
            hours: registers[2],
            weekday: registers[3],
            date: registers[4],
            month: registers[5],
            year: registers[6],
        }
    }

    /// Encode into the seven timekeeping registers in wire order.
    pub const fn to_registers(&self) -> [u8; TIMESTAMP_LEN] {
        [
            self.seconds,
            self.minutes,
            self.hours,
            self.weekday,
            self.date,
            self.month,
            self.year,
        ]
    }
}

/// Driver for the RTC at a fixed bus address.
#[derive(Debug, Clone, Copy)]
pub struct RtcClock {
    device: DeviceConfig,
}

impl RtcClock {
    pub const fn new(device: DeviceConfig) -> Self {
        Self { device }
    }

    /// Set the clock to [`Timestamp::BASELINE`].
    ///
    /// One write: the register pointer followed by all seven fields.
    pub fn reset<B: BusTransport>(&self, bus: &mut B) -> Result<(), BusError> {
        let mut frame = [0u8; TIMESTAMP_LEN + 1];
        frame[0] = TIME_REGISTER;
        frame[1..].copy_from_slice(&Timestamp::BASELINE.to_registers());

        bus.write(self.device.address, self.device.clock_divider, &frame)
    }

    /// Read the current time.
    ///
    /// Selects register 0 with a one byte write, then reads all seven
    /// timekeeping registers.
    pub fn read_now<B: BusTransport>(&self, bus: &mut B) -> Result<Timestamp, BusError> {
        let DeviceConfig {
            address,
            clock_divider,
        } = self.device;

        bus.write(address, clock_divider, &[TIME_REGISTER])?;
        let bytes = bus.read(address, clock_divider, TIMESTAMP_LEN)?;

        let Ok(registers) = <[u8; TIMESTAMP_LEN]>::try_from(bytes.as_slice()) else {
            return Err(BusError::ShortRead {
                address,
                expected: TIMESTAMP_LEN,
                actual: bytes.len(),
            });
        };

        Ok(Timestamp::from_registers(&registers))
    }
}
