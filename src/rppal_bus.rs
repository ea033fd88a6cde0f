//! Bus transport over the Linux I2C character device
//!
//! Opening `/dev/i2c-N` usually needs root or membership of the `i2c` group,
//! which is the failure reported as [`BusError::Init`].

use log::{debug, error, warn};
use rppal::i2c::I2c;

use tempclock_core::bus::{BusTransport, check_transfer_len};
use tempclock_core::error::{BusError, details};

/// Default I2C bus on a Raspberry Pi header (GPIO 2/3).
pub const DEFAULT_I2C_BUS: u8 = 1;

/// Core clock the divider is applied to.
pub const CORE_CLOCK_HZ: u32 = 250_000_000;

/// Bus speed a clock divider asks for.
pub const fn requested_speed_hz(clock_divider: u16) -> u32 {
    if clock_divider == 0 {
        return CORE_CLOCK_HZ;
    }
    CORE_CLOCK_HZ / clock_divider as u32
}

pub struct RppalBus {
    bus: u8,
    i2c: Option<I2c>,
    speed_checked: bool,
}

impl RppalBus {
    pub fn new(bus: u8) -> Self {
        Self {
            bus,
            i2c: None,
            speed_checked: false,
        }
    }

    pub fn bus_number(&self) -> u8 {
        self.bus
    }

    /// The kernel driver owns the bus speed; compare it once with what the
    /// divider asks for.
    fn check_speed(&mut self, clock_divider: u16) {
        if self.speed_checked {
            return;
        }
        let Some(i2c) = self.i2c.as_ref() else {
            return;
        };
        self.speed_checked = true;

        let requested = requested_speed_hz(clock_divider);
        match i2c.clock_speed() {
            Ok(actual) if actual == requested => {
                debug!("I2C bus {} running at {} Hz", self.bus, actual)
            }
            Ok(actual) => warn!(
                "I2C bus {} runs at {} Hz, divider {} asks for {} Hz",
                self.bus, actual, clock_divider, requested
            ),
            Err(e) => debug!("I2C bus {} speed unknown: {}", self.bus, e),
        }
    }

    fn select(
        &mut self,
        address: u8,
        clock_divider: u16,
        operation: &'static str,
    ) -> Result<&mut I2c, BusError> {
        self.check_speed(clock_divider);
        let i2c = self.i2c.as_mut().ok_or(BusError::NotOpen)?;
        i2c.set_slave_address(u16::from(address)).map_err(|e| {
            error!("Failed to address {:#04x}: {}", address, e);
            BusError::Transaction {
                address,
                operation,
                details: details(&e),
            }
        })?;
        Ok(i2c)
    }
}

impl BusTransport for RppalBus {
    fn open(&mut self) -> Result<(), BusError> {
        if self.i2c.is_some() {
            return Ok(());
        }
        let i2c = I2c::with_bus(self.bus).map_err(|e| BusError::Init {
            details: details(format_args!("/dev/i2c-{}: {}", self.bus, e)),
        })?;
        debug!("Opened I2C bus {}", self.bus);
        self.i2c = Some(i2c);
        Ok(())
    }

    fn write(&mut self, address: u8, clock_divider: u16, bytes: &[u8]) -> Result<(), BusError> {
        check_transfer_len(bytes.len())?;
        let i2c = self.select(address, clock_divider, "write")?;

        let written = i2c.write(bytes).map_err(|e| BusError::Transaction {
            address,
            operation: "write",
            details: details(&e),
        })?;
        if written != bytes.len() {
            return Err(BusError::Transaction {
                address,
                operation: "write",
                details: details(format_args!("{} of {} bytes sent", written, bytes.len())),
            });
        }
        Ok(())
    }

    fn read(
        &mut self,
        address: u8,
        clock_divider: u16,
        count: usize,
    ) -> Result<Vec<u8>, BusError> {
        check_transfer_len(count)?;
        if count == 0 {
            return Ok(Vec::new());
        }
        let i2c = self.select(address, clock_divider, "read")?;

        let mut buffer = vec![0u8; count];
        let read = i2c.read(&mut buffer).map_err(|e| BusError::Transaction {
            address,
            operation: "read",
            details: details(&e),
        })?;
        buffer.truncate(read);
        Ok(buffer)
    }

    fn close(&mut self) {
        if self.i2c.take().is_some() {
            debug!("Closed I2C bus {}", self.bus);
        }
    }
}
