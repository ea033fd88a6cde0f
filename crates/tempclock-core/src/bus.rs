//! Bus transport boundary
//!
//! The drivers talk to their devices through [`BusTransport`]: addressed reads
//! and writes of a few bytes at a given clock divider, plus an explicit
//! open/close lifecycle. [`HalBus`] adapts any `embedded-hal` I2C bus, and
//! [`SessionBus`] decides how long a session stays open.

extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use embedded_hal::i2c::{Error as _, I2c};
use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::error::{BusError, details};

/// Largest number of bytes moved in a single transfer.
pub const MAX_TRANSFER_LEN: usize = 32;

/// Addressed, clocked request/response channel to the peripherals.
pub trait BusTransport {
    /// Acquire the bus. Must succeed before any transfer.
    fn open(&mut self) -> Result<(), BusError>;

    /// Write `bytes` to the device at `address`.
    fn write(&mut self, address: u8, clock_divider: u16, bytes: &[u8]) -> Result<(), BusError>;

    /// Read `count` bytes from the device at `address`.
    fn read(&mut self, address: u8, clock_divider: u16, count: usize)
    -> Result<Vec<u8>, BusError>;

    /// Release the bus.
    fn close(&mut self);
}

impl<B: BusTransport + ?Sized> BusTransport for &mut B {
    fn open(&mut self) -> Result<(), BusError> {
        (**self).open()
    }

    fn write(&mut self, address: u8, clock_divider: u16, bytes: &[u8]) -> Result<(), BusError> {
        (**self).write(address, clock_divider, bytes)
    }

    fn read(
        &mut self,
        address: u8,
        clock_divider: u16,
        count: usize,
    ) -> Result<Vec<u8>, BusError> {
        (**self).read(address, clock_divider, count)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Reject transfers larger than [`MAX_TRANSFER_LEN`].
pub fn check_transfer_len(requested: usize) -> Result<(), BusError> {
    if requested > MAX_TRANSFER_LEN {
        return Err(BusError::TransferTooLong {
            requested,
            limit: MAX_TRANSFER_LEN,
        });
    }
    Ok(())
}

/// How long a bus session is held.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionPolicy {
    /// Open and close the bus around every single transfer.
    PerTransaction,
    /// Open on the first transfer and keep the session until shutdown.
    #[default]
    Persistent,
}

/// Applies a [`SessionPolicy`] on top of another transport.
///
/// A failed open is retried on the next transfer, so running without access
/// to the bus logs the same error every iteration instead of stopping the
/// loop.
pub struct SessionBus<B> {
    inner: B,
    policy: SessionPolicy,
    open: bool,
}

impl<B: BusTransport> SessionBus<B> {
    pub fn new(inner: B, policy: SessionPolicy) -> Self {
        Self {
            inner,
            policy,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn into_inner(mut self) -> B {
        self.close();
        self.inner
    }

    fn ensure_open(&mut self) -> Result<(), BusError> {
        if !self.open {
            self.inner.open()?;
            self.open = true;
        }
        Ok(())
    }

    fn finish(&mut self) {
        if self.policy == SessionPolicy::PerTransaction {
            self.close();
        }
    }
}

impl<B: BusTransport> BusTransport for SessionBus<B> {
    fn open(&mut self) -> Result<(), BusError> {
        self.ensure_open()
    }

    fn write(&mut self, address: u8, clock_divider: u16, bytes: &[u8]) -> Result<(), BusError> {
        self.ensure_open()
            .inspect_err(|e| error!("Bus open failed: {}", e))?;
        let result = self.inner.write(address, clock_divider, bytes);
        self.finish();
        result
    }

    fn read(
        &mut self,
        address: u8,
        clock_divider: u16,
        count: usize,
    ) -> Result<Vec<u8>, BusError> {
        self.ensure_open()
            .inspect_err(|e| error!("Bus open failed: {}", e))?;
        let result = self.inner.read(address, clock_divider, count);
        self.finish();
        result
    }

    fn close(&mut self) {
        if self.open {
            self.inner.close();
            self.open = false;
        }
    }
}

/// [`BusTransport`] over any `embedded-hal` I2C bus.
///
/// The underlying bus is already configured when handed over, so the clock
/// divider is only recorded in the transfer log.
pub struct HalBus<I> {
    i2c: I,
    open: bool,
}

impl<I: I2c> HalBus<I> {
    pub const fn new(i2c: I) -> Self {
        Self { i2c, open: false }
    }

    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> BusTransport for HalBus<I> {
    fn open(&mut self) -> Result<(), BusError> {
        self.open = true;
        Ok(())
    }

    fn write(&mut self, address: u8, clock_divider: u16, bytes: &[u8]) -> Result<(), BusError> {
        if !self.open {
            return Err(BusError::NotOpen);
        }
        check_transfer_len(bytes.len())?;
        debug!("i2c write {:#04x} (div {}): {:02x?}", address, clock_divider, bytes);

        self.i2c.write(address, bytes).map_err(|e| {
            error!("I2C write to {:#04x} failed: {:?}", address, e.kind());
            BusError::Transaction {
                address,
                operation: "write",
                details: details(format_args!("{:?}", e.kind())),
            }
        })
    }

    fn read(
        &mut self,
        address: u8,
        clock_divider: u16,
        count: usize,
    ) -> Result<Vec<u8>, BusError> {
        if !self.open {
            return Err(BusError::NotOpen);
        }
        check_transfer_len(count)?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut buffer = vec![0u8; count];
        self.i2c.read(address, &mut buffer).map_err(|e| {
            error!("I2C read from {:#04x} failed: {:?}", address, e.kind());
            BusError::Transaction {
                address,
                operation: "read",
                details: details(format_args!("{:?}", e.kind())),
            }
        })?;
        debug!("i2c read {:#04x} (div {}): {:02x?}", address, clock_divider, buffer);

        Ok(buffer)
    }

    fn close(&mut self) {
        self.open = false;
    }
}
