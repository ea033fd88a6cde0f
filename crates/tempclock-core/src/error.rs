//! Error types shared by the bus, the device drivers and the report sinks.
//!
//! Payloads are `&'static str` or bounded `heapless::String`s so errors never
//! allocate and stay cheap to log from the polling loop.

use core::fmt::{Display, Write};

use thiserror_no_std::Error;

/// Capacity of free-form error details.
pub const DETAILS_CAPACITY: usize = 64;

/// Bounded error details string.
pub type Details = heapless::String<DETAILS_CAPACITY>;

/// Failures at the bus transport boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    /// The bus could not be opened (missing privilege or hardware).
    #[error("bus initialisation failed: {details}. Are you running as root?")]
    Init { details: Details },
    /// A transfer was attempted while no session was open.
    #[error("bus is not open")]
    NotOpen,
    /// A read or write with the device did not complete.
    #[error("{operation} with device {address:#04x} failed: {details}")]
    Transaction {
        address: u8,
        operation: &'static str,
        details: Details,
    },
    /// The device returned fewer bytes than requested.
    #[error("short read from device {address:#04x}: expected {expected} bytes, got {actual}")]
    ShortRead {
        address: u8,
        expected: usize,
        actual: usize,
    },
    /// A single transfer exceeded the transport's buffer limit.
    #[error("transfer of {requested} bytes exceeds the {limit} byte limit")]
    TransferTooLong { requested: usize, limit: usize },
}

/// Failures while publishing a rendered report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("{sink} sink write failed: {details}")]
    Write { sink: &'static str, details: Details },
}

/// Render any displayable value into bounded error details.
///
/// Text beyond [`DETAILS_CAPACITY`] bytes is dropped.
pub fn details(value: impl Display) -> Details {
    let mut out = Details::new();
    let mut truncating = Truncating(&mut out);
    let _ = write!(truncating, "{value}");
    out
}

struct Truncating<'a>(&'a mut Details);

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                return Err(core::fmt::Error);
            }
        }
        Ok(())
    }
}
