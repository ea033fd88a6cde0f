//! Hardware-independent core of tempclock
//!
//! This crate holds everything that does not depend on a particular board:
//! the bus transport boundary, the RTC and temperature sensor drivers, the
//! trigger policy, the sliding record window and the report renderer.
//!
//! It is `#![no_std]` with `extern crate alloc` by default. The `std` feature
//! adds the log file and console sinks and a blocking [`runner`] used by the
//! Raspberry Pi binary and the desktop simulator.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

extern crate alloc;

pub mod bus;
pub mod clock;
pub mod config;
pub mod error;
pub mod monitor;
pub mod report;
#[cfg(feature = "std")]
pub mod runner;
pub mod sensor;
pub mod sink;
pub mod trigger;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

pub use bus::{BusTransport, HalBus, SessionBus, SessionPolicy};
pub use clock::{RtcClock, Timestamp};
pub use config::{DeviceConfig, MonitorConfig};
pub use error::{BusError, SinkError};
pub use monitor::{Monitor, Snapshot};
pub use sensor::{Reading, TemperatureSensor};
pub use sink::ReportSink;
pub use trigger::{TriggerCause, TriggerPolicy};
pub use window::{RecordWindow, Recorder};
