//! Raspberry Pi host for tempclock
//!
//! Wires the hardware-independent `tempclock-core` loop to the Linux I2C
//! device and loads the host settings.

pub mod rppal_bus;
pub mod settings;

pub use rppal_bus::RppalBus;
pub use settings::Settings;
