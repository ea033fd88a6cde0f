//! Desktop simulator for the tempclock monitoring loop.
//!
//! Runs the same core loop as the Raspberry Pi binary against simulated
//! devices on an in-memory I2C bus:
//!
//! | Address | Device                                              |
//! |---------|-----------------------------------------------------|
//! | 0x68    | DS1307-style RTC with BCD registers                 |
//! | 0x4D    | Temperature sensor drifting around the 30 °C limit  |
//!
//! Reports go to the console and to the file named by `TEMPCLOCK_LOG`
//! (default `log.txt`). Stop with Ctrl-C.

mod devices;

use log::info;

use tempclock_core::config::{RTC_ADDRESS, SENSOR_ADDRESS};
use tempclock_core::runner::Runner;
use tempclock_core::sink::{ConsoleSink, LOG_FILE_NAME, LogFileSink};
use tempclock_core::{HalBus, MonitorConfig, SessionBus, SessionPolicy};

use devices::SimulatedBus;

/// Environment variable overriding the log file path.
const LOG_ENV: &str = "TEMPCLOCK_LOG";

fn main() {
    env_logger::init();
    info!("Starting tempclock simulator");
    info!("RTC at {:#04x}, sensor at {:#04x}", RTC_ADDRESS, SENSOR_ADDRESS);

    let log_path = std::env::var(LOG_ENV).unwrap_or_else(|_| LOG_FILE_NAME.to_owned());
    info!("Writing reports to {}", log_path);

    let config = MonitorConfig::default();
    let bus = SessionBus::new(HalBus::new(SimulatedBus::new()), SessionPolicy::Persistent);
    let sink = (LogFileSink::new(log_path), ConsoleSink::stdout());

    Runner::new(bus, sink, &config).run()
}
