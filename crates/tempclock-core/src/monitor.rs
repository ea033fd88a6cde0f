//! One iteration of the monitoring loop
//!
//! [`Monitor`] owns the bus, both drivers and the [`Recorder`]. The caller
//! supplies the wall-clock second for each step and decides how long to sleep
//! between steps.
//!
//! Bus failures never stop the loop. A failed temperature read reuses the last
//! good value and a failed clock read reuses the newest retained timestamp, so
//! a trigger still produces a report on schedule.

extern crate alloc;
use alloc::string::String;

use log::{error, info, warn};

use crate::bus::BusTransport;
use crate::clock::{RtcClock, Timestamp};
use crate::config::MonitorConfig;
use crate::report;
use crate::sensor::{Reading, TemperatureSensor};
use crate::sink::ReportSink;
use crate::trigger::TriggerCause;
use crate::window::Recorder;

/// What a triggered step captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub cause: TriggerCause,
    pub reading: Reading,
    pub timestamp: Timestamp,
    /// Window slot the timestamp was written to.
    pub slot: usize,
    pub record_number: u64,
    pub report: String,
}

pub struct Monitor<B> {
    bus: B,
    clock: RtcClock,
    sensor: TemperatureSensor,
    recorder: Recorder,
    last_temperature: i8,
}

impl<B: BusTransport> Monitor<B> {
    pub fn new(bus: B, config: &MonitorConfig, now: u64) -> Self {
        Self {
            bus,
            clock: RtcClock::new(config.rtc),
            sensor: TemperatureSensor::new(config.sensor),
            recorder: Recorder::new(config.trigger, now),
            last_temperature: 0,
        }
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn into_bus(self) -> B {
        self.bus
    }

    /// Open the bus, reset the RTC to its baseline and restart the trigger
    /// timer at `now`.
    ///
    /// Neither a failed open nor a failed reset stops the loop.
    pub fn start(&mut self, now: u64) {
        info!("Running ...");
        if let Err(e) = self.bus.open() {
            error!("Starting with the bus closed: {}", e);
        }
        match self.clock.reset(&mut self.bus) {
            Ok(()) => info!("RTC reset to {:?}", Timestamp::BASELINE),
            Err(e) => warn!("Continuing without RTC reset: {}", e),
        }
        self.recorder.mark_triggered(now);
    }

    fn sample(&mut self, now: u64) -> Reading {
        match self.sensor.sample(&mut self.bus, now) {
            Ok(reading) => {
                self.last_temperature = reading.temperature;
                reading
            }
            Err(e) => {
                warn!(
                    "Using last temperature {}°C after failed read: {}",
                    self.last_temperature, e
                );
                Reading {
                    temperature: self.last_temperature,
                    sampled_at: now,
                }
            }
        }
    }

    fn timestamp(&mut self) -> Timestamp {
        self.clock.read_now(&mut self.bus).unwrap_or_else(|e| {
            warn!("Reusing the newest timestamp after failed RTC read: {}", e);
            self.recorder
                .window()
                .latest()
                .copied()
                .unwrap_or_default()
        })
    }

    /// Run one iteration at wall-clock second `now`.
    ///
    /// Returns the captured snapshot if a trigger fired.
    pub fn poll<S: ReportSink>(&mut self, now: u64, sink: &mut S) -> Option<Snapshot> {
        let reading = self.sample(now);
        let cause = self.recorder.evaluate(now, reading.temperature)?;

        let timestamp = self.timestamp();
        let slot = self.recorder.accept(timestamp);
        let window = self.recorder.window();
        let record_number = window.total_count();
        let text = report::render(record_number, window.entries(), reading.temperature);

        info!("Record {} ({:?}) stored in slot {}", record_number, cause, slot);
        if let Err(e) = sink.publish(&text) {
            error!("Failed to publish report: {}", e);
        }

        self.recorder.mark_triggered(now);

        Some(Snapshot {
            cause,
            reading,
            timestamp,
            slot,
            record_number,
            report: text,
        })
    }

    /// Release the bus.
    pub fn shutdown(&mut self) {
        self.bus.close();
        info!("... done!");
    }
}
