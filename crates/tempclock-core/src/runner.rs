//! Blocking driver for [`Monitor`] on a hosted target.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::info;

use crate::bus::BusTransport;
use crate::config::MonitorConfig;
use crate::monitor::{Monitor, Snapshot};
use crate::sink::ReportSink;

/// Source of wall-clock seconds.
pub trait TimeSource {
    fn now_secs(&self) -> u64;
}

/// Seconds since the Unix epoch from the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

pub struct Runner<B, S, T = SystemClock> {
    monitor: Monitor<B>,
    sink: S,
    time: T,
    poll_interval: Duration,
}

impl<B: BusTransport, S: ReportSink> Runner<B, S, SystemClock> {
    pub fn new(bus: B, sink: S, config: &MonitorConfig) -> Self {
        Self::with_time_source(bus, sink, config, SystemClock)
    }
}

impl<B: BusTransport, S: ReportSink, T: TimeSource> Runner<B, S, T> {
    pub fn with_time_source(bus: B, sink: S, config: &MonitorConfig, time: T) -> Self {
        let now = time.now_secs();
        Self {
            monitor: Monitor::new(bus, config, now),
            sink,
            time,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }

    pub fn monitor(&self) -> &Monitor<B> {
        &self.monitor
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn start(&mut self) {
        let now = self.time.now_secs();
        self.monitor.start(now);
    }

    /// One poll without sleeping.
    pub fn tick(&mut self) -> Option<Snapshot> {
        let now = self.time.now_secs();
        self.monitor.poll(now, &mut self.sink)
    }

    /// Reset the clock, then poll and sleep forever.
    pub fn run(mut self) -> ! {
        self.start();
        info!("Polling every {} ms", self.poll_interval.as_millis());
        loop {
            self.tick();
            std::thread::sleep(self.poll_interval);
        }
    }
}
