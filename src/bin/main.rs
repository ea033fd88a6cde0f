use anyhow::Context;
use log::info;

use tempclock::{RppalBus, Settings};
use tempclock_core::SessionBus;
use tempclock_core::runner::Runner;
use tempclock_core::sink::{ConsoleSink, LogFileSink};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load().context("loading settings")?;
    info!(
        "RTC at {:#04x}, sensor at {:#04x} on /dev/i2c-{} ({:?} session)",
        settings.monitor.rtc.address,
        settings.monitor.sensor.address,
        settings.i2c_bus,
        settings.session
    );
    info!("Writing reports to {}", settings.log_path.display());

    let bus = SessionBus::new(RppalBus::new(settings.i2c_bus), settings.session);
    let sink = (LogFileSink::new(&settings.log_path), ConsoleSink::stdout());

    Runner::new(bus, sink, &settings.monitor).run()
}
