//! Simulated peripherals behind an `embedded-hal` I2C bus.

use std::time::Instant;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use log::{debug, warn};

use tempclock_core::config::{RTC_ADDRESS, SENSOR_ADDRESS};

// ---------------------------------------------------------------------------
// Calendar arithmetic
// ---------------------------------------------------------------------------

/// Number of timekeeping registers at the start of the RTC register file.
const TIME_REGISTERS: usize = 7;

/// Size of the RTC register file (timekeeping, control and battery RAM).
const RTC_REGISTERS: usize = 64;

const SECS_PER_DAY: u64 = 86_400;

fn to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

fn from_bcd(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

fn days_in_month(month: u8, year: u8) -> u8 {
    match month {
        2 if year % 4 == 0 => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Calendar time in plain binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CalendarTime {
    seconds: u8,
    minutes: u8,
    hours: u8,
    weekday: u8,
    date: u8,
    month: u8,
    year: u8,
}

impl CalendarTime {
    fn from_bcd(registers: &[u8; TIME_REGISTERS]) -> Self {
        Self {
            seconds: from_bcd(registers[0] & 0x7F),
            minutes: from_bcd(registers[1] & 0x7F),
            hours: from_bcd(registers[2] & 0x3F),
            weekday: registers[3] % 7,
            date: from_bcd(registers[4] & 0x3F).max(1),
            month: from_bcd(registers[5] & 0x1F).clamp(1, 12),
            year: from_bcd(registers[6]) % 100,
        }
    }

    fn to_bcd(self) -> [u8; TIME_REGISTERS] {
        [
            to_bcd(self.seconds),
            to_bcd(self.minutes),
            to_bcd(self.hours),
            self.weekday,
            to_bcd(self.date),
            to_bcd(self.month),
            to_bcd(self.year),
        ]
    }

    fn advanced(self, secs: u64) -> Self {
        let time_of_day =
            u64::from(self.seconds) + 60 * u64::from(self.minutes) + 3600 * u64::from(self.hours);
        let total = time_of_day + secs;

        let mut next = Self {
            seconds: (total % 60) as u8,
            minutes: (total / 60 % 60) as u8,
            hours: (total / 3600 % 24) as u8,
            ..self
        };

        for _ in 0..total / SECS_PER_DAY {
            next.weekday = (next.weekday + 1) % 7;
            next.date += 1;
            if next.date > days_in_month(next.month, next.year) {
                next.date = 1;
                next.month += 1;
                if next.month > 12 {
                    next.month = 1;
                    next.year = (next.year + 1) % 100;
                }
            }
        }
        next
    }
}

// ---------------------------------------------------------------------------
// Devices
// ---------------------------------------------------------------------------

/// DS1307-style clock: auto-incrementing register pointer, BCD time that
/// keeps running from the moment it was last set.
struct SimulatedRtc {
    registers: [u8; RTC_REGISTERS],
    pointer: usize,
    base: CalendarTime,
    set_at: Instant,
}

impl SimulatedRtc {
    fn new() -> Self {
        Self {
            registers: [0; RTC_REGISTERS],
            pointer: 0,
            base: CalendarTime::from_bcd(&[0, 0, 0, 1, 1, 1, 1]),
            set_at: Instant::now(),
        }
    }

    fn now(&self) -> CalendarTime {
        self.base.advanced(self.set_at.elapsed().as_secs())
    }

    fn sync_time_registers(&mut self) {
        let bcd = self.now().to_bcd();
        self.registers[..TIME_REGISTERS].copy_from_slice(&bcd);
    }

    fn write(&mut self, bytes: &[u8]) {
        let Some((&pointer, data)) = bytes.split_first() else {
            return;
        };
        self.pointer = pointer as usize % RTC_REGISTERS;
        if data.is_empty() {
            return;
        }

        self.sync_time_registers();
        let mut touched_time = false;
        for &b in data {
            self.registers[self.pointer] = b;
            touched_time |= self.pointer < TIME_REGISTERS;
            self.pointer = (self.pointer + 1) % RTC_REGISTERS;
        }

        if touched_time {
            let mut time = [0u8; TIME_REGISTERS];
            time.copy_from_slice(&self.registers[..TIME_REGISTERS]);
            self.base = CalendarTime::from_bcd(&time);
            self.set_at = Instant::now();
            debug!("Simulated RTC set to {:?}", self.base);
        }
    }

    fn read(&mut self, buffer: &mut [u8]) {
        self.sync_time_registers();
        for b in buffer.iter_mut() {
            *b = self.registers[self.pointer];
            self.pointer = (self.pointer + 1) % RTC_REGISTERS;
        }
    }
}

/// Temperature that swings between roughly 24 and 32 °C.
struct SimulatedSensor {
    started: Instant,
}

impl SimulatedSensor {
    fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    fn temperature(&self) -> i8 {
        let t = self.started.elapsed().as_secs_f64();
        let celsius = 28.0 + 4.0 * (t / 20.0).sin() + 0.5 * (t / 7.0).cos();
        celsius.round() as i8
    }
}

/// In-memory bus hosting the RTC and the temperature sensor.
pub struct SimulatedBus {
    rtc: SimulatedRtc,
    sensor: SimulatedSensor,
}

impl SimulatedBus {
    pub fn new() -> Self {
        Self {
            rtc: SimulatedRtc::new(),
            sensor: SimulatedSensor::new(),
        }
    }
}

impl ErrorType for SimulatedBus {
    type Error = ErrorKind;
}

impl I2c for SimulatedBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for op in operations {
            match (address, op) {
                (RTC_ADDRESS, Operation::Write(bytes)) => self.rtc.write(bytes),
                (RTC_ADDRESS, Operation::Read(buffer)) => self.rtc.read(buffer),
                (SENSOR_ADDRESS, Operation::Read(buffer)) => {
                    buffer.fill(self.sensor.temperature() as u8)
                }
                (SENSOR_ADDRESS, Operation::Write(_)) => {}
                _ => {
                    warn!("No simulated device at {:#04x}", address);
                    return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bcd_conversion() {
        assert_eq!(to_bcd(59), 0x59);
        assert_eq!(from_bcd(0x59), 59);
        assert_eq!(from_bcd(to_bcd(7)), 7);
    }

    #[test]
    fn test_advance_rolls_over_month_and_year() {
        let time = CalendarTime {
            seconds: 59,
            minutes: 59,
            hours: 23,
            weekday: 6,
            date: 31,
            month: 12,
            year: 99,
        };
        let next = time.advanced(1);
        assert_eq!(
            next,
            CalendarTime {
                seconds: 0,
                minutes: 0,
                hours: 0,
                weekday: 0,
                date: 1,
                month: 1,
                year: 0,
            }
        );
    }

    #[test]
    fn test_leap_february() {
        let time = CalendarTime {
            seconds: 0,
            minutes: 0,
            hours: 12,
            weekday: 3,
            date: 28,
            month: 2,
            year: 24,
        };
        assert_eq!(time.advanced(SECS_PER_DAY).date, 29);
        assert_eq!(time.advanced(2 * SECS_PER_DAY).month, 3);
    }

    #[test]
    fn test_rtc_set_then_read_back() {
        let mut bus = SimulatedBus::new();
        bus.write(RTC_ADDRESS, &[0, 0x30, 0x15, 0x13, 2, 0x09, 0x06, 0x24])
            .unwrap();

        let mut registers = [0u8; 7];
        bus.write(RTC_ADDRESS, &[0]).unwrap();
        bus.read(RTC_ADDRESS, &mut registers).unwrap();

        // Seconds may have ticked over while the test ran.
        assert!(from_bcd(registers[0]) >= 30);
        assert_eq!(&registers[1..], &[0x15, 0x13, 2, 0x09, 0x06, 0x24]);
    }

    #[test]
    fn test_unknown_address_nacks() {
        let mut bus = SimulatedBus::new();
        let mut buf = [0u8; 1];
        assert_eq!(
            bus.read(0x50, &mut buf),
            Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))
        );
    }

    #[test]
    fn test_sensor_stays_in_range() {
        let mut bus = SimulatedBus::new();
        let mut buf = [0u8; 1];
        bus.read(SENSOR_ADDRESS, &mut buf).unwrap();
        let t = buf[0] as i8;
        assert!((20..=35).contains(&t));
    }
}
