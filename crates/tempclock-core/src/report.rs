//! Text report for the log file and console
//!
//! ```text
//! 24°C
//! Record 1: 1/1/1 Mon 00:00:12 AM
//! Record 2: 1/1/1 Mon 00:00:23 AM
//! ```
//!
//! Seconds are printed as two hex digits, which shows BCD-encoded register
//! values as their decimal reading. All other fields are printed in decimal.

extern crate alloc;
use alloc::string::String;
use core::fmt::Write;

use crate::clock::Timestamp;
use crate::window::WINDOW_CAPACITY;

/// Weekday names indexed by `weekday % 7`, Sunday first.
pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Total over every byte value.
pub const fn weekday_name(weekday: u8) -> &'static str {
    WEEKDAY_NAMES[(weekday % 7) as usize]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    /// Classify the raw hours register. Only values strictly above 12 are PM,
    /// so 12 itself reads as AM.
    pub const fn from_hours(hours: u8) -> Self {
        if hours > 12 { Self::Pm } else { Self::Am }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Am => "AM",
            Self::Pm => "PM",
        }
    }
}

/// Append one `Record <n>: ...` line.
pub fn write_record(out: &mut String, record: usize, time: &Timestamp) {
    let _ = writeln!(
        out,
        "Record {}: {}/{}/{} {} {:02}:{:02}:{:02x} {}",
        record,
        time.date,
        time.month,
        time.year,
        weekday_name(time.weekday),
        time.hours,
        time.minutes,
        time.seconds,
        Meridiem::from_hours(time.hours).label(),
    );
}

/// Render the temperature line followed by one line per retained record.
///
/// At most `record_number` entries are shown, labelled from 1.
pub fn render(record_number: u64, entries: &[Timestamp], temperature: i8) -> String {
    let shown = entries
        .len()
        .min(WINDOW_CAPACITY)
        .min(usize::try_from(record_number).unwrap_or(usize::MAX));

    let mut out = String::new();
    let _ = writeln!(out, "{}°C", temperature);
    for (index, time) in entries.iter().take(shown).enumerate() {
        write_record(&mut out, index + 1, time);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hours: u8, minutes: u8, seconds: u8) -> Timestamp {
        Timestamp {
            hours,
            minutes,
            seconds,
            ..Timestamp::BASELINE
        }
    }

    #[test]
    fn test_single_record() {
        let text = render(1, &[at(0, 0, 0x12)], 24);
        assert_eq!(text, "24°C\nRecord 1: 1/1/1 Mon 00:00:12 AM\n");
    }

    #[test]
    fn test_three_records_labelled_in_order() {
        let entries = [at(1, 2, 3), at(4, 5, 6), at(7, 8, 9)];
        let text = render(7, &entries, -3);
        let lines: std::vec::Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "-3°C");
        assert_eq!(lines[1], "Record 1: 1/1/1 Mon 01:02:03 AM");
        assert_eq!(lines[2], "Record 2: 1/1/1 Mon 04:05:06 AM");
        assert_eq!(lines[3], "Record 3: 1/1/1 Mon 07:08:09 AM");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_record_number_limits_lines() {
        let entries = [at(1, 2, 3), at(4, 5, 6)];
        assert_eq!(render(1, &entries, 20).lines().count(), 2);
        assert_eq!(render(0, &entries, 20), "20°C\n");
    }

    #[test]
    fn test_seconds_are_hex_other_fields_decimal() {
        let time = Timestamp {
            seconds: 0x3b,
            minutes: 59,
            hours: 23,
            weekday: 6,
            date: 31,
            month: 12,
            year: 99,
        };
        let mut out = String::new();
        write_record(&mut out, 2, &time);
        assert_eq!(out, "Record 2: 31/12/99 Sat 23:59:3b PM\n");
    }

    #[test]
    fn test_meridiem_boundary() {
        assert_eq!(Meridiem::from_hours(13), Meridiem::Pm);
        assert_eq!(Meridiem::from_hours(12), Meridiem::Am);
        assert_eq!(Meridiem::from_hours(0), Meridiem::Am);
    }

    #[test]
    fn test_weekday_lookup_is_total() {
        for w in 0..=u8::MAX {
            assert_eq!(weekday_name(w), WEEKDAY_NAMES[(w % 7) as usize]);
        }
        assert_eq!(weekday_name(0), "Sun");
        assert_eq!(weekday_name(7), "Sun");
        assert_eq!(weekday_name(255), "Wed");
    }

    #[test]
    fn test_render_is_idempotent() {
        let entries = [at(13, 30, 0x45)];
        assert_eq!(render(1, &entries, 31), render(1, &entries, 31));
    }
}
