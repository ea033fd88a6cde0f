//! Trigger policy: decides when the loop captures a new record.

use serde::{Deserialize, Serialize};

/// Seconds after the last trigger before a new record is forced.
pub const TRIGGER_INTERVAL_SECS: u64 = 10;
/// Temperature in °C above which every poll triggers.
pub const TEMPERATURE_THRESHOLD: i32 = 30;

/// Which condition fired a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerCause {
    /// More than the interval elapsed since the last trigger.
    Elapsed { secs: u64 },
    /// The reading was above the temperature threshold.
    Temperature { celsius: i32 },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct TriggerPolicy {
    pub interval_secs: u64,
    pub temperature_threshold: i32,
}

impl Default for TriggerPolicy {
    fn default() -> Self {
        Self {
            interval_secs: TRIGGER_INTERVAL_SECS,
            temperature_threshold: TEMPERATURE_THRESHOLD,
        }
    }
}

impl TriggerPolicy {
    /// Both comparisons are strict. A wall clock that went backwards counts
    /// as no time elapsed.
    pub fn evaluate(&self, now: u64, temperature: i32, last_trigger: u64) -> Option<TriggerCause> {
        let elapsed = now.saturating_sub(last_trigger);
        if elapsed > self.interval_secs {
            Some(TriggerCause::Elapsed { secs: elapsed })
        } else if temperature > self.temperature_threshold {
            Some(TriggerCause::Temperature {
                celsius: temperature,
            })
        } else {
            None
        }
    }

    pub fn should_trigger(&self, now: u64, temperature: i32, last_trigger: u64) -> bool {
        self.evaluate(now, temperature, last_trigger).is_some()
    }
}

/// Time of the most recent trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerState {
    last_trigger: u64,
}

impl TriggerState {
    /// Start counting from `now`, normally process start.
    pub const fn new(now: u64) -> Self {
        Self { last_trigger: now }
    }

    pub const fn last_trigger(&self) -> u64 {
        self.last_trigger
    }

    pub fn mark(&mut self, now: u64) {
        self.last_trigger = now;
    }
}
