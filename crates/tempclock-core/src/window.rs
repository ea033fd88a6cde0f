//! Sliding record window
//!
//! Keeps the three most recently accepted timestamps, oldest first, and a
//! count of every record ever accepted. Once the window is full each new
//! record shifts the retained entries down by one slot and takes the last
//! slot, so the window is always `[t(n-2), t(n-1), t(n)]`.

use heapless::Vec;

use crate::clock::Timestamp;
use crate::trigger::{TriggerCause, TriggerPolicy, TriggerState};

/// Number of retained records.
pub const WINDOW_CAPACITY: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordWindow {
    slots: Vec<Timestamp, WINDOW_CAPACITY>,
    total_count: u64,
}

impl RecordWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record and return the slot it landed in.
    pub fn accept(&mut self, timestamp: Timestamp) -> usize {
        let slot = if self.total_count < WINDOW_CAPACITY as u64 {
            let slot = self.total_count as usize;
            let pushed = self.slots.push(timestamp);
            debug_assert!(pushed.is_ok(), "record window overflowed while filling");
            slot
        } else {
            let last = WINDOW_CAPACITY - 1;
            self.slots[0] = self.slots[1];
            self.slots[1] = self.slots[2];
            self.slots[last] = timestamp;
            last
        };

        self.total_count += 1;
        slot
    }

    /// Retained records, oldest first.
    pub fn entries(&self) -> &[Timestamp] {
        &self.slots
    }

    pub fn latest(&self) -> Option<&Timestamp> {
        self.slots.last()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.is_full()
    }

    /// Records accepted since start-up, including evicted ones.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }
}

/// All state carried from one loop iteration to the next.
#[derive(Debug, Clone)]
pub struct Recorder {
    policy: TriggerPolicy,
    state: TriggerState,
    window: RecordWindow,
}

impl Recorder {
    pub fn new(policy: TriggerPolicy, now: u64) -> Self {
        Self {
            policy,
            state: TriggerState::new(now),
            window: RecordWindow::new(),
        }
    }

    pub fn policy(&self) -> &TriggerPolicy {
        &self.policy
    }

    pub fn window(&self) -> &RecordWindow {
        &self.window
    }

    pub fn last_trigger(&self) -> u64 {
        self.state.last_trigger()
    }

    pub fn evaluate(&self, now: u64, temperature: i8) -> Option<TriggerCause> {
        self.policy
            .evaluate(now, i32::from(temperature), self.state.last_trigger())
    }

    pub fn should_trigger(&self, now: u64, temperature: i8) -> bool {
        self.evaluate(now, temperature).is_some()
    }

    pub fn accept(&mut self, timestamp: Timestamp) -> usize {
        self.window.accept(timestamp)
    }

    pub fn mark_triggered(&mut self, now: u64) {
        self.state.mark(now);
    }
}
