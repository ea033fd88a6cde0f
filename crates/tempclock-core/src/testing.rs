//! Scripted bus used by the unit tests.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::bus::BusTransport;
use crate::error::{BusError, details};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Transfer {
    Write(u8, Vec<u8>),
    Read(u8, usize),
}

/// Records every transfer and answers reads from a queue.
///
/// A read with nothing queued fails as if the device did not acknowledge.
#[derive(Default)]
pub(crate) struct FakeBus {
    pub(crate) opens: usize,
    pub(crate) closes: usize,
    pub(crate) fail_open: bool,
    pub(crate) fail_writes: bool,
    pub(crate) transfers: Vec<Transfer>,
    pub(crate) dividers: Vec<u16>,
    reads: VecDeque<Vec<u8>>,
}

impl FakeBus {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn queue_read(&mut self, bytes: Vec<u8>) {
        self.reads.push_back(bytes);
    }

    pub(crate) fn writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.transfers
            .iter()
            .filter_map(|t| match t {
                Transfer::Write(address, bytes) => Some((*address, bytes.clone())),
                Transfer::Read(..) => None,
            })
            .collect()
    }
}

impl BusTransport for FakeBus {
    fn open(&mut self) -> Result<(), BusError> {
        self.opens += 1;
        if self.fail_open {
            return Err(BusError::Init {
                details: details("permission denied"),
            });
        }
        Ok(())
    }

    fn write(&mut self, address: u8, clock_divider: u16, bytes: &[u8]) -> Result<(), BusError> {
        self.transfers.push(Transfer::Write(address, bytes.to_vec()));
        self.dividers.push(clock_divider);
        if self.fail_writes {
            return Err(BusError::Transaction {
                address,
                operation: "write",
                details: details("nack"),
            });
        }
        Ok(())
    }

    fn read(
        &mut self,
        address: u8,
        clock_divider: u16,
        count: usize,
    ) -> Result<Vec<u8>, BusError> {
        self.transfers.push(Transfer::Read(address, count));
        self.dividers.push(clock_divider);
        self.reads.pop_front().ok_or(BusError::Transaction {
            address,
            operation: "read",
            details: details("nack"),
        })
    }

    fn close(&mut self) {
        self.closes += 1;
    }
}
