//! In-memory store for testing.

use std::thread;
use std::time::Duration;

use crate::error::{BusOperation, NvlogError, Result};

use super::{check_range, PersistentStore};

/// An in-memory store.
///
/// Suitable for unit and integration tests of the log without hardware.
/// Besides plain reads and writes it can:
/// - flip single bits to simulate corruption
/// - fail the next N reads or writes with a bus error
/// - count operations so tests can assert on bus traffic
///
/// # Example
///
/// ```rust
/// use nvlog::store::{InMemoryStore, PersistentStore};
///
/// let mut store = InMemoryStore::new(256);
/// store.write(10, b"hi").unwrap();
/// assert_eq!(store.read(10, 2).unwrap(), b"hi");
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    data: Vec<u8>,
    settle: Duration,
    failing_reads: u32,
    failing_writes: u32,
    reads: u64,
    writes: u64,
}

impl InMemoryStore {
    /// A zero-filled store of `capacity` bytes
    pub fn new(capacity: u32) -> Self {
        Self::filled(capacity, 0x00)
    }

    /// A store with every byte set to `fill` (`0xFF` mimics a factory-fresh EEPROM)
    pub fn filled(capacity: u32, fill: u8) -> Self {
        Self::with_data(vec![fill; capacity as usize])
    }

    /// A store preloaded with `data`; capacity is `data.len()`
    ///
    /// Useful for testing recovery scenarios.
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Sleep for `settle` after every successful write
    pub fn with_settle_delay(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Raw contents
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw contents, bypassing fault injection and counters
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Invert bit `bit` (0 = LSB) of the byte at `address`
    pub fn flip_bit(&mut self, address: u32, bit: u8) {
        self.data[address as usize] ^= 1 << (bit % 8);
    }

    /// Make the next `count` reads fail with a bus error
    pub fn fail_next_reads(&mut self, count: u32) {
        self.failing_reads = count;
    }

    /// Make the next `count` writes fail with a bus error (nothing is stored)
    pub fn fail_next_writes(&mut self, count: u32) {
        self.failing_writes = count;
    }

    /// Number of read calls, including failed ones
    pub fn read_count(&self) -> u64 {
        self.reads
    }

    /// Number of write calls, including failed ones
    pub fn write_count(&self) -> u64 {
        self.writes
    }
}

impl PersistentStore for InMemoryStore {
    fn capacity(&self) -> u32 {
        self.data.len() as u32
    }

    fn read(&mut self, address: u32, len: usize) -> Result<Vec<u8>> {
        self.reads += 1;
        check_range(address, len, self.capacity())?;

        if self.failing_reads > 0 {
            self.failing_reads -= 1;
            return Err(NvlogError::Bus {
                operation: BusOperation::Read,
                address,
                reason: "injected read fault".to_string(),
            });
        }

        let start = address as usize;
        Ok(self.data[start..start + len].to_vec())
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        self.writes += 1;
        check_range(address, data.len(), self.capacity())?;

        if self.failing_writes > 0 {
            self.failing_writes -= 1;
            return Err(NvlogError::Bus {
                operation: BusOperation::Write,
                address,
                reason: "injected write fault".to_string(),
            });
        }

        let start = address as usize;
        self.data[start..start + data.len()].copy_from_slice(data);

        if !self.settle.is_zero() {
            thread::sleep(self.settle);
        }
        Ok(())
    }
}
