//! Log region geometry
//!
//! A fixed run of equally sized slots starting at a base address.

use serde::{Deserialize, Serialize};

use crate::error::{NvlogError, Result};

use super::FRAMING_OVERHEAD;

/// Geometry of the log region inside the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogRegion {
    /// First address of slot 0
    pub base: u32,

    /// Bytes per slot (payload + terminator + checksum + padding)
    pub entry_size: usize,

    /// Number of slots
    pub max_entries: usize,
}

impl Default for LogRegion {
    fn default() -> Self {
        Self {
            base: 0,
            entry_size: 64,
            max_entries: 32,
        }
    }
}

impl LogRegion {
    pub fn new(base: u32, entry_size: usize, max_entries: usize) -> Self {
        Self {
            base,
            entry_size,
            max_entries,
        }
    }

    /// Check the geometry on its own and against a store of `capacity` bytes
    pub fn validate(&self, capacity: u32) -> Result<()> {
        if self.entry_size <= FRAMING_OVERHEAD {
            return Err(NvlogError::Config(format!(
                "entry_size {} leaves no room for payload (framing takes {} bytes)",
                self.entry_size, FRAMING_OVERHEAD
            )));
        }
        if self.max_entries == 0 {
            return Err(NvlogError::Config(
                "max_entries must be at least 1".to_string(),
            ));
        }

        let len = self.entry_size.checked_mul(self.max_entries).ok_or_else(|| {
            NvlogError::Config(format!(
                "log region of {} x {} bytes overflows",
                self.max_entries, self.entry_size
            ))
        })?;

        let end = u64::from(self.base) + len as u64;
        if end > u64::from(capacity) {
            return Err(NvlogError::Config(format!(
                "log region [{}, {}) exceeds store capacity {}",
                self.base, end, capacity
            )));
        }

        Ok(())
    }

    /// Total bytes covered by the region
    pub fn len(&self) -> usize {
        self.entry_size * self.max_entries
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One past the last slot address; a cursor here means "region full"
    pub fn end(&self) -> u32 {
        self.base + self.len() as u32
    }

    /// Address of slot `index`
    pub fn slot_address(&self, index: usize) -> u32 {
        self.base + (index * self.entry_size) as u32
    }

    /// Iterate over every slot address in ascending order
    pub fn slot_addresses(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.max_entries).map(move |i| self.slot_address(i))
    }

    /// Largest payload a slot can hold
    pub fn max_payload(&self) -> usize {
        self.entry_size - FRAMING_OVERHEAD
    }

    /// Whether `[address, address + len)` overlaps the region
    pub fn overlaps(&self, address: u32, len: usize) -> bool {
        let start = u64::from(address);
        let end = start + len as u64;
        start < u64::from(self.end()) && end > u64::from(self.base)
    }
}
