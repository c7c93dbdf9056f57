//! Region scanner
//!
//! Walks the region slot by slot from the base address. Shared by cursor
//! recovery and by dumping, so both always agree on where the log ends.

use crate::error::Result;
use crate::store::PersistentStore;

use super::entry::{Entry, SlotContents};
use super::LogRegion;

/// Why a scan stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStop {
    /// Reached a slot whose first byte is zero
    Empty,

    /// Reached a slot that failed framing or checksum checks
    Corrupt,

    /// Every slot held a valid entry
    RegionEnd,
}

/// A valid entry and the slot it was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub address: u32,
    pub entry: Entry,
}

/// Result of a cursor recovery scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryReport {
    /// Next slot to write (region end if full)
    pub cursor: u32,

    /// Number of valid entries before the stop
    pub valid_entries: usize,

    /// What ended the scan
    pub stop: ScanStop,
}

/// Lazy iterator over the valid prefix of the log
///
/// Yields each valid entry in slot order and ends at the first empty or
/// corrupt slot. A store error is yielded once, then the iterator ends.
/// Not restartable: create a new one to rescan from the base.
pub struct Entries<'a, S: ?Sized> {
    store: &'a mut S,
    region: LogRegion,
    address: u32,
    valid: usize,
    stop: Option<ScanStop>,
    failed: bool,
}

impl<'a, S: PersistentStore + ?Sized> Entries<'a, S> {
    pub(crate) fn new(store: &'a mut S, region: LogRegion) -> Self {
        Self {
            store,
            region,
            address: region.base,
            valid: 0,
            stop: None,
            failed: false,
        }
    }

    /// Address of the slot the scan is currently at
    ///
    /// Once the scan has stopped, this is the recovered cursor.
    pub fn position(&self) -> u32 {
        self.address
    }

    /// Why the scan stopped, or `None` while it is still running
    pub fn stop(&self) -> Option<ScanStop> {
        self.stop
    }

    /// Valid entries yielded so far
    pub fn valid_count(&self) -> usize {
        self.valid
    }

    /// Drive the scan to its end and summarize it
    pub(crate) fn finish(mut self) -> Result<RecoveryReport> {
        for record in self.by_ref() {
            record?;
        }

        Ok(RecoveryReport {
            cursor: self.address,
            valid_entries: self.valid,
            stop: self.stop.unwrap_or(ScanStop::RegionEnd),
        })
    }
}

impl<'a, S: PersistentStore + ?Sized> Iterator for Entries<'a, S> {
    type Item = Result<LogRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stop.is_some() || self.failed {
            return None;
        }

        if self.address >= self.region.end() {
            self.stop = Some(ScanStop::RegionEnd);
            return None;
        }

        let slot = match self.store.read(self.address, self.region.entry_size) {
            Ok(slot) => slot,
            Err(e) => {
                self.failed = true;
                return Some(Err(e));
            }
        };

        match Entry::deserialize(&slot) {
            SlotContents::Empty => {
                tracing::trace!("Empty slot at {}", self.address);
                self.stop = Some(ScanStop::Empty);
                None
            }
            SlotContents::Corrupt(reason) => {
                tracing::warn!(
                    "Corrupt slot at {} ({}); treating as end of log",
                    self.address,
                    reason
                );
                self.stop = Some(ScanStop::Corrupt);
                None
            }
            SlotContents::Valid(entry) => {
                let record = LogRecord {
                    address: self.address,
                    entry,
                };
                self.address += self.region.entry_size as u32;
                self.valid += 1;
                Some(Ok(record))
            }
        }
    }
}
