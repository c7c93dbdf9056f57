//! Log Manager
//!
//! Owns the write cursor and the logical contents of the log region.
//!
//! ## Cursor Lifecycle
//! - `None` on construction (nothing known about the region yet)
//! - Set by `recover()`, which runs lazily on the first append
//! - Advanced by one slot after each successful append
//! - Cleared by `erase_all()`; the next append recovers it again

use crate::config::{Config, OversizePolicy};
use crate::error::Result;
use crate::store::PersistentStore;

use super::entry::Entry;
use super::scan::{Entries, RecoveryReport};
use super::LogRegion;

/// The persistent log over a store
pub struct LogManager<S> {
    /// Backing store (single point of mutation for the bytes)
    store: S,

    /// Region geometry
    region: LogRegion,

    /// Handling of oversize appends
    oversize_policy: OversizePolicy,

    /// Next slot to write, `None` until recovered
    cursor: Option<u32>,
}

impl<S: PersistentStore> LogManager<S> {
    /// Create a manager over `region` of `store`
    ///
    /// Does not touch the store; the cursor is recovered on first use.
    pub fn new(store: S, region: LogRegion) -> Result<Self> {
        region.validate(store.capacity())?;

        Ok(Self {
            store,
            region,
            oversize_policy: OversizePolicy::default(),
            cursor: None,
        })
    }

    /// Create a manager using the region and oversize policy of `config`
    pub fn from_config(store: S, config: &Config) -> Result<Self> {
        Ok(Self::new(store, config.region)?.with_oversize_policy(config.oversize_policy))
    }

    /// Set the oversize policy
    pub fn with_oversize_policy(mut self, policy: OversizePolicy) -> Self {
        self.oversize_policy = policy;
        self
    }

    /// Rebuild the cursor by scanning the region from its base
    ///
    /// Stops at the first empty or corrupt slot. Running it again over
    /// unchanged contents yields the same cursor.
    pub fn recover(&mut self) -> Result<RecoveryReport> {
        let report = Entries::new(&mut self.store, self.region).finish()?;
        self.cursor = Some(report.cursor);

        tracing::info!(
            "Log recovery: {} valid entries, cursor={}, stopped on {:?}",
            report.valid_entries,
            report.cursor,
            report.stop
        );
        Ok(report)
    }

    /// Append a text record and return the slot address it was written to
    ///
    /// Steps:
    /// 1. Fit the text into a slot (truncate or reject per policy)
    /// 2. Recover the cursor if it is unknown
    /// 3. If the region is full, erase it and start over from the base
    /// 4. Write the framed slot and advance the cursor
    pub fn append(&mut self, text: &str) -> Result<u32> {
        let entry = Entry::from_text(text, self.region.max_payload(), self.oversize_policy)?;
        self.append_entry(&entry)
    }

    /// Append an already-built entry
    pub fn append_entry(&mut self, entry: &Entry) -> Result<u32> {
        let mut cursor = match self.cursor {
            Some(cursor) => cursor,
            None => self.recover()?.cursor,
        };

        if cursor >= self.region.end() {
            tracing::info!(
                "Log region full ({} entries); erasing to log new messages",
                self.region.max_entries
            );
            self.erase_all()?;
            cursor = self.recover()?.cursor;
        }

        let record = entry.serialize(self.region.entry_size)?;
        self.store.write(cursor, &record)?;
        self.cursor = Some(cursor + self.region.entry_size as u32);

        tracing::debug!(
            "Log entry written at address {} ({} bytes payload)",
            cursor,
            entry.payload().len()
        );
        Ok(cursor)
    }

    /// Lazily iterate the valid entries from the base
    pub fn entries(&mut self) -> Entries<'_, S> {
        Entries::new(&mut self.store, self.region)
    }

    /// Collect the text of every valid entry
    pub fn dump_all(&mut self) -> Result<Vec<String>> {
        self.entries()
            .map(|record| record.map(|r| r.entry.text()))
            .collect()
    }

    /// Zero every slot, one slot-sized write each, in ascending order
    ///
    /// The cursor is cleared first so that a failure part-way through
    /// forces a rescan before the next append.
    pub fn erase_all(&mut self) -> Result<()> {
        self.cursor = None;

        let region = self.region;
        let zeros = vec![0u8; region.entry_size];
        for address in region.slot_addresses() {
            self.store.write(address, &zeros)?;
        }

        tracing::info!(
            "Log erased: {} slots from address {}",
            region.max_entries,
            region.base
        );
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the cursor, `None` if not yet recovered
    pub fn cursor(&self) -> Option<u32> {
        self.cursor
    }

    /// Whether the known cursor sits at the region end
    pub fn is_full(&self) -> bool {
        self.cursor.is_some_and(|c| c >= self.region.end())
    }

    pub fn region(&self) -> LogRegion {
        self.region
    }

    pub fn oversize_policy(&self) -> OversizePolicy {
        self.oversize_policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direct store access for data kept outside the region (flags)
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
