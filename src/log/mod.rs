//! Persistent Log Module
//!
//! Append-only event log in a fixed region of the store.
//!
//! ## Responsibilities
//! - Frame text records with a terminator and checksum
//! - Recover the write cursor from stored bytes after restart
//! - Roll the region over (erase + restart) when it fills up
//! - Dump the contiguous run of valid entries
//!
//! ## Slot Format
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Slot 0 (entry_size bytes)                                │
//! │ ┌───────────┬──────────┬─────────┬─────────┬──────────┐  │
//! │ │ Payload   │ 0x00 (1) │ CRC hi  │ CRC lo  │ zero pad │  │
//! │ └───────────┴──────────┴─────────┴─────────┴──────────┘  │
//! ├──────────────────────────────────────────────────────────┤
//! │ Slot 1 ...                                               │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! A slot whose first byte is zero is empty. Valid entries form a prefix of
//! the region; the first empty or corrupt slot ends the log even if
//! well-formed slots follow it.

mod entry;
mod manager;
mod region;
mod scan;
mod shared;

pub use entry::{CorruptReason, Entry, SlotContents};
pub use manager::LogManager;
pub use region::LogRegion;
pub use scan::{Entries, LogRecord, RecoveryReport, ScanStop};
pub use shared::SharedLog;

/// Terminator (1) + checksum (2)
pub const FRAMING_OVERHEAD: usize = 3;
