//! Redundant Flag Module
//!
//! Persists a single status byte next to its bitwise complement so that an
//! erased or never-written location (all `0x00` or all `0xFF`) reads back as
//! invalid instead of being trusted.
//!
//! ## Layout
//! ```text
//!   address - 1        address
//! ┌──────────────┬──────────────┐
//! │  !value (1)  │   value (1)  │
//! └──────────────┴──────────────┘
//! ```

mod codec;
mod slot;

pub use codec::{encode, validate, RedundantFlag};
pub use slot::{load_flag, save_flag, FlagSlot, LoadedFlag};
