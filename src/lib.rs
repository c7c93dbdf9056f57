//! # nvlog
//!
//! A persistent event log for small non-volatile stores (I2C EEPROMs) with:
//! - Fixed-size slots framed with a terminator and a 16-bit checksum
//! - Cursor recovery from stored bytes alone after a restart
//! - Erase-and-restart rollover when the region fills up
//! - Self-validating status flags stored next to their complement
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │            Console / CLI / boot sequence (Engine)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ LogManager  │          │  FlagSlot   │
//!   │ (checksum)  │          │ (value/!v)  │
//!   └──────┬──────┘          └──────┬──────┘
//!          │                        │
//!          └───────────┬────────────┘
//!                      ▼
//!             ┌─────────────────┐
//!             │ PersistentStore │
//!             │ (I2C / file /   │
//!             │   in-memory)    │
//!             └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod checksum;
pub mod flag;
pub mod store;
pub mod log;
pub mod console;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{NvlogError, Result};
pub use config::Config;
pub use engine::Engine;
pub use log::LogManager;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of nvlog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
