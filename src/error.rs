//! Error types for nvlog
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using NvlogError
pub type Result<T> = std::result::Result<T, NvlogError>;

/// Which kind of store transaction failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusOperation {
    Read,
    Write,
}

impl std::fmt::Display for BusOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BusOperation::Read => f.write_str("read"),
            BusOperation::Write => f.write_str("write"),
        }
    }
}

/// Unified error type for nvlog operations
#[derive(Debug, Error)]
pub enum NvlogError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Bus {operation} failed at address {address}: {reason}")]
    Bus {
        operation: BusOperation,
        address: u32,
        reason: String,
    },

    #[error("Access out of range: address {address}, len {len}, capacity {capacity}")]
    OutOfRange { address: u32, len: usize, capacity: u32 },

    // -------------------------------------------------------------------------
    // Log Errors
    // -------------------------------------------------------------------------
    #[error("Entry too long: {len} bytes (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("Entry payload is empty")]
    EmptyEntry,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Console Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl NvlogError {
    /// Whether retrying the same store operation may succeed.
    ///
    /// Only bus transaction failures qualify; range and configuration
    /// errors fail the same way every time.
    pub fn is_transient(&self) -> bool {
        matches!(self, NvlogError::Bus { .. })
    }
}
