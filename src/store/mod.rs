//! Persistent Store Module
//!
//! Byte-addressable non-volatile storage behind a narrow interface.
//!
//! ## Responsibilities
//! - Read and write arbitrary byte ranges by address
//! - Block for the device settle delay after each write
//! - Report every failure as a typed error (no fire-and-forget writes)
//!
//! Stores are opaque: they know nothing about log entries or flags.
//!
//! ## Implementations
//! - [`InMemoryStore`] - test double with fault injection
//! - [`FileStore`] - fixed-size device image on the host filesystem
//! - [`I2cEeprom`] - 24xx-style EEPROM over an `embedded-hal` I2C bus
//! - [`RetryingStore`] - bounded retry wrapper around any of the above

mod eeprom;
mod file;
mod memory;
mod retry;

use crate::error::{NvlogError, Result};

pub use eeprom::I2cEeprom;
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use retry::RetryingStore;

/// A byte-addressable device with a fixed address space
pub trait PersistentStore {
    /// Addressable bytes; valid addresses are `0..capacity()`
    fn capacity(&self) -> u32;

    /// Read `len` bytes starting at `address`
    fn read(&mut self, address: u32, len: usize) -> Result<Vec<u8>>;

    /// Write `data` starting at `address`, returning once the device has
    /// settled and can accept the next operation
    fn write(&mut self, address: u32, data: &[u8]) -> Result<()>;
}

impl<S: PersistentStore + ?Sized> PersistentStore for &mut S {
    fn capacity(&self) -> u32 {
        (**self).capacity()
    }

    fn read(&mut self, address: u32, len: usize) -> Result<Vec<u8>> {
        (**self).read(address, len)
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        (**self).write(address, data)
    }
}

impl<S: PersistentStore + ?Sized> PersistentStore for Box<S> {
    fn capacity(&self) -> u32 {
        (**self).capacity()
    }

    fn read(&mut self, address: u32, len: usize) -> Result<Vec<u8>> {
        (**self).read(address, len)
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        (**self).write(address, data)
    }
}

/// Reject accesses that fall outside `0..capacity`
pub(crate) fn check_range(address: u32, len: usize, capacity: u32) -> Result<()> {
    let end = u64::from(address) + len as u64;
    if end > u64::from(capacity) {
        return Err(NvlogError::OutOfRange {
            address,
            len,
            capacity,
        });
    }
    Ok(())
}
