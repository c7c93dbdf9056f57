//! Flag slots in the store
//!
//! Reads and writes a `RedundantFlag` at two fixed addresses, independent of
//! the log region.

use crate::error::{NvlogError, Result};
use crate::store::PersistentStore;

use super::codec::{encode, RedundantFlag};

/// Two store addresses holding a value and its complement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSlot {
    value_address: u32,
    complement_address: u32,
}

/// Result of reading a flag slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedFlag {
    /// Raw value byte as stored (meaningless when `valid` is false)
    pub value: u8,

    /// Whether the stored complement matched
    pub valid: bool,
}

impl FlagSlot {
    /// Value at `address`, complement one byte below it
    pub fn new(address: u32) -> Result<Self> {
        let complement_address = address.checked_sub(1).ok_or_else(|| {
            NvlogError::Config("flag slot needs an address of at least 1".to_string())
        })?;

        Ok(Self {
            value_address: address,
            complement_address,
        })
    }

    /// Slot occupying the last two bytes of a store of `capacity` bytes
    pub fn top_of(capacity: u32) -> Result<Self> {
        if capacity < 2 {
            return Err(NvlogError::Config(format!(
                "store of {} bytes cannot hold a flag slot",
                capacity
            )));
        }
        Self::new(capacity - 1)
    }

    pub fn value_address(&self) -> u32 {
        self.value_address
    }

    pub fn complement_address(&self) -> u32 {
        self.complement_address
    }
}

/// Persist `value` and its complement (value first, then complement)
pub fn save_flag<S: PersistentStore + ?Sized>(
    store: &mut S,
    slot: FlagSlot,
    value: u8,
) -> Result<()> {
    let flag = encode(value);
    store.write(slot.value_address, &[flag.value])?;
    store.write(slot.complement_address, &[flag.complement])?;

    tracing::debug!(
        "Flag saved at {}: value=0x{:02X} complement=0x{:02X}",
        slot.value_address,
        flag.value,
        flag.complement
    );
    Ok(())
}

/// Read back a flag and report whether it validates
pub fn load_flag<S: PersistentStore + ?Sized>(store: &mut S, slot: FlagSlot) -> Result<LoadedFlag> {
    let value = read_byte(store, slot.value_address)?;
    let complement = read_byte(store, slot.complement_address)?;
    let flag = RedundantFlag::from_parts(value, complement);

    let loaded = LoadedFlag {
        value,
        valid: flag.is_valid(),
    };
    if !loaded.valid {
        tracing::warn!(
            "Flag at {} failed validation: value=0x{:02X} complement=0x{:02X}",
            slot.value_address,
            value,
            complement
        );
    }
    Ok(loaded)
}

fn read_byte<S: PersistentStore + ?Sized>(store: &mut S, address: u32) -> Result<u8> {
    let bytes = store.read(address, 1)?;
    bytes.first().copied().ok_or(NvlogError::OutOfRange {
        address,
        len: 1,
        capacity: store.capacity(),
    })
}
