//! I2C EEPROM store
//!
//! Driver for 24xx-series serial EEPROMs with 16-bit memory addressing.
//!
//! ## Bus Framing
//! ```text
//! write:  S | dev+W | addr_hi | addr_lo | data ... | P     then settle delay
//! read:   S | dev+W | addr_hi | addr_lo | Sr | dev+R | data ... | P
//! ```
//!
//! The device wraps writes that run past the end of a page back to the
//! page start, so writes are split on page boundaries here.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{Error as _, I2c};

use crate::config::Config;
use crate::error::{BusOperation, NvlogError, Result};

use super::{check_range, PersistentStore};

/// Largest capacity reachable with a 2-byte memory address
const MAX_CAPACITY: u32 = 1 << 16;

/// An EEPROM on an I2C bus
pub struct I2cEeprom<I2C, D> {
    i2c: I2C,
    delay: D,
    device_address: u8,
    capacity: u32,
    page_size: usize,
    settle_ms: u32,
}

impl<I2C, D> I2cEeprom<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a driver for the device at `device_address`
    ///
    /// Defaults to 64-byte pages and a 20 ms write cycle.
    pub fn new(i2c: I2C, delay: D, device_address: u8, capacity: u32) -> Result<Self> {
        if capacity == 0 || capacity > MAX_CAPACITY {
            return Err(NvlogError::Config(format!(
                "EEPROM capacity {} not addressable with 16-bit addresses",
                capacity
            )));
        }

        Ok(Self {
            i2c,
            delay,
            device_address,
            capacity,
            page_size: 64,
            settle_ms: 20,
        })
    }

    /// Create a driver using the store settings of `config`
    pub fn from_config(i2c: I2C, delay: D, config: &Config) -> Result<Self> {
        let settle_ms = u32::try_from(config.settle_delay_ms).map_err(|_| {
            NvlogError::Config(format!("settle delay {} ms too large", config.settle_delay_ms))
        })?;

        Ok(Self::new(i2c, delay, config.bus_address, config.store_capacity)?
            .with_page_size(config.page_size)
            .with_settle_delay_ms(settle_ms))
    }

    /// Set the write page size (a zero size is treated as 1)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set the write cycle time waited after every page write
    pub fn with_settle_delay_ms(mut self, ms: u32) -> Self {
        self.settle_ms = ms;
        self
    }

    /// Get the 7-bit device address
    pub fn device_address(&self) -> u8 {
        self.device_address
    }

    /// Give back the bus and delay provider
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn bus_error(operation: BusOperation, address: u32, err: I2C::Error) -> NvlogError {
        NvlogError::Bus {
            operation,
            address,
            reason: format!("{:?}", err.kind()),
        }
    }
}

impl<I2C, D> PersistentStore for I2cEeprom<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    fn capacity(&self) -> u32 {
        self.capacity
    }

    fn read(&mut self, address: u32, len: usize) -> Result<Vec<u8>> {
        check_range(address, len, self.capacity)?;

        let mut buf = vec![0u8; len];
        if len == 0 {
            return Ok(buf);
        }

        let pointer = (address as u16).to_be_bytes();
        self.i2c
            .write_read(self.device_address, &pointer, &mut buf)
            .map_err(|e| Self::bus_error(BusOperation::Read, address, e))?;
        Ok(buf)
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        check_range(address, data.len(), self.capacity)?;

        let mut offset = 0;
        while offset < data.len() {
            let chunk_address = address + offset as u32;
            let room = self.page_size - (chunk_address as usize % self.page_size);
            let chunk_len = room.min(data.len() - offset);

            let mut frame = Vec::with_capacity(2 + chunk_len);
            frame.extend_from_slice(&(chunk_address as u16).to_be_bytes());
            frame.extend_from_slice(&data[offset..offset + chunk_len]);

            self.i2c
                .write(self.device_address, &frame)
                .map_err(|e| Self::bus_error(BusOperation::Write, chunk_address, e))?;
            self.delay.delay_ms(self.settle_ms);

            offset += chunk_len;
        }
        Ok(())
    }
}
