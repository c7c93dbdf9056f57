//! Configuration for nvlog
//!
//! Centralized configuration with defaults matching the reference board:
//! a 32 KB I2C EEPROM at bus address 0x50 with the log in its first 2 KB
//! and the status flag in its last two bytes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NvlogError, Result};
use crate::log::LogRegion;

/// Main configuration for an nvlog device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Store Configuration
    // -------------------------------------------------------------------------
    /// Addressable bytes in the store
    pub store_capacity: u32,

    /// Blocking pause after every write while the device commits it
    pub settle_delay_ms: u64,

    /// Device write page size; bus writes never cross a page boundary
    pub page_size: usize,

    /// 7-bit I2C address of the EEPROM
    pub bus_address: u8,

    /// Retry policy for transient bus failures
    pub retry: RetryPolicy,

    // -------------------------------------------------------------------------
    // Log Configuration
    // -------------------------------------------------------------------------
    /// Where the log lives and how it is sliced
    pub region: LogRegion,

    /// What to do with text longer than a slot can hold
    pub oversize_policy: OversizePolicy,

    /// Record appended on every boot
    pub boot_message: String,

    // -------------------------------------------------------------------------
    // Status Flag Configuration
    // -------------------------------------------------------------------------
    /// Address of the status byte; its complement sits one byte below
    pub status_flag_address: u32,

    /// Status written when the stored flag fails validation
    pub default_status: u8,
}

/// Bounded retry policy for store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts per operation, including the first
    pub max_attempts: u32,

    /// Pause between attempts (milliseconds)
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 5,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff_ms: 0,
        }
    }
}

/// Handling of text that does not fit in a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OversizePolicy {
    /// Silently drop the excess bytes
    #[default]
    Truncate,

    /// Fail with `TooLong`
    Reject,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_capacity: 32 * 1024, // 32 KB
            settle_delay_ms: 20,
            page_size: 64,
            bus_address: 0x50,
            retry: RetryPolicy::default(),
            region: LogRegion::default(),
            oversize_policy: OversizePolicy::Truncate,
            boot_message: "Boot".to_string(),
            status_flag_address: 32 * 1024 - 1,
            default_status: 0x02,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load a config from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)
            .map_err(|e| NvlogError::Serialization(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Render the config as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| NvlogError::Serialization(e.to_string()))
    }

    /// Check that the region, flag slot and store agree with each other
    pub fn validate(&self) -> Result<()> {
        self.region.validate(self.store_capacity)?;

        if self.page_size == 0 {
            return Err(NvlogError::Config("page_size must be non-zero".to_string()));
        }
        if self.retry.max_attempts == 0 {
            return Err(NvlogError::Config(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }

        // Flag occupies [address - 1, address]
        if self.status_flag_address == 0 || self.status_flag_address >= self.store_capacity {
            return Err(NvlogError::Config(format!(
                "status_flag_address {} must be in 1..{}",
                self.status_flag_address, self.store_capacity
            )));
        }
        if self.region.overlaps(self.status_flag_address - 1, 2) {
            return Err(NvlogError::Config(format!(
                "status flag at {} overlaps the log region",
                self.status_flag_address
            )));
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the store capacity (in bytes)
    pub fn store_capacity(mut self, bytes: u32) -> Self {
        self.config.store_capacity = bytes;
        self
    }

    /// Set the post-write settle delay (in milliseconds)
    pub fn settle_delay_ms(mut self, ms: u64) -> Self {
        self.config.settle_delay_ms = ms;
        self
    }

    /// Set the device write page size (in bytes)
    pub fn page_size(mut self, bytes: usize) -> Self {
        self.config.page_size = bytes;
        self
    }

    /// Set the I2C device address
    pub fn bus_address(mut self, address: u8) -> Self {
        self.config.bus_address = address;
        self
    }

    /// Set the retry policy
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    /// Set the log region geometry
    pub fn region(mut self, region: LogRegion) -> Self {
        self.config.region = region;
        self
    }

    /// Set the oversize policy
    pub fn oversize_policy(mut self, policy: OversizePolicy) -> Self {
        self.config.oversize_policy = policy;
        self
    }

    /// Set the boot record text
    pub fn boot_message(mut self, message: impl Into<String>) -> Self {
        self.config.boot_message = message.into();
        self
    }

    /// Set the status flag address
    pub fn status_flag_address(mut self, address: u32) -> Self {
        self.config.status_flag_address = address;
        self
    }

    /// Set the status written when the stored flag is invalid
    pub fn default_status(mut self, status: u8) -> Self {
        self.config.default_status = status;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
