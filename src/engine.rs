//! Engine Module
//!
//! Device-level coordinator tying the log and the status flag to one store.
//!
//! ## Responsibilities
//! - Run the boot sequence (recover, boot record, status flag)
//! - Persist status changes and log each one
//! - Execute console commands

use std::time::Instant;

use crate::config::Config;
use crate::console::{Command, Response};
use crate::error::{NvlogError, Result};
use crate::flag::{load_flag, save_flag, FlagSlot};
use crate::log::{LogManager, RecoveryReport};
use crate::store::PersistentStore;

/// What happened during `Engine::open`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootReport {
    /// Cursor recovery before the boot record was written
    pub recovery: RecoveryReport,

    /// Slot the boot record landed in
    pub boot_address: u32,

    /// Status in effect after boot
    pub status: u8,

    /// True if the stored flag validated; false if the default was written
    pub status_restored: bool,
}

/// The device engine
pub struct Engine<S> {
    /// Engine configuration
    config: Config,

    /// The persistent log (also owns the store)
    log: LogManager<S>,

    /// Where the status byte lives
    status_slot: FlagSlot,

    /// Current status byte
    status: u8,

    /// Outcome of the boot sequence
    boot: BootReport,

    /// Reference point for "time since boot"
    booted_at: Instant,
}

impl<S: PersistentStore> Engine<S> {
    /// Open the device and run the boot sequence
    ///
    /// On startup:
    /// 1. Validate config against the store
    /// 2. Recover the log cursor
    /// 3. Append the boot record
    /// 4. Load the status flag, writing the default if it does not validate
    pub fn open(config: Config, store: S) -> Result<Self> {
        // Step 1: Validate
        config.validate()?;
        if store.capacity() < config.store_capacity {
            return Err(NvlogError::Config(format!(
                "store holds {} bytes but config expects {}",
                store.capacity(),
                config.store_capacity
            )));
        }
        let status_slot = FlagSlot::new(config.status_flag_address)?;
        let mut log = LogManager::from_config(store, &config)?;

        // Step 2: Recover
        let recovery = log.recover()?;

        // Step 3: Boot record
        let boot_address = log.append(&config.boot_message)?;
        tracing::info!("{} (logged at address {})", config.boot_message, boot_address);

        // Step 4: Status flag
        let loaded = load_flag(log.store_mut(), status_slot)?;
        let (status, status_restored) = if loaded.valid {
            tracing::info!("Status restored: 0x{:02X}", loaded.value);
            (loaded.value, true)
        } else {
            tracing::warn!(
                "No valid status stored; initializing to 0x{:02X}",
                config.default_status
            );
            save_flag(log.store_mut(), status_slot, config.default_status)?;
            (config.default_status, false)
        };

        let boot = BootReport {
            recovery,
            boot_address,
            status,
            status_restored,
        };

        Ok(Self {
            config,
            log,
            status_slot,
            status,
            boot,
            booted_at: Instant::now(),
        })
    }

    /// Execute a console command
    pub fn execute(&mut self, command: Command) -> Result<Response> {
        match command {
            Command::Read => Ok(Response::Entries(self.dump_entries()?)),
            Command::Erase => {
                let report = self.erase_all()?;
                Ok(Response::Erased {
                    cursor: report.cursor,
                })
            }
        }
    }

    /// Append a free-form record
    pub fn append_entry(&mut self, text: &str) -> Result<u32> {
        self.log.append(text)
    }

    /// Texts of all valid entries
    pub fn dump_entries(&mut self) -> Result<Vec<String>> {
        self.log.dump_all()
    }

    /// Erase the log and immediately recover the cursor
    pub fn erase_all(&mut self) -> Result<RecoveryReport> {
        self.log.erase_all()?;
        self.log.recover()
    }

    /// Persist a new status and log the change
    ///
    /// The flag is written before the log record, so a crash in between
    /// leaves the status updated but unlogged rather than the reverse.
    pub fn set_status(&mut self, status: u8) -> Result<u32> {
        save_flag(self.log.store_mut(), self.status_slot, status)?;
        self.status = status;

        let record = format!(
            "Time since boot: {} seconds, LED state: 0x{:02X}",
            self.uptime_secs(),
            status
        );
        tracing::info!("{}", record);
        self.log.append(&record)
    }

    /// Flip the bits in `mask` and persist the result
    pub fn toggle_status(&mut self, mask: u8) -> Result<u8> {
        let status = self.status ^ mask;
        self.set_status(status)?;
        Ok(status)
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the current status byte
    pub fn status(&self) -> u8 {
        self.status
    }

    /// Get the boot sequence outcome
    pub fn boot_report(&self) -> BootReport {
        self.boot
    }

    /// Whole seconds since `open` returned
    pub fn uptime_secs(&self) -> u64 {
        self.booted_at.elapsed().as_secs()
    }

    /// Get the status flag slot
    pub fn status_slot(&self) -> FlagSlot {
        self.status_slot
    }

    pub fn log(&self) -> &LogManager<S> {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut LogManager<S> {
        &mut self.log
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shut down and hand back the store
    pub fn into_store(self) -> S {
        self.log.into_store()
    }
}
