//! File-backed store
//!
//! Keeps a fixed-size device image on disk so the log survives process
//! restarts on a host without the real EEPROM.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::error::{NvlogError, Result};

use super::{check_range, PersistentStore};

/// A device image file of exactly `capacity` bytes
///
/// A new image is created zero-filled. Every write is flushed and
/// `sync_data`-ed before the settle delay starts.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    file: File,
    capacity: u32,
    settle: Duration,
}

impl FileStore {
    /// Open or create an image at `path`
    ///
    /// A shorter existing image is zero-extended; a longer one is rejected
    /// rather than silently cut.
    pub fn open(path: &Path, capacity: u32) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let len = file.metadata()?.len();
        if len > u64::from(capacity) {
            return Err(NvlogError::Config(format!(
                "image {} is {} bytes, larger than capacity {}",
                path.display(),
                len,
                capacity
            )));
        }
        if len < u64::from(capacity) {
            tracing::debug!(
                "Extending image {} from {} to {} bytes",
                path.display(),
                len,
                capacity
            );
            file.set_len(u64::from(capacity))?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            file,
            capacity,
            settle: Duration::ZERO,
        })
    }

    /// Sleep for `settle` after every write
    pub fn with_settle_delay(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Get the image path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistentStore for FileStore {
    fn capacity(&self) -> u32 {
        self.capacity
    }

    fn read(&mut self, address: u32, len: usize) -> Result<Vec<u8>> {
        check_range(address, len, self.capacity)?;

        let mut buf = vec![0u8; len];
        self.file.seek(SeekFrom::Start(u64::from(address)))?;
        self.file.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        check_range(address, data.len(), self.capacity)?;

        self.file.seek(SeekFrom::Start(u64::from(address)))?;
        self.file.write_all(data)?;
        self.file.flush()?;
        self.file.sync_data()?;

        if !self.settle.is_zero() {
            thread::sleep(self.settle);
        }
        Ok(())
    }
}
