//! Shared Log
//!
//! Serializes every log operation behind one mutex for hosts with more than
//! one thread. Recovery and append read-modify-write the cursor and the
//! region, so they must never interleave.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;
use crate::store::PersistentStore;

use super::scan::RecoveryReport;
use super::LogManager;

/// Cloneable handle to a mutex-guarded `LogManager`
pub struct SharedLog<S> {
    inner: Arc<Mutex<LogManager<S>>>,
}

impl<S> Clone for SharedLog<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: PersistentStore> SharedLog<S> {
    pub fn new(manager: LogManager<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    pub fn append(&self, text: &str) -> Result<u32> {
        self.inner.lock().append(text)
    }

    pub fn dump_all(&self) -> Result<Vec<String>> {
        self.inner.lock().dump_all()
    }

    pub fn erase_all(&self) -> Result<()> {
        self.inner.lock().erase_all()
    }

    pub fn recover(&self) -> Result<RecoveryReport> {
        self.inner.lock().recover()
    }

    pub fn cursor(&self) -> Option<u32> {
        self.inner.lock().cursor()
    }

    /// Run `f` with exclusive access to the manager
    pub fn with<R>(&self, f: impl FnOnce(&mut LogManager<S>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Take the manager back if this is the last handle
    pub fn try_into_inner(self) -> std::result::Result<LogManager<S>, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}
