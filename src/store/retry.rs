//! Bounded retry wrapper
//!
//! Re-issues store operations that fail with a transient bus error, up to
//! the attempt limit of a [`RetryPolicy`]. Anything else fails immediately.

use std::thread;
use std::time::Duration;

use crate::config::RetryPolicy;
use crate::error::Result;

use super::PersistentStore;

/// A store that retries transient failures of an inner store
#[derive(Debug)]
pub struct RetryingStore<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: PersistentStore> RetryingStore<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// Get the retry policy
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn run<T>(&mut self, what: &str, mut op: impl FnMut(&mut S) -> Result<T>) -> Result<T> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op(&mut self.inner) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    tracing::warn!(
                        "Store {} failed (attempt {}/{}): {}; retrying",
                        what,
                        attempt,
                        max_attempts,
                        e
                    );
                    if self.policy.backoff_ms > 0 {
                        thread::sleep(Duration::from_millis(self.policy.backoff_ms));
                    }
                    attempt += 1;
                }
                Err(e) => {
                    if e.is_transient() {
                        tracing::error!(
                            "Store {} failed after {} attempts: {}",
                            what,
                            attempt,
                            e
                        );
                    }
                    return Err(e);
                }
            }
        }
    }
}

impl<S: PersistentStore> PersistentStore for RetryingStore<S> {
    fn capacity(&self) -> u32 {
        self.inner.capacity()
    }

    fn read(&mut self, address: u32, len: usize) -> Result<Vec<u8>> {
        self.run("read", |store| store.read(address, len))
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        self.run("write", |store| store.write(address, data))
    }
}
