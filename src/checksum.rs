//! Entry checksum
//!
//! A 16-bit integrity code seeded with `0xFFFF`. It resembles CRC-16/CCITT
//! but drops the `x << 12` term, so it is NOT interchangeable with any
//! standard CRC crate. Writer and reader must both use this exact variant.

/// Initial accumulator value
pub const CHECKSUM_SEED: u16 = 0xFFFF;

/// Streaming checksum hasher
#[derive(Debug, Clone, Copy)]
pub struct Checksum {
    acc: u16,
}

impl Default for Checksum {
    fn default() -> Self {
        Self::new()
    }
}

impl Checksum {
    pub fn new() -> Self {
        Self { acc: CHECKSUM_SEED }
    }

    /// Fold `data` into the accumulator
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            let mut x = (self.acc >> 8) as u8 ^ byte;
            x ^= x >> 4;
            let x = u16::from(x);
            self.acc = (self.acc << 8) ^ (x << 5) ^ x;
        }
    }

    pub fn finalize(self) -> u16 {
        self.acc
    }
}

/// Checksum of a complete byte sequence
pub fn compute(data: &[u8]) -> u16 {
    let mut hasher = Checksum::new();
    hasher.update(data);
    hasher.finalize()
}
