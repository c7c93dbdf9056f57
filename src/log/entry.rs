//! Log entry framing
//!
//! All offset arithmetic for the slot layout lives here.

use bytes::{BufMut, Bytes, BytesMut};

use crate::checksum::Checksum;
use crate::config::OversizePolicy;
use crate::error::{NvlogError, Result};

use super::FRAMING_OVERHEAD;

/// A single text record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Non-empty, NUL-free payload bytes
    payload: Vec<u8>,
}

/// What a slot holds after parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotContents {
    /// First byte is zero
    Empty,

    /// Terminator found and checksum matches
    Valid(Entry),

    /// Anything else
    Corrupt(CorruptReason),
}

/// Why a non-empty slot was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorruptReason {
    /// Slot too small to hold any framed entry
    Truncated,

    /// No zero byte where the terminator could be
    MissingTerminator,

    /// Stored checksum differs from the recomputed one
    ChecksumMismatch { stored: u16, computed: u16 },
}

impl std::fmt::Display for CorruptReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorruptReason::Truncated => f.write_str("slot truncated"),
            CorruptReason::MissingTerminator => f.write_str("no terminator"),
            CorruptReason::ChecksumMismatch { stored, computed } => write!(
                f,
                "checksum mismatch (stored 0x{:04X}, computed 0x{:04X})",
                stored, computed
            ),
        }
    }
}

impl Entry {
    /// Build an entry from raw payload bytes
    ///
    /// The payload must be non-empty and contain no zero byte, since zero
    /// marks both an empty slot and the end of the payload.
    pub fn from_payload(payload: impl Into<Vec<u8>>) -> Result<Self> {
        let payload = payload.into();
        if payload.is_empty() {
            return Err(NvlogError::EmptyEntry);
        }
        if payload.contains(&0) {
            return Err(NvlogError::Serialization(
                "entry payload contains a NUL byte".to_string(),
            ));
        }
        Ok(Self { payload })
    }

    /// Build an entry from text, fitting it into `max_payload` bytes
    ///
    /// Text ends at the first NUL character. Longer text is cut on a
    /// character boundary (`Truncate`) or refused (`Reject`).
    pub fn from_text(text: &str, max_payload: usize, policy: OversizePolicy) -> Result<Self> {
        let text = match text.find('\0') {
            Some(nul) => &text[..nul],
            None => text,
        };

        let text = if text.len() > max_payload {
            match policy {
                OversizePolicy::Reject => {
                    return Err(NvlogError::TooLong {
                        len: text.len(),
                        max: max_payload,
                    })
                }
                OversizePolicy::Truncate => {
                    let mut end = max_payload;
                    while !text.is_char_boundary(end) {
                        end -= 1;
                    }
                    tracing::debug!("Truncating entry from {} to {} bytes", text.len(), end);
                    &text[..end]
                }
            }
        } else {
            text
        };

        Self::from_payload(text.as_bytes())
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload as text (invalid UTF-8 is replaced, never rejected)
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }

    /// Payload plus terminator: the bytes covered by the checksum
    pub fn data_length(&self) -> usize {
        self.payload.len() + 1
    }

    /// Checksum over payload + terminator
    pub fn checksum(&self) -> u16 {
        let mut hasher = Checksum::new();
        hasher.update(&self.payload);
        hasher.update(&[0]);
        hasher.finalize()
    }

    /// Frame into a full slot of `entry_size` bytes
    ///
    /// Format: payload | 0x00 | checksum (u16 BE) | zero padding
    pub fn serialize(&self, entry_size: usize) -> Result<Bytes> {
        let max = entry_size.saturating_sub(FRAMING_OVERHEAD);
        if self.payload.len() > max {
            return Err(NvlogError::TooLong {
                len: self.payload.len(),
                max,
            });
        }

        let mut buf = BytesMut::with_capacity(entry_size);
        buf.put_slice(&self.payload);
        buf.put_u8(0);
        buf.put_u16(self.checksum());
        buf.put_bytes(0, entry_size - buf.len());
        Ok(buf.freeze())
    }

    /// Parse one slot read from the store
    pub fn deserialize(slot: &[u8]) -> SlotContents {
        if slot.len() <= FRAMING_OVERHEAD {
            return SlotContents::Corrupt(CorruptReason::Truncated);
        }
        if slot[0] == 0 {
            return SlotContents::Empty;
        }

        // Terminator must leave room for the two checksum bytes
        let last_terminator = slot.len() - FRAMING_OVERHEAD;
        let terminator = match slot[..=last_terminator].iter().position(|&b| b == 0) {
            Some(offset) => offset,
            None => return SlotContents::Corrupt(CorruptReason::MissingTerminator),
        };

        let data_length = terminator + 1;
        let stored = u16::from_be_bytes([slot[data_length], slot[data_length + 1]]);
        let computed = crate::checksum::compute(&slot[..data_length]);

        if stored != computed {
            return SlotContents::Corrupt(CorruptReason::ChecksumMismatch { stored, computed });
        }

        SlotContents::Valid(Self {
            payload: slot[..terminator].to_vec(),
        })
    }
}
