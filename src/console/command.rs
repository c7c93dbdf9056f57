//! Command definitions
//!
//! Represents commands typed on the console.

use crate::error::{NvlogError, Result};

/// A parsed console command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Dump the valid log entries
    Read,

    /// Erase the log region
    Erase,
}

impl Command {
    /// Parse one input line
    ///
    /// Returns `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        match line.trim() {
            "" => Ok(None),
            "read" => Ok(Some(Command::Read)),
            "erase" => Ok(Some(Command::Erase)),
            other => Err(NvlogError::Protocol(format!(
                "unrecognized command '{}'",
                other
            ))),
        }
    }

    /// Keyword as typed on the console
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::Read => "read",
            Command::Erase => "erase",
        }
    }
}
