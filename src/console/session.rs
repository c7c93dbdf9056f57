//! Console session loop
//!
//! Reads commands line by line and writes the rendered responses.

use std::io::{BufRead, Write};

use crate::engine::Engine;
use crate::error::Result;
use crate::store::PersistentStore;

use super::{Command, Response};

/// Run commands from `input` against `engine` until end of input
///
/// Parse errors and failed commands are reported on `output` and the
/// session continues; only I/O errors on `input`/`output` end it early.
/// Returns the number of commands executed.
pub fn run_session<S, R, W>(engine: &mut Engine<S>, input: R, mut output: W) -> Result<usize>
where
    S: PersistentStore,
    R: BufRead,
    W: Write,
{
    let mut executed = 0;

    for line in input.lines() {
        let line = line?;

        let response = match Command::parse(&line) {
            Ok(None) => continue,
            Ok(Some(command)) => {
                tracing::trace!("Console command: {:?}", command);
                executed += 1;
                match engine.execute(command) {
                    Ok(response) => response,
                    Err(e) => {
                        tracing::warn!("Console command '{}' failed: {}", command.keyword(), e);
                        Response::Error(e.to_string())
                    }
                }
            }
            Err(e) => Response::Error(e.to_string()),
        };

        for rendered in response.lines() {
            writeln!(output, "{}", rendered)?;
        }
        output.flush()?;
    }

    Ok(executed)
}
