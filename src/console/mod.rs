//! Console Module
//!
//! Line-oriented command interface, as exposed on the device's serial port.
//!
//! ## Commands
//! - `read`  - print every valid log entry
//! - `erase` - wipe the log region and recover the cursor
//!
//! One command per line; surrounding whitespace is ignored and blank lines
//! are skipped. Anything else is answered with an error line and the
//! session continues.

mod command;
mod response;
mod session;

pub use command::Command;
pub use response::Response;
pub use session::run_session;
