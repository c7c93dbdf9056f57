//! Response definitions
//!
//! Represents console output for an executed command.

/// Outcome of a console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Texts of the valid entries, oldest first
    Entries(Vec<String>),

    /// Region wiped; `cursor` is where the next entry will go
    Erased { cursor: u32 },

    /// Command failed; message for the operator
    Error(String),
}

impl Response {
    /// Render as console lines
    pub fn lines(&self) -> Vec<String> {
        match self {
            Response::Entries(entries) => {
                let mut lines = Vec::with_capacity(entries.len() + 2);
                lines.push("Reading log entries...".to_string());
                lines.extend(entries.iter().map(|e| format!("Log entry: {}", e)));
                lines.push("End of valid log entries.".to_string());
                lines
            }
            Response::Erased { cursor } => {
                vec![format!("Log erased. Next entry at address {}.", cursor)]
            }
            Response::Error(message) => vec![format!(">>> Error: {}", message)],
        }
    }
}
