//! Response classification for the AT channel.

/// Final result code of a successful command.
pub const OK_MARKER: &str = "OK";

/// Final result code of a failed command.
pub const ERROR_MARKER: &str = "ERROR";

/// Unsolicited code sent once the module has booted.
pub const SYSSTART_MARKER: &str = "^SYSSTART";

/// Classification of accumulated response text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtResponse {
    /// `OK` seen.
    Ok,
    /// `ERROR` (or `+CME ERROR`) seen and no `OK`.
    Error,
    /// No final result code yet.
    Pending,
}

impl AtResponse {
    /// Classify accumulated response text. `OK` anywhere wins.
    pub fn classify(text: &str) -> AtResponse {
        if text.contains(OK_MARKER) {
            AtResponse::Ok
        } else if text.contains(ERROR_MARKER) {
            AtResponse::Error
        } else {
            AtResponse::Pending
        }
    }

    /// Check if this is an OK response.
    pub fn is_ok(&self) -> bool {
        matches!(self, AtResponse::Ok)
    }
}
