//! Error types for the device session.

use std::time::Duration;

use tc65_obex::ObexError;
use thiserror::Error;

/// Errors that can occur while talking to the module.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Serial I/O failure.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// An AT or OBEX wait exceeded its deadline.
    #[error("timeout waiting for {waiting_for} after {} ms and {received} bytes", elapsed.as_millis())]
    Timeout {
        /// What was awaited (`OK`, an OBEX response, `^SYSSTART`).
        waiting_for: String,
        /// Time spent waiting.
        elapsed: Duration,
        /// Bytes accumulated before giving up.
        received: usize,
    },

    /// An OBEX response code failed validation.
    #[error("response validation error, code=0x{code:02X}")]
    Protocol {
        /// Raw response code.
        code: u8,
    },

    /// Malformed data from the module or the caller.
    #[error("format error: {0}")]
    Format(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<ObexError> for DeviceError {
    fn from(err: ObexError) -> Self {
        match err {
            ObexError::BadResponse { code } => DeviceError::Protocol { code },
            other => DeviceError::Format(other.to_string()),
        }
    }
}

impl From<serde_yaml::Error> for DeviceError {
    fn from(err: serde_yaml::Error) -> Self {
        DeviceError::Config(err.to_string())
    }
}

/// Result type alias for device operations.
pub type Result<T> = std::result::Result<T, DeviceError>;
