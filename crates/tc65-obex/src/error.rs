//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when working with OBEX frames and listings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObexError {
    /// The module answered with a response code that is neither success,
    /// continue nor created.
    #[error("response validation error, code=0x{code:02X}")]
    BadResponse {
        /// Raw response code byte.
        code: u8,
    },

    /// Frame or header is too short to be valid.
    #[error("frame too short: expected at least {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Expected minimum length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// A `YYYYMMDDTHHMMSS` timestamp could not be parsed.
    #[error("invalid XML time '{0}'")]
    InvalidTimestamp(String),

    /// A folder-listing entry lacks a required attribute.
    #[error("missing attribute '{attribute}' in listing line '{line}'")]
    MissingAttribute {
        /// Attribute name.
        attribute: &'static str,
        /// Offending line.
        line: String,
    },

    /// A folder-listing `size` attribute is not a non-negative integer.
    #[error("invalid size '{0}'")]
    InvalidSize(String),
}

/// Result type alias for OBEX operations.
pub type ObexResult<T> = Result<T, ObexError>;
