//! Line-based codec for AT communication.
//!
//! Commands are terminated with carriage return (`\r`). Responses are free
//! text; the module echoes commands unless echo has been switched off with
//! `ATE`, so matching is done on the whole accumulated text rather than on
//! individual lines.

use bytes::{Buf, BytesMut};

/// Terminator appended to every command.
pub const COMMAND_TERMINATOR: u8 = b'\r';

/// Sequence that makes the module leave data (OBEX) mode.
pub const ESCAPE_SEQUENCE: &[u8] = b"+++";

/// Typical upper bound of a response; the buffer grows past it as needed.
pub const MAX_LINE_LENGTH: usize = 256;

/// A codec accumulating AT response text.
#[derive(Debug, Default)]
pub struct AtCodec {
    /// Buffer for accumulating incoming data.
    buffer: BytesMut,
}

impl AtCodec {
    /// Create a new codec.
    pub fn new() -> Self {
        AtCodec {
            buffer: BytesMut::with_capacity(MAX_LINE_LENGTH),
        }
    }

    /// Add received data to the buffer.
    pub fn push(&mut self, data: &[u8]) {
        log::trace!("at: buffered {} bytes", data.len());
        self.buffer.extend_from_slice(data);
    }

    /// Whether the accumulated text contains `marker`.
    pub fn contains(&self, marker: &str) -> bool {
        contains_marker(&self.buffer, marker)
    }

    /// The accumulated text, decoded as ISO-8859-1.
    pub fn text(&self) -> String {
        self.buffer.iter().map(|&b| b as char).collect()
    }

    /// Try to decode a complete non-empty line from the buffer.
    ///
    /// Useful for splitting multi-line output such as `ATI`.
    pub fn decode_line(&mut self) -> Option<String> {
        loop {
            let end = self.buffer.iter().position(|&b| b == b'\r' || b == b'\n')?;
            let line = self.buffer.split_to(end);
            while !self.buffer.is_empty() && (self.buffer[0] == b'\r' || self.buffer[0] == b'\n') {
                self.buffer.advance(1);
            }
            if !line.is_empty() {
                return Some(line.iter().map(|&b| b as char).collect());
            }
        }
    }

    /// Encode a command for transmission, appending the `\r` terminator.
    pub fn encode_command(cmd: &str) -> Vec<u8> {
        let mut buf = Vec::with_capacity(cmd.len() + 1);
        buf.extend(cmd.chars().map(|c| c as u32 as u8));
        buf.push(COMMAND_TERMINATOR);
        buf
    }
}

/// Whether `data` contains the ASCII `marker` anywhere.
pub fn contains_marker(data: &[u8], marker: &str) -> bool {
    let marker = marker.as_bytes();
    if marker.is_empty() {
        return true;
    }
    data.windows(marker.len()).any(|w| w == marker)
}
