//! Frame encoding/decoding utilities.
//!
//! Every OBEX packet is framed as:
//!
//! ```text
//! +--------+--------+--------+----------------------+
//! | opcode | len_hi | len_lo | prefix + headers ... |
//! +--------+--------+--------+----------------------+
//! ```
//!
//! where the big-endian length counts the whole packet including its 3-byte
//! prefix. Requests may carry extra fixed bytes (CONNECT parameters, SETPATH
//! flags) between the length and the first header.

use crate::constants::*;
use crate::error::{ObexError, ObexResult};
use crate::header::{bytes_to_int, u16_to_bytes, Header};

/// A decoded OBEX packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObexFrame {
    /// Request opcode or response code.
    pub opcode: u8,
    /// Declared total length, 3-byte prefix included.
    pub total_length: u16,
    /// Everything after the 3-byte prefix, up to `total_length`.
    pub body: Vec<u8>,
}

impl ObexFrame {
    /// Decode a complete frame from the start of `buf`.
    pub fn decode(buf: &[u8]) -> ObexResult<ObexFrame> {
        if buf.len() < FRAME_PREFIX_SIZE {
            return Err(ObexError::FrameTooShort {
                expected: FRAME_PREFIX_SIZE,
                actual: buf.len(),
            });
        }
        let total_length = bytes_to_int(&buf[1..3]) as u16;
        let end = usize::from(total_length).max(FRAME_PREFIX_SIZE);
        if buf.len() < end {
            return Err(ObexError::FrameTooShort {
                expected: end,
                actual: buf.len(),
            });
        }
        Ok(ObexFrame {
            opcode: buf[0],
            total_length,
            body: buf[FRAME_PREFIX_SIZE..end].to_vec(),
        })
    }

    /// Whether the CONTINUE bit is set on this (response) frame.
    pub fn is_continue(&self) -> bool {
        is_continue(self.opcode)
    }
}

/// Encode a request: opcode, big-endian total length, `extra_prefix`, then
/// the encoded headers in order.
pub fn encode_request(opcode: u8, extra_prefix: &[u8], headers: &[Header]) -> Vec<u8> {
    let headers_len: usize = headers.iter().map(Header::encoded_len).sum();
    let total = FRAME_PREFIX_SIZE + extra_prefix.len() + headers_len;

    let mut buf = Vec::with_capacity(total);
    buf.push(opcode);
    buf.extend_from_slice(&u16_to_bytes(total as u16));
    buf.extend_from_slice(extra_prefix);
    for header in headers {
        buf.extend_from_slice(&header.encode());
    }
    buf
}

/// Whether `buf` holds at least one complete frame.
pub fn is_frame_complete(buf: &[u8]) -> bool {
    buf.len() >= FRAME_PREFIX_SIZE && buf.len() >= bytes_to_int(&buf[1..3]) as usize
}

/// The response code of a response frame (its first byte).
pub fn response_code(buf: &[u8]) -> Option<u8> {
    buf.first().copied()
}

/// Accept a response code the module uses for a positive answer.
///
/// Three checks are applied literally: the SUCCESS bit, the CONTINUE bit and
/// the CREATED mask. The CREATED test is implied by the SUCCESS test.
pub fn validate(code: u8) -> ObexResult<()> {
    if (code & RESPONSE_SUCCESS) == RESPONSE_SUCCESS {
        return Ok(());
    }
    if (code & RESPONSE_CONTINUE) == RESPONSE_CONTINUE {
        return Ok(());
    }
    if (code & RESPONSE_CREATED) == RESPONSE_CREATED {
        return Ok(());
    }
    Err(ObexError::BadResponse { code })
}

/// Whether the CONTINUE bit is set.
pub fn is_continue(code: u8) -> bool {
    (code & RESPONSE_CONTINUE) == RESPONSE_CONTINUE
}

/// Locate the body payload of a response frame.
///
/// Headers are walked from offset 3. The first BODY or END_OF_BODY header
/// wins and its payload (declared length minus the 3-byte header prefix,
/// clamped to the buffer) is returned. LENGTH headers are skipped as fixed
/// 5-byte items; all other headers by their declared length. Returns `None`
/// when no body header is found or the header chain is malformed.
pub fn find_body(buf: &[u8]) -> Option<&[u8]> {
    let mut i = FRAME_PREFIX_SIZE;
    while i < buf.len() {
        let id = buf[i];
        if id == HEADER_LENGTH {
            i += LENGTH_HEADER_SIZE;
            continue;
        }
        if i + HEADER_PREFIX_SIZE > buf.len() {
            log::debug!("truncated header 0x{:02X} at offset {}", id, i);
            return None;
        }
        let declared = bytes_to_int(&buf[i + 1..i + 3]) as usize;
        if id == HEADER_BODY || id == HEADER_END_OF_BODY {
            let start = i + HEADER_PREFIX_SIZE;
            let end = (i + declared.max(HEADER_PREFIX_SIZE)).min(buf.len());
            log::trace!("body header 0x{:02X} at offset {}", id, i);
            return Some(&buf[start..end]);
        }
        if declared < HEADER_PREFIX_SIZE {
            log::debug!("invalid length {} for header 0x{:02X}", declared, id);
            return None;
        }
        i += declared;
    }
    None
}
