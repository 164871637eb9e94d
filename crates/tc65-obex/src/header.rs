//! OBEX header encoding/decoding.
//!
//! Two wire encodings exist:
//!
//! ```text
//! length-prefixed:  +----+--------+--------+-------------+
//!                   | id | len_hi | len_lo | payload ... |   len = 3 + payload
//!                   +----+--------+--------+-------------+
//!
//! LENGTH (0xC3):    +----+-------------------------------+
//!                   | id | u32 big-endian value          |
//!                   +----+-------------------------------+
//! ```
//!
//! Only the LENGTH header uses the fixed form; every decoder that walks a
//! header list has to special-case it.

use chrono::NaiveDateTime;

use crate::constants::*;
use crate::error::{ObexError, ObexResult};
use crate::time::encode_xml_datetime;

/// A single OBEX header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Header identifier (`HEADER_*`).
    pub id: u8,
    /// Raw payload. For [`HEADER_LENGTH`] this is the 4-byte big-endian value.
    pub payload: Vec<u8>,
}

impl Header {
    /// Create a header from an id and raw payload.
    pub fn new(id: u8, payload: impl Into<Vec<u8>>) -> Self {
        Header {
            id,
            payload: payload.into(),
        }
    }

    /// NAME header carrying `name` as UTF-16BE without BOM.
    pub fn name(name: &str) -> Self {
        Header::new(HEADER_NAME, encode_utf16_name(name))
    }

    /// TYPE header carrying an ASCII MIME type.
    pub fn mime_type(mime: &str) -> Self {
        Header::new(HEADER_TYPE, mime.as_bytes())
    }

    /// LENGTH header carrying the total object size.
    pub fn length(size: u32) -> Self {
        Header::new(HEADER_LENGTH, u32_to_bytes(size))
    }

    /// TIME header carrying a `YYYYMMDDTHHMMSS` timestamp.
    pub fn time(modified: &NaiveDateTime) -> Self {
        Header::new(HEADER_TIME, encode_xml_datetime(modified).into_bytes())
    }

    /// TARGET header.
    pub fn target(uuid: &[u8]) -> Self {
        Header::new(HEADER_TARGET, uuid)
    }

    /// BODY header, or END_OF_BODY when `last` is set.
    pub fn body(chunk: &[u8], last: bool) -> Self {
        let id = if last { HEADER_END_OF_BODY } else { HEADER_BODY };
        Header::new(id, chunk)
    }

    /// APP_PARAMETERS header.
    pub fn app_parameters(params: &[u8]) -> Self {
        Header::new(HEADER_APP_PARAMETERS, params)
    }

    /// Whether this header carries body data.
    pub fn is_body(&self) -> bool {
        self.id == HEADER_BODY || self.id == HEADER_END_OF_BODY
    }

    /// Number of bytes this header occupies on the wire.
    pub fn encoded_len(&self) -> usize {
        if self.id == HEADER_LENGTH {
            LENGTH_HEADER_SIZE
        } else {
            HEADER_PREFIX_SIZE + self.payload.len()
        }
    }

    /// Encode the header. See [`encode_header`].
    pub fn encode(&self) -> Vec<u8> {
        encode_header(self.id, &self.payload)
    }

    /// Decode one header from the start of `buf`.
    ///
    /// Returns the header and the number of bytes it occupied.
    pub fn decode(buf: &[u8]) -> ObexResult<(Header, usize)> {
        let id = *buf.first().ok_or(ObexError::FrameTooShort {
            expected: 1,
            actual: 0,
        })?;

        if id == HEADER_LENGTH {
            if buf.len() < LENGTH_HEADER_SIZE {
                return Err(ObexError::FrameTooShort {
                    expected: LENGTH_HEADER_SIZE,
                    actual: buf.len(),
                });
            }
            return Ok((Header::new(id, &buf[1..LENGTH_HEADER_SIZE]), LENGTH_HEADER_SIZE));
        }

        if buf.len() < HEADER_PREFIX_SIZE {
            return Err(ObexError::FrameTooShort {
                expected: HEADER_PREFIX_SIZE,
                actual: buf.len(),
            });
        }
        let declared = bytes_to_int(&buf[1..3]) as usize;
        if declared < HEADER_PREFIX_SIZE || declared > buf.len() {
            return Err(ObexError::FrameTooShort {
                expected: declared.max(HEADER_PREFIX_SIZE),
                actual: buf.len(),
            });
        }
        Ok((Header::new(id, &buf[HEADER_PREFIX_SIZE..declared]), declared))
    }
}

/// Encode a header.
///
/// For [`HEADER_LENGTH`] the payload is emitted as a 4-byte big-endian value
/// with no length field; every other id is emitted as `id`, the big-endian
/// u16 `3 + payload.len()`, then the payload. Payloads must fit a u16 length.
pub fn encode_header(id: u8, payload: &[u8]) -> Vec<u8> {
    if id == HEADER_LENGTH {
        let mut buf = Vec::with_capacity(LENGTH_HEADER_SIZE);
        buf.push(id);
        buf.extend_from_slice(&u32_to_bytes(bytes_to_int(payload)));
        return buf;
    }

    let len = (HEADER_PREFIX_SIZE + payload.len()) as u16;
    let mut buf = Vec::with_capacity(len as usize);
    buf.push(id);
    buf.extend_from_slice(&u16_to_bytes(len));
    buf.extend_from_slice(payload);
    buf
}

/// Decode every header in `buf` until it is exhausted.
pub fn decode_headers(mut buf: &[u8]) -> ObexResult<Vec<Header>> {
    let mut headers = Vec::new();
    while !buf.is_empty() {
        let (header, consumed) = Header::decode(buf)?;
        headers.push(header);
        buf = &buf[consumed..];
    }
    Ok(headers)
}

/// Encode a name the way the module expects: every character becomes a zero
/// high byte followed by its low byte.
///
/// Only characters in the Latin-1 range survive intact; anything above is
/// truncated to its low byte.
pub fn encode_utf16_name(name: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(name.len() * 2);
    for c in name.chars() {
        buf.push(0x00);
        buf.push(c as u32 as u8);
    }
    buf
}

/// Big-endian u16.
pub fn u16_to_bytes(value: u16) -> [u8; 2] {
    value.to_be_bytes()
}

/// Big-endian u32.
pub fn u32_to_bytes(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}

/// Interpret up to four bytes as an unsigned big-endian integer.
pub fn bytes_to_int(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_length_prefixed() {
        let encoded = encode_header(HEADER_TYPE, b"abc");
        assert_eq!(encoded, vec![HEADER_TYPE, 0x00, 0x06, b'a', b'b', b'c']);
    }

    #[test]
    fn test_encode_length_header_is_fixed() {
        let encoded = Header::length(1000).encode();
        assert_eq!(encoded, vec![HEADER_LENGTH, 0x00, 0x00, 0x03, 0xE8]);
        assert_eq!(Header::length(1000).encoded_len(), 5);
    }

    #[test]
    fn test_header_round_trip() {
        let headers = [
            Header::name("test.txt"),
            Header::mime_type(FOLDER_LISTING_TYPE),
            Header::length(0xDEADBEEF),
            Header::body(&[1, 2, 3], false),
            Header::body(&[], true),
            Header::target(&FILE_SYSTEM_TARGET),
        ];
        for header in headers {
            let encoded = header.encode();
            let (decoded, consumed) = Header::decode(&encoded).unwrap();
            assert_eq!(decoded, header);
            assert_eq!(consumed, encoded.len());
        }
    }

    #[test]
    fn test_decode_headers_sequence() {
        let mut buf = Header::name("a").encode();
        buf.extend(Header::length(7).encode());
        buf.extend(Header::body(b"payload", true).encode());
        let headers = decode_headers(&buf).unwrap();
        assert_eq!(headers.len(), 3);
        assert_eq!(headers[1].id, HEADER_LENGTH);
        assert_eq!(headers[2].payload, b"payload");
    }

    #[test]
    fn test_decode_truncated_header() {
        let encoded = Header::name("abc").encode();
        assert!(matches!(
            Header::decode(&encoded[..4]),
            Err(ObexError::FrameTooShort { .. })
        ));
        assert!(Header::decode(&[HEADER_LENGTH, 0, 0]).is_err());
    }

    #[test]
    fn test_utf16_name() {
        assert_eq!(encode_utf16_name("ab"), vec![0, b'a', 0, b'b']);
        // Latin-1 survives, higher code points keep only their low byte.
        assert_eq!(encode_utf16_name("\u{e9}"), vec![0, 0xE9]);
        assert_eq!(encode_utf16_name("\u{20ac}"), vec![0, 0xAC]);
    }

    #[test]
    fn test_int_round_trip() {
        for v in [0u16, 1, 0x00FF, 0x1234, u16::MAX] {
            assert_eq!(bytes_to_int(&u16_to_bytes(v)), u32::from(v));
        }
        for v in [0u32, 1, 0x0001_0000, 0x1234_5678, u32::MAX] {
            assert_eq!(bytes_to_int(&u32_to_bytes(v)), v);
        }
    }
}
