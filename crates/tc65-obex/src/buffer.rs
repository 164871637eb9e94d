//! Growable byte buffer used for frames, bodies and serial accumulation.

use std::fmt;

use bytes::{BufMut, BytesMut};

/// Initial capacity of a new buffer; growth beyond it is amortised by `BytesMut`.
const INITIAL_CAPACITY: usize = 64;

/// A growable byte sequence with diagnostic renderings.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ByteBuffer {
    inner: BytesMut,
}

impl ByteBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        ByteBuffer {
            inner: BytesMut::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Create an empty buffer able to hold `capacity` bytes without growing.
    pub fn with_capacity(capacity: usize) -> Self {
        ByteBuffer {
            inner: BytesMut::with_capacity(capacity),
        }
    }

    /// Append a slice.
    pub fn append(&mut self, data: &[u8]) {
        self.inner.extend_from_slice(data);
    }

    /// Append a single byte.
    pub fn push(&mut self, byte: u8) {
        self.inner.put_u8(byte);
    }

    /// Number of bytes held.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Borrow the contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.inner
    }

    /// Copy `len` bytes starting at `offset` into a new buffer.
    ///
    /// Returns `None` if the range does not lie within the buffer.
    pub fn sub_range(&self, offset: usize, len: usize) -> Option<ByteBuffer> {
        let end = offset.checked_add(len)?;
        self.inner.get(offset..end).map(ByteBuffer::from)
    }

    /// Render as `0x41 0x42 ` style hex, one token per byte.
    pub fn to_hex_string(&self) -> String {
        let mut s = String::with_capacity(self.inner.len() * 5);
        for byte in self.inner.iter() {
            s.push_str("0x");
            s.push_str(&hex::encode([*byte]));
            s.push(' ');
        }
        s
    }

    /// Render with every byte outside `0x20..=0x7F` replaced by `.`.
    pub fn to_printable_string(&self) -> String {
        self.inner
            .iter()
            .map(|&b| if (0x20..=0x7F).contains(&b) { b as char } else { '.' })
            .collect()
    }

    /// Decode as single-byte (ISO-8859-1) text.
    pub fn to_latin1_string(&self) -> String {
        self.inner.iter().map(|&b| b as char).collect()
    }

    /// Consume the buffer, returning its bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.inner.to_vec()
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(data: &[u8]) -> Self {
        ByteBuffer {
            inner: BytesMut::from(data),
        }
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(data: Vec<u8>) -> Self {
        ByteBuffer::from(data.as_slice())
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteBuffer({} bytes: {})", self.len(), self.to_hex_string().trim_end())
    }
}
