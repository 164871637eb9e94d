//! Polling receive loop shared by the AT and OBEX channels.
//!
//! The module answers asynchronously, so every request is followed by a loop
//! that drains the transport into a buffer until a completion predicate holds
//! or the deadline passes:
//!
//! ```text
//!   write(request) ──► read_available ──► append ──► complete? ──► done
//!                          ▲                           │ no
//!                          └── sleep(poll) if idle ◄───┘
//! ```

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use tc65_at::{contains_marker, AtResponse};
use tc65_obex::{is_frame_complete, ByteBuffer};

use crate::error::{DeviceError, Result};
use crate::transport::Transport;

/// Condition that ends a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The accumulated text contains the given marker.
    ContainsText(&'static str),
    /// The buffer holds at least the length announced by an OBEX frame prefix.
    ObexFrame,
}

impl Completion {
    /// Whether `buf` satisfies this condition.
    pub fn is_complete(&self, buf: &[u8]) -> bool {
        match self {
            Completion::ContainsText(marker) => contains_marker(buf, marker),
            Completion::ObexFrame => is_frame_complete(buf),
        }
    }
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::ContainsText(marker) => f.write_str(marker),
            Completion::ObexFrame => f.write_str("OBEX response"),
        }
    }
}

/// Drains a transport until a [`Completion`] holds.
#[derive(Debug, Clone, Copy)]
pub struct ResponseWaiter {
    poll_interval: Duration,
}

/// Result of one drain loop.
enum Drained {
    Complete(ByteBuffer),
    Expired { elapsed: Duration, buf: ByteBuffer },
}

impl ResponseWaiter {
    /// Create a waiter sleeping `poll_interval` whenever a read returns nothing.
    pub fn new(poll_interval: Duration) -> Self {
        ResponseWaiter { poll_interval }
    }

    /// Wait for `completion` within `timeout`, failing with
    /// [`DeviceError::Timeout`] when the deadline passes.
    pub fn wait_required<T: Transport>(
        &self,
        transport: &mut T,
        completion: Completion,
        timeout: Duration,
    ) -> Result<ByteBuffer> {
        match self.drain(transport, completion, timeout)? {
            Drained::Complete(buf) => Ok(buf),
            Drained::Expired { elapsed, buf } => Err(DeviceError::Timeout {
                waiting_for: completion.to_string(),
                elapsed,
                received: buf.len(),
            }),
        }
    }

    /// Wait for `completion` within `timeout`; `None` when the deadline passes.
    pub fn wait_optional<T: Transport>(
        &self,
        transport: &mut T,
        completion: Completion,
        timeout: Duration,
    ) -> Result<Option<ByteBuffer>> {
        match self.drain(transport, completion, timeout)? {
            Drained::Complete(buf) => Ok(Some(buf)),
            Drained::Expired { .. } => Ok(None),
        }
    }

    fn drain<T: Transport>(
        &self,
        transport: &mut T,
        completion: Completion,
        timeout: Duration,
    ) -> Result<Drained> {
        let started = Instant::now();
        let mut buf = ByteBuffer::new();
        loop {
            let chunk = transport.read_available()?;
            if chunk.is_empty() {
                thread::sleep(self.poll_interval);
            } else {
                buf.append(&chunk);
            }
            if completion.is_complete(buf.as_slice()) {
                tracing::trace!("received {} after {:?}: {}", completion, started.elapsed(), buf.to_hex_string());
                return Ok(Drained::Complete(buf));
            }
            let elapsed = started.elapsed();
            if elapsed > timeout {
                tracing::debug!(
                    "no {} after {:?}, buffered: {}",
                    completion,
                    elapsed,
                    buf.to_printable_string()
                );
                if matches!(completion, Completion::ContainsText(_))
                    && AtResponse::classify(&buf.to_latin1_string()) == AtResponse::Error
                {
                    tracing::warn!("module answered ERROR while waiting for {}", completion);
                }
                return Ok(Drained::Expired { elapsed, buf });
            }
        }
    }
}
