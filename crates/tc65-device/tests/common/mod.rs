//! Scripted transport standing in for a TC65 module.
//!
//! Every write is recorded and releases the next canned reply; an empty
//! reply means the module stays silent. Reads drain whatever has been
//! released so far.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use tc65_device::{DeviceConfig, Timeouts, Transport};
use tc65_obex::{encode_request, Header};

#[derive(Debug, Default)]
pub struct ScriptState {
    pub writes: Vec<Vec<u8>>,
    pub replies: VecDeque<Vec<u8>>,
    pub pending: Vec<u8>,
    pub closed: bool,
}

/// Cloneable handle: the test keeps one, the device owns the other.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    state: Rc<RefCell<ScriptState>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply released by the next unanswered write.
    pub fn reply(&self, data: &[u8]) -> &Self {
        self.state.borrow_mut().replies.push_back(data.to_vec());
        self
    }

    /// Queue silence for the next unanswered write.
    pub fn silence(&self) -> &Self {
        self.reply(&[])
    }

    /// Bytes available before any write (unsolicited output).
    pub fn preload(&self, data: &[u8]) -> &Self {
        self.state.borrow_mut().pending.extend_from_slice(data);
        self
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state.borrow().writes.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }
}

impl Transport for ScriptedTransport {
    fn read_available(&mut self) -> io::Result<Vec<u8>> {
        let mut state = self.state.borrow_mut();
        if state.closed {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "closed"));
        }
        Ok(std::mem::take(&mut state.pending))
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        if state.closed {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "closed"));
        }
        state.writes.push(data.to_vec());
        if let Some(reply) = state.replies.pop_front() {
            state.pending.extend_from_slice(&reply);
        }
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.state.borrow_mut().closed = true;
        Ok(())
    }
}

/// Configuration with millisecond deadlines.
pub fn fast_config() -> DeviceConfig {
    DeviceConfig {
        timeouts: Timeouts {
            internal_at_ms: 60,
            at_command_ms: 60,
            obex_ms: 60,
            erase_disk_ms: 60,
            escape_ms: 15,
            poll_interval_ms: 1,
            sysstart_poll_ms: 1,
        },
        ..DeviceConfig::default()
    }
}

pub const OK: &[u8] = b"\r\nOK\r\n";

/// A response frame as the module sends it.
pub fn response(code: u8, headers: &[Header]) -> Vec<u8> {
    encode_request(code, &[], headers)
}

/// Replies for the three AT probes and the CONNECT of an OBEX switch.
pub fn script_obex_switch(transport: &ScriptedTransport) {
    transport
        .reply(OK)
        .reply(OK)
        .reply(OK)
        .reply(&response(0xA0, &[]));
}

/// Number of writes an OBEX switch performs.
pub const OBEX_SWITCH_WRITES: usize = 4;

/// The OBEX DISCONNECT request that starts every switch back to AT mode.
pub const DISCONNECT: &[u8] = &[0x81, 0x00, 0x03];
