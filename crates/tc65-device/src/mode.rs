//! Switching the shared serial line between AT and OBEX mode.

use std::fmt;

use tc65_at::{AtCodec, AtCommand, ESCAPE_SEQUENCE, OK_MARKER};
use tc65_obex::{
    encode_request, u16_to_bytes, Header, CONNECT_FLAGS, FILE_SYSTEM_TARGET, MAX_PACKET_LENGTH,
    OBEX_VERSION, REQUEST_CONNECT, REQUEST_DISCONNECT,
};

use crate::device::Device;
use crate::error::Result;
use crate::transport::Transport;
use crate::waiter::Completion;

/// Which protocol the module currently expects on the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    /// Text commands.
    #[default]
    AtMode,
    /// Binary OBEX frames.
    ObexMode,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionMode::AtMode => f.write_str("AT"),
            SessionMode::ObexMode => f.write_str("OBEX"),
        }
    }
}

/// Prefix bytes of a CONNECT request: version, flags, maximum packet length.
pub fn connect_prefix() -> [u8; 4] {
    let [hi, lo] = u16_to_bytes(MAX_PACKET_LENGTH);
    [OBEX_VERSION, CONNECT_FLAGS, hi, lo]
}

impl<T: Transport> Device<T> {
    /// Enter OBEX mode and connect to the file system service.
    ///
    /// No-op when already in OBEX mode.
    pub fn ensure_obex(&mut self) -> Result<()> {
        if self.mode == SessionMode::ObexMode {
            return Ok(());
        }
        tracing::debug!("switching to OBEX mode");
        for cmd in AtCommand::obex_switch_sequence() {
            self.send(&cmd.encode())?;
            self.wait_for_ok(self.config.timeouts.internal_at())?;
        }
        let request = encode_request(
            REQUEST_CONNECT,
            &connect_prefix(),
            &[Header::target(&FILE_SYSTEM_TARGET)],
        );
        self.obex_exchange(&request, self.config.timeouts.obex())?;
        self.mode = SessionMode::ObexMode;
        tracing::debug!("OBEX connected");
        Ok(())
    }

    /// Close the OBEX session, leave data mode with `+++` and switch command
    /// echo back on.
    ///
    /// No-op when already in AT mode. The DISCONNECT response must validate.
    /// The escape is retried up to the configured number of attempts; `ATE1`
    /// must then answer `OK`.
    pub fn ensure_at(&mut self) -> Result<()> {
        if self.mode == SessionMode::AtMode {
            return Ok(());
        }
        tracing::debug!("switching to AT mode");
        let request = encode_request(REQUEST_DISCONNECT, &[], &[]);
        self.obex_exchange(&request, self.config.timeouts.obex())?;

        let attempts = self.config.escape_attempts;
        let escape_timeout = self.config.timeouts.escape();
        let waiter = self.waiter;
        let mut escaped = false;
        for attempt in 1..=attempts {
            self.send(ESCAPE_SEQUENCE)?;
            let reply = waiter.wait_optional(
                &mut self.transport,
                Completion::ContainsText(OK_MARKER),
                escape_timeout,
            )?;
            if reply.is_some() {
                tracing::debug!("escape acknowledged on attempt {}", attempt);
                escaped = true;
                break;
            }
        }
        if !escaped {
            tracing::warn!("no OK after {} escape attempts", attempts);
        }
        self.send(&AtCommand::EchoOn.encode())?;
        self.wait_for_ok(self.config.timeouts.internal_at())?;
        self.mode = SessionMode::AtMode;
        Ok(())
    }

    /// Run a user AT command and return the module's full answer.
    pub fn execute_at(&mut self, command: &str) -> Result<String> {
        self.ensure_at()?;
        tracing::debug!("AT command: {}", command);
        self.send(&AtCodec::encode_command(command))?;
        let response = self.wait_for_ok(self.config.timeouts.at_command())?;
        Ok(response.to_latin1_string())
    }
}
