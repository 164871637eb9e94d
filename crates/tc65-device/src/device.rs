//! The device session: one transport, one mode, one request at a time.

use std::time::Duration;

use tc65_at::{AtCodec, AtCommand, OK_MARKER, SYSSTART_MARKER};
use tc65_obex::{
    find_body, parse_folder_listing, response_code, validate, ByteBuffer, FileContent, FileEntry,
};

use crate::config::DeviceConfig;
use crate::error::{DeviceError, Result};
use crate::mode::SessionMode;
use crate::transfer::GetTarget;
use crate::transport::{SerialTransport, Transport};
use crate::waiter::{Completion, ResponseWaiter};

/// Probes sent by [`Device::init_device`], each of which must answer `OK`.
const INIT_SEQUENCE: [AtCommand; 5] = [
    AtCommand::Attention,
    AtCommand::EchoOff,
    AtCommand::Attention,
    AtCommand::Attention,
    AtCommand::Identify,
];

/// A session with a TC65 module.
///
/// The session starts in AT mode and switches lazily: file operations enter
/// OBEX mode, AT commands leave it. Operations take `&mut self`, so at most
/// one request is outstanding at any time.
#[derive(Debug)]
pub struct Device<T: Transport> {
    pub(crate) transport: T,
    pub(crate) mode: SessionMode,
    pub(crate) config: DeviceConfig,
    pub(crate) waiter: ResponseWaiter,
}

impl Device<SerialTransport> {
    /// Open the configured serial port and start a session in AT mode.
    pub fn connect(config: DeviceConfig) -> Result<Self> {
        config.validate()?;
        let transport =
            SerialTransport::open(&config.port, config.baud_rate, config.flow_control)?;
        Ok(Device::with_transport(transport, config))
    }
}

impl<T: Transport> Device<T> {
    /// Start a session over an already opened transport.
    pub fn with_transport(transport: T, config: DeviceConfig) -> Self {
        let waiter = ResponseWaiter::new(config.timeouts.poll_interval());
        Device {
            transport,
            mode: SessionMode::AtMode,
            config,
            waiter,
        }
    }

    /// Current session mode.
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Session configuration.
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Borrow the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Bring the module into a known AT state and return the `ATI` answer
    /// without echo and final result code, one line per identification field.
    pub fn init_device(&mut self) -> Result<String> {
        self.ensure_at()?;
        let mut ident = ByteBuffer::new();
        for cmd in &INIT_SEQUENCE {
            self.send(&cmd.encode())?;
            ident = self.wait_for_ok(self.config.timeouts.internal_at())?;
        }
        let mut codec = AtCodec::new();
        codec.push(ident.as_slice());
        let identify = AtCommand::Identify.to_command_string();
        let mut lines = Vec::new();
        while let Some(line) = codec.decode_line() {
            if line != OK_MARKER && line != identify {
                lines.push(line);
            }
        }
        let text = lines.join("\n");
        tracing::info!("module identification: {}", text);
        Ok(text)
    }

    /// Block until the module reports `^SYSSTART` or `timeout` passes.
    pub fn wait_for_sysstart(&mut self, timeout: Duration) -> Result<()> {
        tracing::info!("waiting for {} ({:?})", SYSSTART_MARKER, timeout);
        let waiter = ResponseWaiter::new(self.config.timeouts.sysstart_poll());
        waiter.wait_required(
            &mut self.transport,
            Completion::ContainsText(SYSSTART_MARKER),
            timeout,
        )?;
        Ok(())
    }

    /// List the current remote folder, folders first.
    pub fn list_folder(&mut self) -> Result<Vec<FileEntry>> {
        let body = self.get(GetTarget::FolderListing)?;
        Ok(parse_folder_listing(&body)?)
    }

    /// Change the current remote folder. Parent aliases go one level up.
    pub fn change_dir(&mut self, name: &str) -> Result<()> {
        self.set_path(name, false)
    }

    /// Download a file from the current remote folder.
    ///
    /// The returned entry carries the downloaded size; no timestamp is
    /// available from a GET.
    pub fn get_file(&mut self, name: &str) -> Result<FileContent> {
        let bytes = self.get(GetTarget::File(name))?;
        let size = u32::try_from(bytes.len())
            .map_err(|_| DeviceError::Format(format!("file {} too large", name)))?;
        Ok(FileContent::new(FileEntry::file(name, size, None), bytes))
    }

    /// Upload a file into the current remote folder.
    pub fn put_file(&mut self, content: &FileContent) -> Result<()> {
        let chunk_size = self.config.chunk_size;
        self.put(content, chunk_size)
    }

    /// Return to AT mode and release the transport.
    ///
    /// The transport is closed even when leaving OBEX mode fails; that
    /// failure is reported afterwards.
    pub fn disconnect(mut self) -> Result<()> {
        let teardown = if self.mode == SessionMode::ObexMode {
            self.ensure_at()
        } else {
            Ok(())
        };
        if let Err(e) = &teardown {
            tracing::warn!("leaving OBEX mode failed: {}", e);
        }
        let closed = self.transport.close();
        teardown?;
        closed?;
        Ok(())
    }

    // ========================================================================
    // Exchange helpers
    // ========================================================================

    pub(crate) fn send(&mut self, data: &[u8]) -> Result<()> {
        tracing::trace!("send: {}", ByteBuffer::from(data).to_hex_string());
        self.transport.write_all(data)?;
        Ok(())
    }

    /// Wait until the accumulated text contains `OK`.
    pub(crate) fn wait_for_ok(&mut self, timeout: Duration) -> Result<ByteBuffer> {
        self.wait_required(Completion::ContainsText(OK_MARKER), timeout)
    }

    /// Wait for a complete OBEX response frame and validate its code.
    pub(crate) fn receive_obex(&mut self, timeout: Duration) -> Result<(u8, ByteBuffer)> {
        let response = self.wait_required(Completion::ObexFrame, timeout)?;
        let code = response_code(response.as_slice())
            .ok_or_else(|| DeviceError::Format("empty OBEX response".to_string()))?;
        tracing::debug!("obex response 0x{:02X}, {} bytes", code, response.len());
        validate(code)?;
        Ok((code, response))
    }

    /// Send an OBEX request and return the validated response.
    pub(crate) fn obex_exchange(
        &mut self,
        request: &[u8],
        timeout: Duration,
    ) -> Result<(u8, ByteBuffer)> {
        tracing::debug!("obex request 0x{:02X}, {} bytes", request[0], request.len());
        self.send(request)?;
        self.receive_obex(timeout)
    }

    /// Body payload of a response, empty when it carries none.
    pub(crate) fn body_of(response: &ByteBuffer) -> &[u8] {
        find_body(response.as_slice()).unwrap_or(&[])
    }

    fn wait_required(&mut self, completion: Completion, timeout: Duration) -> Result<ByteBuffer> {
        let waiter = self.waiter;
        waiter.wait_required(&mut self.transport, completion, timeout)
    }
}
