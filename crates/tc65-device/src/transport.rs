//! Byte transports carrying the AT/OBEX session.

use std::io::{self, Read, Write};
use std::time::Duration;

use serialport::{DataBits, Parity, SerialPort, StopBits};

use crate::config::FlowControl;

/// Read/write timeout configured on the serial port.
pub const SERIAL_TIMEOUT: Duration = Duration::from_millis(2000);

/// A bidirectional byte stream to the module.
///
/// Reads never block: `read_available` returns whatever has arrived,
/// possibly nothing.
pub trait Transport {
    /// Return all bytes currently available, or an empty vector.
    fn read_available(&mut self) -> io::Result<Vec<u8>>;

    /// Write all of `data`.
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Release the underlying channel. Further reads and writes fail.
    fn close(&mut self) -> io::Result<()>;
}

impl From<FlowControl> for serialport::FlowControl {
    fn from(fc: FlowControl) -> Self {
        match fc {
            FlowControl::None => serialport::FlowControl::None,
            FlowControl::RtsCts => serialport::FlowControl::Hardware,
            FlowControl::XonXoff => serialport::FlowControl::Software,
        }
    }
}

/// Serial port transport (8N1).
pub struct SerialTransport {
    port: Option<Box<dyn SerialPort>>,
    name: String,
}

impl SerialTransport {
    /// Open `name` at `baud_rate` with 8 data bits, 1 stop bit and no parity.
    pub fn open(name: &str, baud_rate: u32, flow_control: FlowControl) -> io::Result<Self> {
        tracing::info!("opening {} at {} baud, flow control {}", name, baud_rate, flow_control);
        let port = serialport::new(name, baud_rate)
            .data_bits(DataBits::Eight)
            .stop_bits(StopBits::One)
            .parity(Parity::None)
            .flow_control(flow_control.into())
            .timeout(SERIAL_TIMEOUT)
            .open()
            .map_err(io::Error::from)?;
        Ok(SerialTransport {
            port: Some(port),
            name: name.to_string(),
        })
    }

    /// Name of the underlying port.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn port(&mut self) -> io::Result<&mut Box<dyn SerialPort>> {
        self.port
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "serial port closed"))
    }
}

impl Transport for SerialTransport {
    fn read_available(&mut self) -> io::Result<Vec<u8>> {
        let port = self.port()?;
        let pending = port.bytes_to_read().map_err(io::Error::from)? as usize;
        if pending == 0 {
            return Ok(Vec::new());
        }
        let mut buf = vec![0u8; pending];
        let n = port.read(&mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        let port = self.port()?;
        Write::write_all(port, data)?;
        port.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        if self.port.take().is_some() {
            tracing::info!("closed {}", self.name);
        }
        Ok(())
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("name", &self.name)
            .field("open", &self.port.is_some())
            .finish()
    }
}
