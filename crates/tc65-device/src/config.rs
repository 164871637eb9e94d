//! Session configuration.
//!
//! Every field has a default matching the module's factory behaviour, so an
//! empty YAML document is a valid configuration:
//!
//! ```yaml
//! port: /dev/ttyUSB0
//! baud_rate: 115200
//! flow_control: rtscts
//! timeouts:
//!   at_command_ms: 15000
//!   obex_ms: 5000
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DeviceError, Result};

/// Default serial port name.
#[cfg(unix)]
pub const DEFAULT_PORT: &str = "/dev/ttyS0";
/// Default serial port name.
#[cfg(not(unix))]
pub const DEFAULT_PORT: &str = "COM1";

/// Default baud rate.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default PUT chunk size in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// Default number of `+++` attempts when leaving OBEX mode.
pub const DEFAULT_ESCAPE_ATTEMPTS: u32 = 5;

/// Serial flow control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowControl {
    /// No flow control.
    None,
    /// Hardware RTS/CTS.
    #[default]
    RtsCts,
    /// Software XON/XOFF.
    XonXoff,
}

impl FromStr for FlowControl {
    type Err = DeviceError;

    /// Accepts the single letters `n`, `r`, `x` as well as the full names.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "n" | "none" => Ok(FlowControl::None),
            "r" | "rtscts" => Ok(FlowControl::RtsCts),
            "x" | "xonxoff" => Ok(FlowControl::XonXoff),
            other => Err(DeviceError::Config(format!("invalid flow control '{}'", other))),
        }
    }
}

impl fmt::Display for FlowControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowControl::None => f.write_str("none"),
            FlowControl::RtsCts => f.write_str("rtscts"),
            FlowControl::XonXoff => f.write_str("xonxoff"),
        }
    }
}

/// Wait deadlines and polling quanta, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Internal AT commands (mode switch, init, `ATE1`).
    pub internal_at_ms: u64,
    /// User AT commands.
    pub at_command_ms: u64,
    /// OBEX responses.
    pub obex_ms: u64,
    /// Erase-disk response, which takes long on the module side.
    pub erase_disk_ms: u64,
    /// Each `+++` escape attempt.
    pub escape_ms: u64,
    /// Sleep between polls when nothing was read.
    pub poll_interval_ms: u64,
    /// Sleep between polls while waiting for `^SYSSTART`.
    pub sysstart_poll_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Timeouts {
            internal_at_ms: 5_000,
            at_command_ms: 15_000,
            obex_ms: 5_000,
            erase_disk_ms: 20_000,
            escape_ms: 1_000,
            poll_interval_ms: 10,
            sysstart_poll_ms: 100,
        }
    }
}

impl Timeouts {
    /// Internal AT deadline.
    pub fn internal_at(&self) -> Duration {
        Duration::from_millis(self.internal_at_ms)
    }

    /// User AT deadline.
    pub fn at_command(&self) -> Duration {
        Duration::from_millis(self.at_command_ms)
    }

    /// OBEX deadline.
    pub fn obex(&self) -> Duration {
        Duration::from_millis(self.obex_ms)
    }

    /// Erase-disk deadline.
    pub fn erase_disk(&self) -> Duration {
        Duration::from_millis(self.erase_disk_ms)
    }

    /// Escape attempt deadline.
    pub fn escape(&self) -> Duration {
        Duration::from_millis(self.escape_ms)
    }

    /// Poll quantum.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// SYSSTART poll quantum.
    pub fn sysstart_poll(&self) -> Duration {
        Duration::from_millis(self.sysstart_poll_ms)
    }
}

/// Configuration of a device session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Serial port name.
    pub port: String,
    /// Baud rate.
    pub baud_rate: u32,
    /// Flow control.
    pub flow_control: FlowControl,
    /// Wait deadlines.
    pub timeouts: Timeouts,
    /// Number of `+++` attempts when leaving OBEX mode.
    pub escape_attempts: u32,
    /// PUT chunk size in bytes.
    pub chunk_size: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            flow_control: FlowControl::default(),
            timeouts: Timeouts::default(),
            escape_attempts: DEFAULT_ESCAPE_ATTEMPTS,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl DeviceConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: DeviceConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| DeviceError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&text)
    }

    /// Reject values the session cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.chunk_size > usize::from(u16::MAX) - 512 {
            return Err(DeviceError::Config(format!("chunk_size {} out of range", self.chunk_size)));
        }
        if self.baud_rate == 0 {
            return Err(DeviceError::Config("baud_rate must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DeviceConfig::default();
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.flow_control, FlowControl::RtsCts);
        assert_eq!(config.timeouts.internal_at(), Duration::from_millis(5000));
        assert_eq!(config.timeouts.at_command(), Duration::from_millis(15000));
        assert_eq!(config.timeouts.erase_disk(), Duration::from_millis(20000));
        assert_eq!(config.escape_attempts, 5);
        assert_eq!(config.chunk_size, 512);
    }

    #[test]
    fn test_partial_yaml() {
        let config = DeviceConfig::from_yaml_str(
            "port: /dev/ttyUSB1\nflow_control: none\ntimeouts:\n  obex_ms: 8000\n",
        )
        .unwrap();
        assert_eq!(config.port, "/dev/ttyUSB1");
        assert_eq!(config.flow_control, FlowControl::None);
        assert_eq!(config.timeouts.obex_ms, 8000);
        assert_eq!(config.timeouts.at_command_ms, 15000);
        assert_eq!(config.chunk_size, 512);
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            DeviceConfig::from_yaml_str("flow_control: sideways\n"),
            Err(DeviceError::Config(_))
        ));
        assert!(matches!(
            DeviceConfig::from_yaml_str("chunk_size: 0\n"),
            Err(DeviceError::Config(_))
        ));
    }

    #[test]
    fn test_flow_control_parsing() {
        assert_eq!("n".parse::<FlowControl>().unwrap(), FlowControl::None);
        assert_eq!("R".parse::<FlowControl>().unwrap(), FlowControl::RtsCts);
        assert_eq!("xonxoff".parse::<FlowControl>().unwrap(), FlowControl::XonXoff);
        assert!("q".parse::<FlowControl>().is_err());
        assert_eq!(FlowControl::XonXoff.to_string(), "xonxoff");
    }
}
