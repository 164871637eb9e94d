//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use tc65_device::{DeviceConfig, FlowControl};

use crate::error::Result;
use crate::logging::Verbosity;

/// Shell for the TC65 module's flash file system and AT channel.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "tc65sh", version)]
#[command(about = "Shell for the Cinterion TC65 file system and AT channel")]
pub struct Args {
    /// Serial port (COM1, COM2, .. on windows, /dev/ttyS0 or similar on linux)
    #[arg(short = 'p', long = "portname")]
    pub port: Option<String>,

    /// Baud rate
    #[arg(short = 'b', long = "baudrate")]
    pub baud_rate: Option<u32>,

    /// Flow control: n (none), r (rtscts) or x (xonxoff)
    #[arg(long = "flowcontrol", visible_alias = "fc")]
    pub flow_control: Option<FlowControl>,

    /// Seconds to wait for ^SYSSTART after connecting (0 = don't wait)
    #[arg(short = 'w', long = "wait", default_value_t = 0)]
    pub wait_secs: u64,

    /// Debug output
    #[arg(short = 'd', long = "debug", conflicts_with = "quiet")]
    pub debug: bool,

    /// Say (almost) nothing
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Timeout for AT commands in milliseconds
    #[arg(long = "at-timeout")]
    pub at_timeout_ms: Option<u64>,

    /// Timeout for OBEX responses in milliseconds
    #[arg(long = "obex-timeout")]
    pub obex_timeout_ms: Option<u64>,

    /// Read commands from a file instead of the terminal
    #[arg(short = 'f', long = "file", conflicts_with_all = ["commands", "telnet_port"])]
    pub command_file: Option<PathBuf>,

    /// Run the given commands, separated by ';' (e.g. "mkdir tmp;cd tmp;put test.txt")
    #[arg(short = 'c', long = "commands", conflicts_with = "telnet_port")]
    pub commands: Option<String>,

    /// Read commands from a telnet client on this TCP port
    #[arg(short = 't', long = "telnet")]
    pub telnet_port: Option<u16>,

    /// YAML file with port settings and timeouts; flags override it
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::None
        } else if self.debug {
            Verbosity::Debug
        } else {
            Verbosity::Info
        }
    }

    /// Session configuration: the config file (or defaults) with flags applied.
    pub fn device_config(&self) -> Result<DeviceConfig> {
        let mut config = match &self.config {
            Some(path) => DeviceConfig::from_yaml_file(path)?,
            None => DeviceConfig::default(),
        };
        if let Some(port) = &self.port {
            config.port = port.clone();
        }
        if let Some(baud_rate) = self.baud_rate {
            config.baud_rate = baud_rate;
        }
        if let Some(flow_control) = self.flow_control {
            config.flow_control = flow_control;
        }
        if let Some(ms) = self.at_timeout_ms {
            config.timeouts.at_command_ms = ms;
        }
        if let Some(ms) = self.obex_timeout_ms {
            config.timeouts.obex_ms = ms;
        }
        config.validate()?;
        Ok(config)
    }
}
