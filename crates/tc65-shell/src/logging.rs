//! Log output setup for the binary.

use tracing_subscriber::EnvFilter;

use crate::error::{Result, ShellError};

/// How much the shell reports besides command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Nothing.
    None,
    /// Progress messages.
    #[default]
    Info,
    /// Protocol details.
    Debug,
}

impl Verbosity {
    /// Filter directive for this verbosity.
    pub fn directive(&self) -> &'static str {
        match self {
            Verbosity::None => "off",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
        }
    }
}

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `verbosity` when set.
pub fn init_logging(verbosity: Verbosity) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| ShellError::Logging(e.to_string()))
}
