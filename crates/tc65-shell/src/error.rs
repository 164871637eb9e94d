//! Shell errors.

use std::path::PathBuf;

use tc65_device::DeviceError;
use thiserror::Error;

/// Errors reported by the shell.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The device session failed.
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// Reading or writing a local file failed.
    #[error("local file {}", path.display())]
    LocalFile {
        /// Local path involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Front-end I/O failed.
    #[error("user interface error: {0}")]
    Ui(#[from] std::io::Error),

    /// The first word is not a shell command.
    #[error("unknown command '{0}', type 'help' for help")]
    UnknownCommand(String),

    /// A required argument is missing; holds its name.
    #[error("no {0} given")]
    MissingArgument(&'static str),

    /// Device names are plain names within the current folder.
    #[error("{0} must not be a path")]
    NotAFileName(String),

    /// An argument could not be parsed.
    #[error("invalid argument '{value}': {reason}")]
    InvalidArgument {
        /// Argument as typed.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The log subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl ShellError {
    pub(crate) fn local_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ShellError::LocalFile {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for shell operations.
pub type Result<T> = std::result::Result<T, ShellError>;
