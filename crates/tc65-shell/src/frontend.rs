//! Front-ends feeding commands to the shell.
//!
//! Every front-end yields one command line at a time until it is exhausted,
//! and receives the shell's output:
//!
//! | Front-end        | Source of commands              | Output         |
//! |------------------|---------------------------------|----------------|
//! | [`InteractiveUi`]| prompt on a reader (stdin)      | writer (stdout)|
//! | [`CommandFileUi`]| one command per line of a file  | stdout         |
//! | [`InlineUi`]     | `;`-separated command list      | stdout         |
//! | [`TelnetUi`]     | a single TCP client             | the client     |

use std::collections::VecDeque;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;

use crate::error::{Result, ShellError};

/// Telnet "interpret as command" byte.
const TELNET_IAC: u8 = 0xFF;

/// Source of commands and sink of output for the command loop.
pub trait UserInterface {
    /// Next command line, or `None` when the front-end is exhausted.
    fn read_command(&mut self) -> Option<String>;

    /// Show the command about to run.
    fn echo_command(&mut self, command: &str);

    /// Print a line of output.
    fn println(&mut self, message: &str);

    /// Print an error with its context.
    fn println_error(&mut self, message: &str, error: &dyn Error);
}

/// Render an error and its source chain on one line.
pub fn format_error(message: &str, error: &dyn Error) -> String {
    let mut text = format!("{}: {}", message, error);
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str(&format!(": {}", cause));
        source = cause.source();
    }
    text
}

// ============================================================================
// Interactive
// ============================================================================

/// Prompting front-end for a terminal.
pub struct InteractiveUi<R, W> {
    reader: R,
    writer: W,
    prompt: String,
}

impl InteractiveUi<io::StdinLock<'static>, io::Stdout> {
    /// Read from stdin, write to stdout.
    pub fn stdio() -> Self {
        InteractiveUi::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> InteractiveUi<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        InteractiveUi {
            reader,
            writer,
            prompt: "> ".to_string(),
        }
    }

    /// Consume the front-end and return its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> UserInterface for InteractiveUi<R, W> {
    fn read_command(&mut self) -> Option<String> {
        let _ = write!(self.writer, "{}", self.prompt);
        let _ = self.writer.flush();
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                tracing::warn!("reading command failed: {}", e);
                None
            }
        }
    }

    fn echo_command(&mut self, _command: &str) {}

    fn println(&mut self, message: &str) {
        let _ = writeln!(self.writer, "{}", message);
    }

    fn println_error(&mut self, message: &str, error: &dyn Error) {
        let _ = writeln!(self.writer, "{}", format_error(message, error));
    }
}

// ============================================================================
// Command file
// ============================================================================

/// Front-end reading one command per line from a file.
pub struct CommandFileUi<R> {
    lines: io::Lines<R>,
}

impl CommandFileUi<BufReader<File>> {
    /// Open `path` for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ShellError::local_file(path, e))?;
        Ok(CommandFileUi::new(BufReader::new(file)))
    }
}

impl<R: BufRead> CommandFileUi<R> {
    pub fn new(reader: R) -> Self {
        CommandFileUi {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> UserInterface for CommandFileUi<R> {
    fn read_command(&mut self) -> Option<String> {
        match self.lines.next()? {
            Ok(line) => Some(line.trim().to_string()),
            Err(e) => {
                tracing::warn!("reading command file failed: {}", e);
                None
            }
        }
    }

    fn echo_command(&mut self, command: &str) {
        println!("{}", command);
    }

    fn println(&mut self, message: &str) {
        println!("{}", message);
    }

    fn println_error(&mut self, message: &str, error: &dyn Error) {
        println!("{}", format_error(message, error));
    }
}

// ============================================================================
// Inline command list
// ============================================================================

/// Front-end running a `;`-separated list given on the command line.
#[derive(Debug, Clone, Default)]
pub struct InlineUi {
    commands: VecDeque<String>,
}

impl InlineUi {
    /// Split `list` on `;`, trimming and skipping empty entries.
    pub fn new(list: &str) -> Self {
        InlineUi {
            commands: list
                .split(';')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect(),
        }
    }

    /// Commands not yet read.
    pub fn remaining(&self) -> usize {
        self.commands.len()
    }
}

impl UserInterface for InlineUi {
    fn read_command(&mut self) -> Option<String> {
        self.commands.pop_front()
    }

    fn echo_command(&mut self, command: &str) {
        println!("{}", command);
    }

    fn println(&mut self, message: &str) {
        println!("{}", message);
    }

    fn println_error(&mut self, message: &str, error: &dyn Error) {
        println!("{}", format_error(message, error));
    }
}

// ============================================================================
// Telnet
// ============================================================================

/// Front-end serving a single TCP client, telnet style.
///
/// Output lines end with `\r\n`. The session ends when the client sends
/// `exit` or disconnects.
pub struct TelnetUi {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl TelnetUi {
    /// Listen on `port` (all interfaces) and wait for one client.
    pub fn listen(port: u16) -> Result<Self> {
        let listener = TcpListener::bind(("0.0.0.0", port))?;
        tracing::info!("waiting for telnet client on port {}", port);
        Self::accept(&listener)
    }

    /// Wait for one client on `listener`.
    pub fn accept(listener: &TcpListener) -> Result<Self> {
        let (stream, peer) = listener.accept()?;
        tracing::info!("telnet client connected from {}", peer);
        Self::from_stream(stream)
    }

    pub fn from_stream(stream: TcpStream) -> Result<Self> {
        let writer = stream.try_clone()?;
        let mut ui = TelnetUi {
            reader: BufReader::new(stream),
            writer,
        };
        ui.println("tc65sh ready, type 'help' for help, 'exit' to quit.");
        Ok(ui)
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.replace('\n', "\r\n").as_bytes())?;
        self.writer.write_all(b"\r\n")?;
        self.writer.flush()
    }
}

/// Drop telnet negotiation sequences (`IAC x y`) from a raw line.
fn strip_telnet_commands(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == TELNET_IAC {
            i += 3;
        } else {
            out.push(raw[i]);
            i += 1;
        }
    }
    out
}

impl UserInterface for TelnetUi {
    fn read_command(&mut self) -> Option<String> {
        let _ = self.writer.write_all(b"> ");
        let mut raw = Vec::new();
        match self.reader.read_until(b'\n', &mut raw) {
            Ok(0) => {
                tracing::info!("telnet client disconnected");
                None
            }
            Ok(_) => {
                let line = String::from_utf8_lossy(&strip_telnet_commands(&raw)).trim().to_string();
                if line == "exit" {
                    None
                } else {
                    Some(line)
                }
            }
            Err(e) => {
                tracing::warn!("telnet read failed: {}", e);
                None
            }
        }
    }

    fn echo_command(&mut self, command: &str) {
        tracing::info!("telnet command: {}", command);
    }

    fn println(&mut self, message: &str) {
        if let Err(e) = self.write_line(message) {
            tracing::warn!("telnet write failed: {}", e);
        }
    }

    fn println_error(&mut self, message: &str, error: &dyn Error) {
        let text = format_error(message, error);
        self.println(&text);
    }
}
