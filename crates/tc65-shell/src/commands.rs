//! Shell commands and the command loop.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tc65_at::AtCommand;
use tc65_device::{Device, DeviceError, Transport};

use crate::error::{Result, ShellError};
use crate::frontend::UserInterface;
use crate::local::{extract_filename, is_file_name, load_local_file, save_local_file};
use crate::tokenizer::split_command;

const HELP: &[&str] = &[
    "available commands:",
    "  at<command>, e.g. at^scfg? shows current device settings",
    "  cd <directory>",
    "  mkdir <directory>",
    "  dir (or ls)",
    "  put <localFilepath> <optional: deviceFilename>",
    "  get <deviceFilename> <optional: localFilepath>",
    "  getd <deviceDirectory> <optional: localDirectory>",
    "  cat <deviceFilename>",
    "  rm (or del) <deviceFilename>",
    "  erasedisk (Attention!! Clears all content!!)",
    "  sleep <milliseconds>",
    "  help",
    "  exit",
];

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Raw AT command line.
    At(String),
    /// Change the current remote folder.
    ChangeDir(String),
    /// Create a remote folder.
    MakeDir(String),
    /// List the current remote folder.
    List,
    /// Delete a remote file.
    Remove(String),
    /// Upload a local file, replacing the remote one.
    Put {
        local: String,
        remote: String,
    },
    /// Download a remote file.
    Get {
        remote: String,
        local: String,
    },
    /// Recursive download of a remote folder.
    GetDir {
        remote: String,
        local: String,
    },
    /// Print a remote file as text.
    Cat(String),
    /// Erase the whole remote file system.
    EraseDisk,
    /// Pause before the next command.
    Sleep(Duration),
    /// Print the command summary.
    Help,
    /// Leave the command loop.
    Exit,
}

/// Require `name` to be a plain device name.
fn device_name(name: &str) -> Result<String> {
    if is_file_name(name) {
        Ok(name.to_string())
    } else {
        Err(ShellError::NotAFileName(name.to_string()))
    }
}

fn argument<'a>(args: &'a [String], index: usize, what: &'static str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or(ShellError::MissingArgument(what))
}

impl Command {
    /// Parse a trimmed command line.
    ///
    /// Empty lines and comments (`#…`, `//…`) yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            return Ok(None);
        }
        if AtCommand::is_at_line(line) {
            return Ok(Some(Command::At(line.to_string())));
        }

        let words = split_command(line);
        let Some((name, args)) = words.split_first() else {
            return Ok(None);
        };
        let arg = |i: usize, what: &'static str| argument(args, i, what);

        let command = match name.as_str() {
            "cd" => Command::ChangeDir(device_name(arg(0, "directory")?)?),
            "mkdir" => Command::MakeDir(device_name(arg(0, "directory")?)?),
            "ls" | "dir" => Command::List,
            "rm" | "del" => Command::Remove(device_name(arg(0, "deviceFilename")?)?),
            "put" => {
                let local = arg(0, "localFilePath")?;
                let remote = args
                    .get(1)
                    .map(String::as_str)
                    .unwrap_or_else(|| extract_filename(local));
                if remote.is_empty() {
                    return Err(ShellError::MissingArgument("deviceFilename"));
                }
                Command::Put {
                    local: local.to_string(),
                    remote: device_name(remote)?,
                }
            }
            "get" => {
                let remote = device_name(arg(0, "deviceFilename")?)?;
                let local = args.get(1).cloned().unwrap_or_else(|| remote.clone());
                Command::Get { remote, local }
            }
            "getd" => {
                let remote = device_name(arg(0, "deviceDirectory")?)?;
                let local = args.get(1).cloned().unwrap_or_else(|| remote.clone());
                Command::GetDir { remote, local }
            }
            "cat" => Command::Cat(device_name(arg(0, "deviceFilename")?)?),
            "erasedisk" => Command::EraseDisk,
            "sleep" => {
                let value = arg(0, "milliseconds")?;
                let millis = value.parse::<u64>().map_err(|e| ShellError::InvalidArgument {
                    value: value.to_string(),
                    reason: e.to_string(),
                })?;
                Command::Sleep(Duration::from_millis(millis))
            }
            "help" => Command::Help,
            "exit" | "quit" => Command::Exit,
            other => return Err(ShellError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// Whether the loop continues after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command.
    Continue,
    /// Stop reading commands.
    Exit,
}

/// Run one command against the device.
pub fn execute<T: Transport>(
    device: &mut Device<T>,
    ui: &mut dyn UserInterface,
    command: &Command,
) -> Result<Flow> {
    tracing::debug!("executing {:?}", command);
    match command {
        Command::At(line) => {
            let response = device.execute_at(line)?;
            ui.println(response.trim());
        }
        Command::ChangeDir(dir) => device.change_dir(dir)?,
        Command::MakeDir(dir) => device.make_dir(dir)?,
        Command::List => {
            for entry in device.list_folder()? {
                ui.println(&entry.to_string());
            }
        }
        Command::Remove(name) => device.delete(name)?,
        Command::Put { local, remote } => {
            let mut content = load_local_file(local)?;
            content.info.name = Some(remote.clone());
            // Replace an existing file; a missing one is not an error.
            match device.delete(remote) {
                Ok(()) | Err(DeviceError::Protocol { .. }) => {}
                Err(e) => return Err(e.into()),
            }
            device.put_file(&content)?;
        }
        Command::Get { remote, local } => {
            let content = device.get_file(remote)?;
            save_local_file(Path::new(local), &content.bytes)?;
        }
        Command::GetDir { remote, local } => {
            get_directory(device, ui, remote, Path::new(local))?;
        }
        Command::Cat(name) => {
            let content = device.get_file(name)?;
            ui.println(&String::from_utf8_lossy(content.bytes.as_slice()));
        }
        Command::EraseDisk => device.erase_disk()?,
        Command::Sleep(duration) => thread::sleep(*duration),
        Command::Help => {
            for line in HELP {
                ui.println(line);
            }
        }
        Command::Exit => return Ok(Flow::Exit),
    }
    Ok(Flow::Continue)
}

/// Download remote folder `remote` into `local`: files first, then each
/// subfolder recursively. The current remote folder is restored afterwards.
pub fn get_directory<T: Transport>(
    device: &mut Device<T>,
    ui: &mut dyn UserInterface,
    remote: &str,
    local: &Path,
) -> Result<()> {
    device.change_dir(remote)?;
    let copied = copy_current_folder(device, ui, local);
    let back = device.change_dir("..");
    copied?;
    back?;
    Ok(())
}

fn copy_current_folder<T: Transport>(
    device: &mut Device<T>,
    ui: &mut dyn UserInterface,
    local: &Path,
) -> Result<()> {
    let listing = device.list_folder()?;
    fs::create_dir_all(local).map_err(|e| ShellError::local_file(local, e))?;

    for entry in listing.iter().filter(|e| !e.is_directory) {
        let name = entry.name_or_empty();
        ui.println(&format!("Copying {} to {}", name, local.display()));
        let content = device.get_file(name)?;
        save_local_file(&local.join(name), &content.bytes)?;
    }
    for entry in listing.iter().filter(|e| e.is_directory) {
        let name = entry.name_or_empty();
        let sub: PathBuf = local.join(name);
        get_directory(device, ui, name, &sub)?;
    }
    Ok(())
}

/// Read and run commands until the front-end is exhausted or `exit`.
///
/// Failing commands are reported through the front-end and the loop goes on.
pub fn run_command_loop<T: Transport>(device: &mut Device<T>, ui: &mut dyn UserInterface) {
    while let Some(line) = ui.read_command() {
        let line = line.trim();
        ui.echo_command(line);
        let result = Command::parse(line).and_then(|command| match command {
            Some(command) => execute(device, ui, &command),
            None => Ok(Flow::Continue),
        });
        match result {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(e) => {
                tracing::debug!("command '{}' failed: {:?}", line, e);
                ui.println_error("Error", &e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_comments_and_blank_lines() {
        assert!(Command::parse("").unwrap().is_none());
        assert!(Command::parse("# comment").unwrap().is_none());
        assert!(Command::parse("// comment").unwrap().is_none());
    }

    #[test]
    fn test_at_passthrough() {
        assert_eq!(parse("at^scfg?"), Command::At("at^scfg?".to_string()));
        assert_eq!(parse("AT+CSQ"), Command::At("AT+CSQ".to_string()));
    }

    #[test]
    fn test_file_commands() {
        assert_eq!(parse("ls"), Command::List);
        assert_eq!(parse("dir"), Command::List);
        assert_eq!(parse("cd .."), Command::ChangeDir("..".to_string()));
        assert_eq!(parse("del a.txt"), Command::Remove("a.txt".to_string()));
        assert_eq!(
            parse("put /tmp/build/app.jar"),
            Command::Put {
                local: "/tmp/build/app.jar".to_string(),
                remote: "app.jar".to_string(),
            }
        );
        assert_eq!(
            parse("get \"my log.txt\" out.txt"),
            Command::Get {
                remote: "my log.txt".to_string(),
                local: "out.txt".to_string(),
            }
        );
        assert_eq!(
            parse("getd logs"),
            Command::GetDir {
                remote: "logs".to_string(),
                local: "logs".to_string(),
            }
        );
        assert_eq!(parse("sleep 250"), Command::Sleep(Duration::from_millis(250)));
        assert_eq!(parse("quit"), Command::Exit);
    }

    #[test]
    fn test_rejects_paths_for_device_names() {
        assert!(matches!(Command::parse("cd a/b"), Err(ShellError::NotAFileName(_))));
        assert!(matches!(Command::parse("put x.txt a\\b"), Err(ShellError::NotAFileName(_))));
        assert!(matches!(Command::parse("cat /etc"), Err(ShellError::NotAFileName(_))));
    }

    #[test]
    fn test_argument_errors() {
        assert!(matches!(Command::parse("mkdir"), Err(ShellError::MissingArgument("directory"))));
        assert!(matches!(Command::parse("sleep soon"), Err(ShellError::InvalidArgument { .. })));
        assert!(matches!(Command::parse("format"), Err(ShellError::UnknownCommand(_))));
    }
}
