//! File types shared between the codec, the device session and the shell.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;

use crate::buffer::ByteBuffer;

/// An entry of a folder listing, or the description of a local file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileEntry {
    /// Whether the entry is a folder.
    pub is_directory: bool,
    /// Entry name (never `None` for entries produced by the listing parser).
    pub name: Option<String>,
    /// Size in bytes, files only.
    pub size: Option<u32>,
    /// Last modification time.
    pub modified: Option<NaiveDateTime>,
}

impl FileEntry {
    /// Describe a plain file.
    pub fn file(name: impl Into<String>, size: u32, modified: Option<NaiveDateTime>) -> Self {
        FileEntry {
            is_directory: false,
            name: Some(name.into()),
            size: Some(size),
            modified,
        }
    }

    /// Describe a folder.
    pub fn directory(name: impl Into<String>, modified: Option<NaiveDateTime>) -> Self {
        FileEntry {
            is_directory: true,
            name: Some(name.into()),
            size: None,
            modified,
        }
    }

    /// The entry name, or an empty string.
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Folders first, then ascending by name.
impl Ord for FileEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .is_directory
            .cmp(&self.is_directory)
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.size.cmp(&other.size))
            .then_with(|| self.modified.cmp(&other.modified))
    }
}

impl PartialOrd for FileEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Listing-style rendering: timestamp, `<DIR>` or right-aligned size, name.
impl fmt::Display for FileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.modified {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))?,
            None => f.write_str("????-??-?? ??:??:??")?,
        }
        if self.is_directory {
            f.write_str(" <DIR>     ")?;
        } else {
            match self.size {
                Some(size) => write!(f, " {:>10}", size)?,
                None => write!(f, " {:>10}", "")?,
            }
        }
        write!(f, "   {}", self.name_or_empty())
    }
}

/// A file's description together with its contents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileContent {
    /// File description.
    pub info: FileEntry,
    /// File contents.
    pub bytes: ByteBuffer,
}

impl FileContent {
    /// Pair a description with its contents.
    pub fn new(info: FileEntry, bytes: ByteBuffer) -> Self {
        FileContent { info, bytes }
    }
}
