//! Local file system helpers.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use tc65_obex::{ByteBuffer, FileContent, FileEntry};

use crate::error::{Result, ShellError};

/// Last component of `path`, accepting both `/` and `\` as separators.
pub fn extract_filename(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(i) => &path[i + 1..],
        None => path,
    }
}

/// Whether `name` is a plain name without any path separator.
pub fn is_file_name(name: &str) -> bool {
    !name.contains(['/', '\\'])
}

/// Read a local file into memory, named after its last path component and
/// stamped with its modification time.
pub fn load_local_file(path: &str) -> Result<FileContent> {
    let bytes = fs::read(path).map_err(|e| ShellError::local_file(path, e))?;
    let size = u32::try_from(bytes.len()).map_err(|_| ShellError::InvalidArgument {
        value: path.to_string(),
        reason: "file too large".to_string(),
    })?;
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(|t| DateTime::<Local>::from(t).naive_local());
    tracing::debug!("loaded {} ({} bytes)", path, size);
    Ok(FileContent::new(
        FileEntry::file(extract_filename(path), size, modified),
        ByteBuffer::from(bytes),
    ))
}

/// Write `content` to `path`, replacing any existing file.
pub fn save_local_file(path: &Path, content: &ByteBuffer) -> Result<()> {
    fs::write(path, content.as_slice()).map_err(|e| ShellError::local_file(path, e))?;
    tracing::debug!("saved {} ({} bytes)", path.display(), content.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_filename() {
        assert_eq!(extract_filename("a.txt"), "a.txt");
        assert_eq!(extract_filename("/tmp/x/a.txt"), "a.txt");
        assert_eq!(extract_filename("C:\\jar\\app.jad"), "app.jad");
        assert_eq!(extract_filename("dir/"), "");
    }

    #[test]
    fn test_is_file_name() {
        assert!(is_file_name("a.txt"));
        assert!(is_file_name(".."));
        assert!(!is_file_name("a/b"));
        assert!(!is_file_name("a\\b"));
    }

    #[test]
    fn test_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("hello.txt");
        fs::write(&src, b"hello").unwrap();

        let content = load_local_file(src.to_str().unwrap()).unwrap();
        assert_eq!(content.info.name.as_deref(), Some("hello.txt"));
        assert_eq!(content.info.size, Some(5));
        assert!(content.info.modified.is_some());
        assert_eq!(content.bytes.as_slice(), b"hello");

        let dst = dir.path().join("copy.txt");
        save_local_file(&dst, &content.bytes).unwrap();
        assert_eq!(fs::read(&dst).unwrap(), b"hello");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            load_local_file(missing.to_str().unwrap()),
            Err(ShellError::LocalFile { .. })
        ));
    }
}
