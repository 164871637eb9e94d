//! Folder-listing parsing.
//!
//! A GET with the `x-obex/folder-listing` TYPE returns an XML document with
//! one element per line:
//!
//! ```text
//! <?xml version="1.0"?>
//! <!DOCTYPE folder-listing SYSTEM "obex-folder-listing.dtd">
//! <folder-listing version="1.0">
//! <folder name="docs" modified="20020101T001650"/>
//! <file name="a.txt" size="10" modified="20020101T001650"/>
//! </folder-listing>
//! ```
//!
//! The module's output is regular enough that a line scanner suffices.

use crate::buffer::ByteBuffer;
use crate::error::{ObexError, ObexResult};
use crate::time::decode_xml_datetime;
use crate::types::FileEntry;

const FILE_PREFIX: &str = "<file ";
const FOLDER_PREFIX: &str = "<folder ";

/// Parse a folder-listing body into entries, folders first and sorted by name.
pub fn parse_folder_listing(body: &ByteBuffer) -> ObexResult<Vec<FileEntry>> {
    parse_folder_listing_str(&body.to_latin1_string())
}

/// Parse folder-listing text. See [`parse_folder_listing`].
pub fn parse_folder_listing_str(xml: &str) -> ObexResult<Vec<FileEntry>> {
    let mut entries = Vec::new();
    for line in xml.split('\n') {
        if let Some(entry) = parse_listing_line(line.trim())? {
            entries.push(entry);
        }
    }
    entries.sort();
    log::debug!("parsed {} folder-listing entries", entries.len());
    Ok(entries)
}

/// Parse one trimmed line. Lines that are not `<file …>` or `<folder …>`
/// elements yield `Ok(None)`.
fn parse_listing_line(line: &str) -> ObexResult<Option<FileEntry>> {
    let is_directory = if line.starts_with(FILE_PREFIX) {
        false
    } else if line.starts_with(FOLDER_PREFIX) {
        true
    } else {
        return Ok(None);
    };

    let name = extract_attribute(line, "name").ok_or_else(|| ObexError::MissingAttribute {
        attribute: "name",
        line: line.to_string(),
    })?;

    let modified = extract_attribute(line, "modified")
        .map(decode_xml_datetime)
        .transpose()?;

    let size = if is_directory {
        None
    } else {
        extract_attribute(line, "size")
            .map(|s| s.parse::<u32>().map_err(|_| ObexError::InvalidSize(s.to_string())))
            .transpose()?
    };

    Ok(Some(FileEntry {
        is_directory,
        name: Some(name.to_string()),
        size,
        modified,
    }))
}

/// Value of `attr="…"` in `line`, if present and closed.
fn extract_attribute<'a>(line: &'a str, attr: &str) -> Option<&'a str> {
    let pattern = format!("{}=\"", attr);
    let start = find_attribute_start(line, &pattern)? + pattern.len();
    let len = line[start..].find('"')?;
    Some(&line[start..start + len])
}

/// Position of `pattern` where it begins a whole attribute name, so that
/// `name="` does not match inside `filename="`.
fn find_attribute_start(line: &str, pattern: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(pos) = line[from..].find(pattern) {
        let abs = from + pos;
        let preceded_by_space = line[..abs]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace);
        if preceded_by_space {
            return Some(abs);
        }
        from = abs + pattern.len();
    }
    None
}
