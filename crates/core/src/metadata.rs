use std::fs;
use std::path::Path;

use crate::error::{Result, XrefError};
use crate::PathId;

/// Parsed content of one metadata file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub subject: String,
    pub attributes: Vec<String>,
}

/// Result of reading a metadata file that exists and is readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Entry(MetadataEntry),
    Malformed(String),
}

/// Identifier embedded in a metadata filename: the part before the first `.`.
pub fn parse_real_index(file_name: &str) -> Option<PathId> {
    let head = file_name.split('.').next()?;
    if head.is_empty() || !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    head.parse().ok()
}

/// Reads a metadata file. I/O failures are errors; content problems come
/// back as [`ReadOutcome::Malformed`].
pub fn read_metadata(path: &Path) -> Result<ReadOutcome> {
    let bytes = fs::read(path).map_err(|err| XrefError::io_at(path, err))?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            return Ok(ReadOutcome::Malformed(format!(
                "invalid utf-8 at byte {}",
                err.utf8_error().valid_up_to()
            )))
        }
    };
    Ok(parse_metadata(&text))
}

pub fn parse_metadata(text: &str) -> ReadOutcome {
    let mut lines = text.lines().map(str::trim);
    let subject = match lines.next() {
        Some(line) if !line.is_empty() => line.to_string(),
        Some(_) => return ReadOutcome::Malformed("subject line is blank".to_string()),
        None => return ReadOutcome::Malformed("missing subject line".to_string()),
    };
    // blank lines are kept: an empty value is still an attribute line
    let attributes = lines.map(str::to_string).collect();
    ReadOutcome::Entry(MetadataEntry {
        subject,
        attributes,
    })
}
