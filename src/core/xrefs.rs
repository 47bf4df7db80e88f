/// StringPool cross-reference loader
///
/// Reads the `idx|xref1 xref2 ...` text produced by the StringPool analysis
/// into a map keyed by string-table index.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use log::{debug, info};

use crate::core::errors::XrefError;
use crate::core::patterns::parse_index;
use crate::utils::file_utils::universal_lines;

/// Cross-reference text keyed by string-table index
pub type XrefMap = HashMap<i64, String>;

/// One record of the xrefs file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XrefEntry {
    /// String-table index
    pub index: i64,
    /// Raw cross-reference text, kept as written
    pub xref_text: String,
}

impl XrefEntry {
    /// Parse a single xrefs line.
    ///
    /// The line is trimmed and split at the first `|`. Returns `None` for
    /// empty lines, lines without a `|`, and lines whose index is not an integer.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (index_part, xref_part) = line.split_once('|')?;
        let index = parse_index(index_part)?;

        Some(Self {
            index,
            xref_text: xref_part.to_string(),
        })
    }
}

/// Parse xrefs records from any reader.
///
/// `\r\n`, `\r` and `\n` all end a line. Later records for the same index
/// replace earlier ones.
pub fn parse_xrefs<R: Read>(reader: R) -> io::Result<XrefMap> {
    let text = io::read_to_string(reader)?;
    let mut xrefs = XrefMap::new();

    for (line_number, line) in universal_lines(&text).enumerate() {
        match XrefEntry::parse(line) {
            Some(entry) => {
                if xrefs.insert(entry.index, entry.xref_text).is_some() {
                    debug!("Duplicate xrefs for idx {} at line {}, keeping the later one", entry.index, line_number + 1);
                }
            }
            None => {
                if !line.trim().is_empty() {
                    debug!("Skipping malformed xrefs line {}", line_number + 1);
                }
            }
        }
    }

    Ok(xrefs)
}

/// Load the xrefs file at `xrefs_path`.
///
/// Existence is not checked here; an unreadable path comes back as [`XrefError::Io`].
pub fn load_xrefs(xrefs_path: &Path) -> Result<XrefMap, XrefError> {
    let file = File::open(xrefs_path).map_err(|e| XrefError::io(xrefs_path, e))?;
    let xrefs = parse_xrefs(file).map_err(|e| XrefError::io(xrefs_path, e))?;

    info!("Loaded {} xrefs entries from {}", xrefs.len(), xrefs_path.display());
    Ok(xrefs)
}
