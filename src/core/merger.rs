/// String table CSV merger
///
/// This file rewrites `idx,string_value` lines as `idx,string_value,xrefs`,
/// using the map produced by the xrefs loader. Lines that do not start with an
/// integer index are carried through untouched.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, info};
use serde::Serialize;

use crate::core::errors::XrefError;
use crate::core::patterns::parse_index;
use crate::core::xrefs::XrefMap;
use crate::utils::file_utils::universal_lines;

/// Line terminator written after every output line
pub const LINE_TERMINATOR: &str = "\n";

/// A string table row with its cross-references attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    pub index: i64,
    /// Everything after the first comma, unparsed
    pub string_value: String,
    pub xref_text: String,
}

impl fmt::Display for CsvRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.index, self.string_value, self.xref_text)
    }
}

/// One line of merged output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergedLine {
    /// A row whose index parsed
    Merged(CsvRow),
    /// A line without a comma or without an integer index, kept byte for byte
    PassThrough(String),
}

impl fmt::Display for MergedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergedLine::Merged(row) => fmt::Display::fmt(row, f),
            MergedLine::PassThrough(line) => f.write_str(line),
        }
    }
}

/// Counters collected while merging
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    /// Entries in the xrefs map used for the merge
    pub xref_entries: usize,
    /// Lines read from the CSV, blank ones included
    pub lines_read: usize,
    pub blank_lines_dropped: usize,
    pub rows_merged: usize,
    pub rows_with_xrefs: usize,
    pub rows_without_xrefs: usize,
    pub passthrough_lines: usize,
}

impl MergeSummary {
    /// Number of lines written to the output
    pub fn lines_written(&self) -> usize {
        self.rows_merged + self.passthrough_lines
    }
}

/// Merge a single CSV line.
///
/// # Arguments
///
/// * `line` - The raw line; trailing `\r` and `\n` are ignored
/// * `xrefs` - Cross-references keyed by index
///
/// # Returns
///
/// `None` for a blank line, otherwise the line to emit
pub fn merge_line(line: &str, xrefs: &XrefMap) -> Option<MergedLine> {
    let line = line.trim_end_matches(['\n', '\r']);
    if line.is_empty() {
        return None;
    }

    let Some((index_part, string_value)) = line.split_once(',') else {
        return Some(MergedLine::PassThrough(line.to_string()));
    };

    match parse_index(index_part) {
        Some(index) => Some(MergedLine::Merged(CsvRow {
            index,
            string_value: string_value.to_string(),
            xref_text: xrefs.get(&index).cloned().unwrap_or_default(),
        })),
        None => Some(MergedLine::PassThrough(line.to_string())),
    }
}

/// Merge every line from `reader`, keeping input order.
///
/// `\r\n`, `\r` and `\n` all end a line.
pub fn merge_lines<R: Read>(reader: R, xrefs: &XrefMap) -> io::Result<(Vec<MergedLine>, MergeSummary)> {
    let text = io::read_to_string(reader)?;
    let mut lines = Vec::new();
    let mut summary = MergeSummary {
        xref_entries: xrefs.len(),
        ..MergeSummary::default()
    };

    for (line_number, line) in universal_lines(&text).enumerate() {
        summary.lines_read += 1;

        match merge_line(line, xrefs) {
            None => summary.blank_lines_dropped += 1,
            Some(MergedLine::Merged(row)) => {
                summary.rows_merged += 1;
                if row.xref_text.is_empty() {
                    summary.rows_without_xrefs += 1;
                } else {
                    summary.rows_with_xrefs += 1;
                }
                lines.push(MergedLine::Merged(row));
            }
            Some(passthrough) => {
                debug!("Passing through CSV line {} unchanged", line_number + 1);
                summary.passthrough_lines += 1;
                lines.push(passthrough);
            }
        }
    }

    Ok((lines, summary))
}

/// Write merged lines, terminating each one with [`LINE_TERMINATOR`].
pub fn write_lines<W: Write>(mut writer: W, lines: &[MergedLine]) -> io::Result<()> {
    for line in lines {
        write!(writer, "{}{}", line, LINE_TERMINATOR)?;
    }
    writer.flush()
}

/// Merge the CSV at `csv_path` into `output_path`.
///
/// The input is read completely and closed before the output is created, so
/// `output_path` may be the same file as `csv_path`.
pub fn merge_csv(csv_path: &Path, output_path: &Path, xrefs: &XrefMap) -> Result<MergeSummary, XrefError> {
    let (lines, summary) = {
        let file = File::open(csv_path).map_err(|e| XrefError::io(csv_path, e))?;
        merge_lines(file, xrefs).map_err(|e| XrefError::io(csv_path, e))?
    };

    let file = File::create(output_path).map_err(|e| XrefError::io(output_path, e))?;
    write_lines(BufWriter::new(file), &lines).map_err(|e| XrefError::io(output_path, e))?;

    info!(
        "Wrote {} lines to {} ({} with xrefs, {} passed through)",
        summary.lines_written(),
        output_path.display(),
        summary.rows_with_xrefs,
        summary.passthrough_lines
    );

    Ok(summary)
}

/// Rewrite the CSV at `csv_path` in place.
pub fn update_csv(csv_path: &Path, xrefs: &XrefMap) -> Result<MergeSummary, XrefError> {
    merge_csv(csv_path, csv_path, xrefs)
}
