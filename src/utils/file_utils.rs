/// File layout and text utilities
///
/// This module resolves where the updater looks for its inputs, checks
/// that they are present before any work starts, and splits their text into lines.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use crate::core::errors::XrefError;

/// File name of the StringPool analysis output
pub const XREFS_FILE_NAME: &str = "stringpool_xrefs.txt";

/// Directory, relative to the repository root, holding the string table
pub const RESOURCES_DIR: &str = "resources";

/// File name of the string table CSV
pub const CSV_FILE_NAME: &str = "string.csv";

/// Shown when the xrefs file has not been copied into place yet
pub const XREFS_MISSING_HINT: &str =
    "Please copy stringpool_xrefs.txt from the StringPool analysis output to this directory";

/// Directory containing the running executable.
pub fn tool_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    let dir = exe
        .parent()
        .map(Path::to_path_buf)
        .with_context(|| format!("Executable path has no parent: {}", exe.display()))?;

    debug!("Resolved tool directory: {}", dir.display());
    Ok(dir)
}

/// Repository root for a tool directory: its parent, or the directory itself at a filesystem root
pub fn repo_dir(tool_dir: &Path) -> &Path {
    tool_dir.parent().unwrap_or(tool_dir)
}

/// Default xrefs location: next to the tool
pub fn default_xrefs_path(tool_dir: &Path) -> PathBuf {
    tool_dir.join(XREFS_FILE_NAME)
}

/// Default CSV location: `resources/string.csv` under the repository root
pub fn default_csv_path(tool_dir: &Path) -> PathBuf {
    repo_dir(tool_dir).join(RESOURCES_DIR).join(CSV_FILE_NAME)
}

/// Check that a required input exists.
///
/// # Arguments
///
/// * `path` - Path to check
/// * `hint` - Guidance to attach if it is missing
///
/// # Returns
///
/// [`XrefError::MissingFile`] if nothing exists at `path`
pub fn ensure_exists(path: &Path, hint: Option<&str>) -> std::result::Result<(), XrefError> {
    if path.exists() {
        Ok(())
    } else {
        Err(XrefError::MissingFile {
            path: path.to_path_buf(),
            hint: hint.map(str::to_string),
        })
    }
}

/// Lines of a text, split on `\r\n`, `\r` or `\n`
///
/// Terminators are not included. A final terminator does not start an extra empty line.
pub struct UniversalLines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for UniversalLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }

        match self.rest.find(['\r', '\n']) {
            Some(pos) => {
                let line = &self.rest[..pos];
                let terminator_len = if self.rest[pos..].starts_with("\r\n") { 2 } else { 1 };
                self.rest = &self.rest[pos + terminator_len..];
                Some(line)
            }
            None => {
                let line = self.rest;
                self.rest = "";
                Some(line)
            }
        }
    }
}

/// Split `text` into lines, treating `\r\n`, a lone `\r` and `\n` all as line breaks.
pub fn universal_lines(text: &str) -> UniversalLines<'_> {
    UniversalLines { rest: text }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let tool_dir = Path::new("/repo/scripts");
        assert_eq!(default_xrefs_path(tool_dir), PathBuf::from("/repo/scripts/stringpool_xrefs.txt"));
        assert_eq!(default_csv_path(tool_dir), PathBuf::from("/repo/resources/string.csv"));
    }

    #[test]
    fn test_repo_dir_at_root() {
        assert_eq!(repo_dir(Path::new("/")), Path::new("/"));
    }

    #[test]
    fn test_universal_lines_terminators() {
        let lines: Vec<_> = universal_lines("a\r\nb\rc\nd").collect();
        assert_eq!(lines, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_universal_lines_blank_and_trailing() {
        let lines: Vec<_> = universal_lines("a\n\n\r\r\nb\n").collect();
        assert_eq!(lines, vec!["a", "", "", "", "b"]);

        assert_eq!(universal_lines("").count(), 0);
        assert_eq!(universal_lines("\r").collect::<Vec<_>>(), vec![""]);
    }

    #[test]
    fn test_ensure_exists() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let present = temp_dir.path().join("present.txt");
        std::fs::write(&present, "1|0x10\n").expect("Failed to write file");

        assert!(ensure_exists(&present, None).is_ok());

        let missing = temp_dir.path().join("missing.txt");
        let err = ensure_exists(&missing, Some(XREFS_MISSING_HINT)).unwrap_err();
        assert_eq!(err.hint(), Some(XREFS_MISSING_HINT));
        assert_eq!(err.to_string(), format!("{} not found", missing.display()));
    }
}
