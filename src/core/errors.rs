/// Error types for loading and merging string-table data

use std::io;
use std::path::PathBuf;

/// Failures surfaced by the loader, merger and configuration layer
#[derive(Debug, thiserror::Error)]
pub enum XrefError {
    /// A required input file does not exist
    #[error("{} not found", .path.display())]
    MissingFile {
        path: PathBuf,
        /// Extra guidance printed after the error line
        hint: Option<String>,
    },

    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A configuration file could not be parsed
    #[error("Invalid JSON in configuration file {}: {source}", .path.display())]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl XrefError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        XrefError::Io { path: path.into(), source }
    }

    /// Hint attached to a missing-file error, if any
    pub fn hint(&self) -> Option<&str> {
        match self {
            XrefError::MissingFile { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }
}
