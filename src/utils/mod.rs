/// Utility modules for the string table updater
///
/// This module contains helpers for resolving the default file layout and
/// for formatting and exporting merge results.

pub mod file_utils;
pub mod output_formatter;
