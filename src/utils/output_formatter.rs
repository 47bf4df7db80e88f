/// Output formatter for merge results
///
/// This module handles console formatting of a merge summary and its export
/// as a JSON report.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use serde_json::{json, Value};

use crate::app::MergePaths;
use crate::core::merger::MergeSummary;

/// Format a merge summary for console output
///
/// # Arguments
///
/// * `summary` - Counters from the merge
///
/// # Returns
///
/// Formatted multi-line string
pub fn format_summary(summary: &MergeSummary) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", "Merge Summary".yellow().bold()));
    output.push_str(&format!("  {} {}\n", "Xrefs entries:".cyan(), summary.xref_entries));
    output.push_str(&format!("  {} {}\n", "Lines read:".cyan(), summary.lines_read));
    output.push_str(&format!("  {} {}\n", "Rows merged:".cyan(), summary.rows_merged));
    output.push_str(&format!("    {} {}\n", "with xrefs:".green(), summary.rows_with_xrefs));
    output.push_str(&format!("    {} {}\n", "without xrefs:".green(), summary.rows_without_xrefs));
    output.push_str(&format!("  {} {}\n", "Passed through:".cyan(), summary.passthrough_lines));
    output.push_str(&format!("  {} {}", "Blank lines dropped:".cyan(), summary.blank_lines_dropped));

    output
}

/// Build the JSON report for a merge
pub fn summary_to_json(summary: &MergeSummary, paths: &MergePaths) -> Value {
    json!({
        "generated_at": Local::now().to_rfc3339(),
        "tool_version": crate::VERSION,
        "xrefs_path": paths.xrefs.to_string_lossy(),
        "csv_path": paths.csv.to_string_lossy(),
        "output_path": paths.output.to_string_lossy(),
        "summary": summary,
    })
}

/// Export a merge summary to a JSON file
///
/// # Arguments
///
/// * `summary` - Counters from the merge
/// * `paths` - Files the merge read and wrote
/// * `output_path` - Where to write the report
pub fn export_summary_json(summary: &MergeSummary, paths: &MergePaths, output_path: &Path) -> Result<()> {
    let report = summary_to_json(summary, paths);

    let mut file = File::create(output_path)
        .context(format!("Failed to create JSON output file: {}", output_path.display()))?;
    let json_string = serde_json::to_string_pretty(&report).context("Failed to serialize merge summary")?;
    file.write_all(json_string.as_bytes())
        .context(format!("Failed to write JSON output: {}", output_path.display()))?;

    Ok(())
}
