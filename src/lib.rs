/// String table updater - merges StringPool cross-references into string.csv
///
/// This library loads the `idx|xrefs` output of the StringPool analysis and
/// appends it as a third column to the `idx,string_value` string table CSV.

// Re-export core modules
pub mod core;
pub mod utils;

// Re-export the main loader and merger entry points for convenience
pub use crate::core::errors::XrefError;
pub use crate::core::merger::{merge_csv, update_csv, CsvRow, MergeSummary, MergedLine};
pub use crate::core::xrefs::{load_xrefs, XrefEntry, XrefMap};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Merge an xrefs file into a string table CSV in place
///
/// This is a convenience function for simple use cases.
///
/// # Arguments
///
/// * `xrefs_path` - Path to the StringPool xrefs file
/// * `csv_path` - Path to the string table CSV to rewrite
///
/// # Returns
///
/// Counters describing the merge
pub fn merge_files<P: AsRef<std::path::Path>, Q: AsRef<std::path::Path>>(
    xrefs_path: P,
    csv_path: Q,
) -> anyhow::Result<MergeSummary> {
    let paths = app::MergePaths {
        xrefs: xrefs_path.as_ref().to_path_buf(),
        csv: csv_path.as_ref().to_path_buf(),
        output: csv_path.as_ref().to_path_buf(),
    };

    app::run_merge(&paths)
}

/// Library configuration and utilities
pub mod config {
    use std::path::{Path, PathBuf};

    use log::LevelFilter;
    use serde::{Deserialize, Serialize};
    use serde_json::Value;

    use crate::core::errors::XrefError;

    /// Log level used when neither the command line nor the config sets one
    pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

    /// Settings read from a JSON configuration file or the command line
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct MergeConfig {
        /// Directory defaults are resolved from, instead of the executable's
        pub tool_dir: Option<PathBuf>,
        pub xrefs_path: Option<PathBuf>,
        pub csv_path: Option<PathBuf>,
        /// Where to write the merged CSV; defaults to rewriting `csv_path`
        pub output_path: Option<PathBuf>,
        pub log_level: Option<LevelFilter>,
    }

    impl MergeConfig {
        /// Read a configuration from a JSON file
        pub fn from_file(path: &Path) -> Result<Self, XrefError> {
            let config_str = std::fs::read_to_string(path).map_err(|e| XrefError::io(path, e))?;
            serde_json::from_str(&config_str).map_err(|source| XrefError::InvalidConfig {
                path: path.to_path_buf(),
                source,
            })
        }

        /// Fill every unset field of `self` from `fallback`
        pub fn or(self, fallback: MergeConfig) -> MergeConfig {
            MergeConfig {
                tool_dir: self.tool_dir.or(fallback.tool_dir),
                xrefs_path: self.xrefs_path.or(fallback.xrefs_path),
                csv_path: self.csv_path.or(fallback.csv_path),
                output_path: self.output_path.or(fallback.output_path),
                log_level: self.log_level.or(fallback.log_level),
            }
        }

        /// Effective log level
        pub fn log_level(&self) -> LevelFilter {
            self.log_level.unwrap_or(DEFAULT_LOG_LEVEL)
        }
    }

    /// Create default configuration
    pub fn default_config() -> Value {
        serde_json::json!({
            "tool_dir": null,
            "xrefs_path": null,
            "csv_path": null,
            "output_path": null,
            "log_level": null
        })
    }

    /// Load configuration from file if provided
    ///
    /// Runs before logging is set up, since the file may choose the log level.
    /// Callers log a returned error and fall back to [`MergeConfig::default`].
    pub fn load_config(config_path: Option<&Path>) -> Result<MergeConfig, XrefError> {
        let Some(path) = config_path else {
            return Ok(MergeConfig::default());
        };

        if !path.exists() {
            return Err(XrefError::MissingFile {
                path: path.to_path_buf(),
                hint: None,
            });
        }

        MergeConfig::from_file(path)
    }

}

/// Command-line application functionality
pub mod app {
    use std::fmt;
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result};
    use log::info;

    use crate::config::MergeConfig;
    use crate::core::errors::XrefError;
    use crate::core::merger::{self, MergeSummary};
    use crate::core::xrefs;
    use crate::utils::file_utils;

    /// Files one run reads and writes
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct MergePaths {
        pub xrefs: PathBuf,
        pub csv: PathBuf,
        pub output: PathBuf,
    }

    impl MergePaths {
        /// The default layout around `tool_dir`, rewriting the CSV in place
        pub fn from_tool_dir(tool_dir: &Path) -> Self {
            let csv = file_utils::default_csv_path(tool_dir);
            Self {
                xrefs: file_utils::default_xrefs_path(tool_dir),
                output: csv.clone(),
                csv,
            }
        }

        /// Whether the merge overwrites its input CSV
        pub fn in_place(&self) -> bool {
            self.output == self.csv
        }

        /// Where the merge writes, as shown to the user
        pub fn describe_target(&self) -> String {
            if self.in_place() {
                self.csv.display().to_string()
            } else {
                format!("{} -> {}", self.csv.display(), self.output.display())
            }
        }
    }

    /// Steps reported while a merge runs
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum MergeProgress {
        LoadingXrefs(PathBuf),
        LoadedXrefs(usize),
        /// Carries [`MergePaths::describe_target`]
        Updating(String),
        Done,
    }

    impl fmt::Display for MergeProgress {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                MergeProgress::LoadingXrefs(path) => write!(f, "Loading xrefs from {}...", path.display()),
                MergeProgress::LoadedXrefs(count) => write!(f, "Loaded {} idx entries", count),
                MergeProgress::Updating(target) => write!(f, "Updating {}...", target),
                MergeProgress::Done => f.write_str("Done!"),
            }
        }
    }

    /// Resolve the paths for a run
    ///
    /// Explicit settings in `config` win; anything unset falls back to the
    /// default layout around the tool directory.
    pub fn resolve_paths(config: &MergeConfig) -> Result<MergePaths> {
        let tool_dir = match &config.tool_dir {
            Some(dir) => dir.clone(),
            None => file_utils::tool_dir()?,
        };
        let defaults = MergePaths::from_tool_dir(&tool_dir);

        let xrefs = config.xrefs_path.clone().unwrap_or(defaults.xrefs);
        let csv = config.csv_path.clone().unwrap_or(defaults.csv);
        let output = config.output_path.clone().unwrap_or_else(|| csv.clone());

        Ok(MergePaths { xrefs, csv, output })
    }

    /// Check that both inputs exist, xrefs first
    pub fn check_inputs(paths: &MergePaths) -> std::result::Result<(), XrefError> {
        file_utils::ensure_exists(&paths.xrefs, Some(file_utils::XREFS_MISSING_HINT))?;
        file_utils::ensure_exists(&paths.csv, None)
    }

    /// Check inputs, load the xrefs, and merge them into the CSV
    pub fn run_merge(paths: &MergePaths) -> Result<MergeSummary> {
        run_merge_with_progress(paths, |_| {})
    }

    /// [`run_merge`], reporting each step to `progress`
    ///
    /// A missing input comes back as an unwrapped [`XrefError::MissingFile`],
    /// so callers can `downcast_ref` it.
    pub fn run_merge_with_progress<F>(paths: &MergePaths, mut progress: F) -> Result<MergeSummary>
    where
        F: FnMut(MergeProgress),
    {
        check_inputs(paths)?;

        progress(MergeProgress::LoadingXrefs(paths.xrefs.clone()));
        let xrefs = xrefs::load_xrefs(&paths.xrefs)
            .with_context(|| format!("Failed to load xrefs from {}", paths.xrefs.display()))?;
        progress(MergeProgress::LoadedXrefs(xrefs.len()));

        progress(MergeProgress::Updating(paths.describe_target()));
        let summary = merger::merge_csv(&paths.csv, &paths.output, &xrefs)
            .with_context(|| format!("Failed to update {}", paths.csv.display()))?;
        progress(MergeProgress::Done);

        info!("Merged {} rows from {}", summary.rows_merged, paths.csv.display());
        Ok(summary)
    }

}
