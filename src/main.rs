/// String table updater - adds StringPool xrefs to resources/string.csv
///
/// The main entry point. It resolves the input files, checks that they exist,
/// and rewrites the string table with a third xrefs column.

use anyhow::Result;
use clap::{ArgAction, Parser};
use colored::Colorize;
use log::{error, info, LevelFilter};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use string_xrefs::app::{self, MergeProgress};
use string_xrefs::config::{load_config, MergeConfig};
use string_xrefs::utils::output_formatter;
use string_xrefs::XrefError;

/// Command line argument structure
#[derive(Parser, Debug)]
#[command(
    name = "update_string_csv",
    version,
    about = "Add StringPool xrefs as a third column of resources/string.csv",
    long_about = "Reads stringpool_xrefs.txt (idx|xref1 xref2 ...) from the tool directory and
resources/string.csv (idx,string_value) from its parent, then rewrites the CSV
as idx,string_value,xrefs.

With no arguments the default layout is used."
)]
struct Args {
    /// Path to the xrefs file (default: <tool dir>/stringpool_xrefs.txt)
    #[arg(long = "xrefs")]
    xrefs: Option<PathBuf>,

    /// Path to the string table CSV (default: <tool dir>/../resources/string.csv)
    #[arg(long = "csv")]
    csv: Option<PathBuf>,

    /// Write the merged CSV here instead of rewriting the input
    #[arg(long = "output")]
    output: Option<PathBuf>,

    /// Directory default paths are resolved from (default: the executable's directory)
    #[arg(long = "tool-dir")]
    tool_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Export a merge summary to a JSON file
    #[arg(long = "json")]
    json: Option<PathBuf>,

    /// Suppress progress output
    #[arg(long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,

    /// Set logging level (default: the config's log_level, else WARN)
    #[arg(long = "log-level")]
    log_level: Option<LevelFilter>,

    /// Log file path (default: stderr)
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

impl Args {
    /// Path settings given on the command line
    fn overrides(&self) -> MergeConfig {
        MergeConfig {
            tool_dir: self.tool_dir.clone(),
            xrefs_path: self.xrefs.clone(),
            csv_path: self.csv.clone(),
            output_path: self.output.clone(),
            log_level: self.log_level,
        }
    }
}

/// Main entry point function
fn main() -> Result<()> {
    let start_time = Instant::now();

    let args = Args::parse();

    // The config file may set the log level, so it is read before logging starts
    let (file_config, config_error) = match load_config(args.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => (MergeConfig::default(), Some(e)),
    };

    // Command line settings take precedence over the configuration file
    let config = args.overrides().or(file_config);

    // Set up logging
    setup_logging(config.log_level(), args.log_file.as_deref());

    match (&args.config, config_error) {
        (_, Some(e)) => error!("Ignoring configuration file: {}", e),
        (Some(path), None) => info!("Loaded configuration from {}", path.display()),
        (None, None) => {}
    }

    let paths = app::resolve_paths(&config)?;

    let result = app::run_merge_with_progress(&paths, |event| {
        if args.quiet {
            return;
        }
        match event {
            MergeProgress::Done => println!("{}", event.to_string().green().bold()),
            _ => println!("{}", event),
        }
    });

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            if let Some(missing @ XrefError::MissingFile { .. }) = e.downcast_ref::<XrefError>() {
                eprintln!("{}", format!("Error: {}", missing).red());
                if let Some(hint) = missing.hint() {
                    eprintln!("{}", hint);
                }
                process::exit(1);
            }
            return Err(e);
        }
    };

    if let Some(json_path) = &args.json {
        output_formatter::export_summary_json(&summary, &paths, json_path)?;
        info!("Exported merge summary to {}", json_path.display());
    }

    if !args.quiet {
        println!("\n{}", output_formatter::format_summary(&summary));
    }
    info!("Finished in {:.2} seconds", start_time.elapsed().as_secs_f64());

    Ok(())
}

/// Set up logging to stderr, or to a file if one was given
fn setup_logging(level: LevelFilter, log_file: Option<&Path>) {
    let mut builder = env_logger::Builder::new();

    builder.filter_level(level);

    // Set format
    builder.format(|buf, record| {
        use chrono::Local;
        use std::io::Write;
        writeln!(
            buf,
            "{} - {} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    // Add file output
    if let Some(log_file) = log_file {
        match File::create(log_file) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!(
                "{}",
                format!("Warning: cannot create log file {}: {}", log_file.display(), e).yellow()
            ),
        }
    }

    builder.init();
}
