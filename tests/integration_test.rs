/// Integration tests for the string table updater
///
/// These tests drive the library and the `update_string_csv` binary against
/// temporary copies of the sample files in `tests/data`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use string_xrefs::app::{self, MergePaths};
use string_xrefs::core::xrefs::load_xrefs;
use string_xrefs::{merge_csv, merge_files, update_csv, XrefError};

const EXPECTED_CSV: &str = "3,\"\",\n\
5,\"hello\",0x1000 0x2004\n\
7,\"world\",\n\
notanumber\n\
12,\"a, b\",0x4A10 0x4B20\n";

/// Lay out `<root>/scripts/stringpool_xrefs.txt` and `<root>/resources/string.csv`
fn setup_layout(root: &Path) -> PathBuf {
    let tool_dir = root.join("scripts");
    fs::create_dir_all(&tool_dir).expect("Failed to create tool dir");
    fs::create_dir_all(root.join("resources")).expect("Failed to create resources dir");

    fs::copy("tests/data/stringpool_xrefs.txt", tool_dir.join("stringpool_xrefs.txt"))
        .expect("Failed to copy xrefs fixture");
    fs::copy("tests/data/string.csv", root.join("resources").join("string.csv"))
        .expect("Failed to copy csv fixture");

    tool_dir
}

#[test]
fn test_load_sample_xrefs() {
    let xrefs = load_xrefs(Path::new("tests/data/stringpool_xrefs.txt")).expect("Failed to load xrefs");

    assert_eq!(xrefs.len(), 3);
    assert_eq!(xrefs[&5_i64], "0x1000 0x2004");
    assert_eq!(xrefs[&12_i64], "0x4A10 0x4B20");
    assert_eq!(xrefs[&3_i64], "");
    assert!(!xrefs.values().any(|v| v == "0x9999"));
}

#[test]
fn test_update_csv_in_place() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let tool_dir = setup_layout(temp_dir.path());
    let paths = MergePaths::from_tool_dir(&tool_dir);

    let xrefs = load_xrefs(&paths.xrefs).expect("Failed to load xrefs");
    let summary = update_csv(&paths.csv, &xrefs).expect("Failed to update csv");

    assert_eq!(fs::read_to_string(&paths.csv).unwrap(), EXPECTED_CSV);
    assert_eq!(summary.xref_entries, 3);
    assert_eq!(summary.lines_read, 6);
    assert_eq!(summary.blank_lines_dropped, 1);
    assert_eq!(summary.rows_merged, 4);
    assert_eq!(summary.rows_with_xrefs, 2);
    assert_eq!(summary.rows_without_xrefs, 2);
    assert_eq!(summary.passthrough_lines, 1);
}

#[test]
fn test_merge_to_separate_output_leaves_input() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let tool_dir = setup_layout(temp_dir.path());
    let paths = MergePaths::from_tool_dir(&tool_dir);
    let output = temp_dir.path().join("merged.csv");

    let xrefs = load_xrefs(&paths.xrefs).expect("Failed to load xrefs");
    merge_csv(&paths.csv, &output, &xrefs).expect("Failed to merge csv");

    assert_eq!(fs::read_to_string(&output).unwrap(), EXPECTED_CSV);
    assert_eq!(
        fs::read_to_string(&paths.csv).unwrap(),
        fs::read_to_string("tests/data/string.csv").unwrap()
    );
}

#[test]
fn test_crlf_input_written_with_lf() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let xrefs_path = temp_dir.path().join("stringpool_xrefs.txt");
    let csv_path = temp_dir.path().join("string.csv");
    fs::write(&xrefs_path, "1|0x10\r\n2|0x20\r\n").unwrap();
    fs::write(&csv_path, "1,\"one\"\r\n\r\n2,\"two\"\r\nno comma\r\n").unwrap();

    merge_files(&xrefs_path, &csv_path).expect("Failed to merge files");

    assert_eq!(
        fs::read_to_string(&csv_path).unwrap(),
        "1,\"one\",0x10\n2,\"two\",0x20\nno comma\n"
    );
}

#[test]
fn test_empty_csv() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let xrefs_path = temp_dir.path().join("stringpool_xrefs.txt");
    let csv_path = temp_dir.path().join("string.csv");
    fs::write(&xrefs_path, "").unwrap();
    fs::write(&csv_path, "\n\n").unwrap();

    let summary = merge_files(&xrefs_path, &csv_path).expect("Failed to merge files");

    assert_eq!(fs::read_to_string(&csv_path).unwrap(), "");
    assert_eq!(summary.blank_lines_dropped, 2);
    assert_eq!(summary.lines_written(), 0);
}

#[test]
fn test_missing_xrefs_reported_first() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let paths = MergePaths::from_tool_dir(&temp_dir.path().join("scripts"));

    let err = app::check_inputs(&paths).unwrap_err();
    match &err {
        XrefError::MissingFile { path, hint } => {
            assert_eq!(path, &paths.xrefs);
            assert!(hint.is_some());
        }
        other => panic!("expected missing file, got {:?}", other),
    }

    let err = app::run_merge(&paths).unwrap_err();
    assert!(matches!(err.downcast_ref::<XrefError>(), Some(XrefError::MissingFile { .. })));
}

#[test]
fn test_missing_csv() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let tool_dir = setup_layout(temp_dir.path());
    let paths = MergePaths::from_tool_dir(&tool_dir);
    fs::remove_file(&paths.csv).unwrap();

    match app::check_inputs(&paths) {
        Err(XrefError::MissingFile { path, hint }) => {
            assert_eq!(path, paths.csv);
            assert!(hint.is_none());
        }
        other => panic!("expected missing csv, got {:?}", other),
    }
}

#[test]
fn test_cli_default_layout_from_tool_dir() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let tool_dir = setup_layout(temp_dir.path());
    let report = temp_dir.path().join("summary.json");

    let output = Command::new(env!("CARGO_BIN_EXE_update_string_csv"))
        .arg("--tool-dir")
        .arg(&tool_dir)
        .arg("--json")
        .arg(&report)
        .output()
        .expect("Failed to run update_string_csv");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Loaded 3 idx entries"));
    assert!(stdout.contains("Done!"));

    let csv = fs::read_to_string(temp_dir.path().join("resources").join("string.csv")).unwrap();
    assert_eq!(csv, EXPECTED_CSV);

    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(report["summary"]["rows_merged"], 4);
}

#[test]
fn test_cli_missing_xrefs_exits_with_one() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let tool_dir = temp_dir.path().join("scripts");
    fs::create_dir_all(&tool_dir).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_update_string_csv"))
        .arg("--tool-dir")
        .arg(&tool_dir)
        .output()
        .expect("Failed to run update_string_csv");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("stringpool_xrefs.txt not found"));
}

#[test]
fn test_cli_missing_csv_exits_with_one() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let tool_dir = setup_layout(temp_dir.path());
    fs::remove_file(temp_dir.path().join("resources").join("string.csv")).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_update_string_csv"))
        .arg("--tool-dir")
        .arg(&tool_dir)
        .arg("--quiet")
        .output()
        .expect("Failed to run update_string_csv");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("string.csv not found"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_cli_log_level_from_config_and_flag_precedence() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let tool_dir = setup_layout(temp_dir.path());
    let config_path = temp_dir.path().join("config.json");
    fs::write(&config_path, r#"{"log_level": "info"}"#).unwrap();

    let info_log = temp_dir.path().join("info.log");
    let output = Command::new(env!("CARGO_BIN_EXE_update_string_csv"))
        .arg("--tool-dir")
        .arg(&tool_dir)
        .arg("--config")
        .arg(&config_path)
        .arg("--log-file")
        .arg(&info_log)
        .arg("--quiet")
        .output()
        .expect("Failed to run update_string_csv");
    assert!(output.status.success());
    assert!(fs::read_to_string(&info_log).unwrap().contains("Loaded configuration from"));

    // Restore the input so the second run merges two-column rows again
    fs::copy("tests/data/string.csv", temp_dir.path().join("resources").join("string.csv")).unwrap();

    let error_log = temp_dir.path().join("error.log");
    let output = Command::new(env!("CARGO_BIN_EXE_update_string_csv"))
        .arg("--tool-dir")
        .arg(&tool_dir)
        .arg("--config")
        .arg(&config_path)
        .arg("--log-level")
        .arg("error")
        .arg("--log-file")
        .arg(&error_log)
        .arg("--quiet")
        .output()
        .expect("Failed to run update_string_csv");
    assert!(output.status.success());
    assert!(!fs::read_to_string(&error_log).unwrap().contains("INFO"));
}

#[test]
fn test_lone_carriage_return_files() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let xrefs_path = temp_dir.path().join("stringpool_xrefs.txt");
    let csv_path = temp_dir.path().join("string.csv");
    fs::write(&xrefs_path, "1|0xA\r2|0xB\n").unwrap();
    fs::write(&csv_path, "1,a\r2,b\n").unwrap();

    merge_files(&xrefs_path, &csv_path).expect("Failed to merge files");

    assert_eq!(fs::read_to_string(&csv_path).unwrap(), "1,a,0xA\n2,b,0xB\n");
}
