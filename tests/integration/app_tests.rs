use clap::Parser;
use dupes2trash::cli::Cli;
use dupes2trash::error::ExitCode;
use dupes2trash::run_with;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn remove(path: &Path) -> bool {
    fs::remove_file(path).is_ok()
}

fn cli(args: &[&str]) -> Cli {
    let mut argv = vec!["dupes2trash", "--no-color", "--quiet"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

fn hello_dir() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    fs::write(dir.path().join("b.txt"), "hello").unwrap();
    dir
}

fn run(args: &[&str], input: &str) -> (ExitCode, String) {
    let mut out = Vec::new();
    let code = run_with(cli(args), &mut Cursor::new(input), &mut out, &remove).unwrap();
    (code, String::from_utf8(out).unwrap())
}

#[test]
fn test_confirmed_run_moves_copy() {
    let dir = hello_dir();
    let root = dir.path().to_str().unwrap();

    let (code, out) = run(&[root], "y\n");

    assert_eq!(code, ExitCode::Success);
    assert!(out.contains("1 duplicate file(s) found!"));
    assert!(out.contains("Move to trash? [y/N] "));
    assert!(out.contains("1 file(s) moved to trash!"));
    assert!(dir.path().join("a.txt").exists());
    assert!(!dir.path().join("b.txt").exists());
}

#[test]
fn test_declined_run_moves_nothing() {
    let dir = hello_dir();
    let root = dir.path().to_str().unwrap();

    let (code, out) = run(&[root], "n\n");

    assert_eq!(code, ExitCode::Success);
    assert!(!out.contains("moved to trash!"));
    assert!(dir.path().join("b.txt").exists());
}

#[test]
fn test_no_duplicates_exit_code() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    fs::write(dir.path().join("b.txt"), "world").unwrap();

    let (code, out) = run(&[dir.path().to_str().unwrap()], "");

    assert_eq!(code, ExitCode::NoDuplicates);
    assert!(out.contains("0 duplicate files found!"));
    assert!(!out.contains("Move to trash?"));
}

#[test]
fn test_empty_directory_reports_zero() {
    let dir = tempdir().unwrap();

    let (code, out) = run(&[dir.path().to_str().unwrap()], "");

    assert_eq!(code, ExitCode::NoDuplicates);
    assert!(out.contains("0 duplicate files found!"));
}

#[test]
fn test_invalid_path_is_no_directory() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    let (code, _) = run(&[missing.to_str().unwrap()], "");

    assert_eq!(code, ExitCode::NoDirectory);
}

#[test]
fn test_empty_prompt_is_no_directory() {
    let (code, out) = run(&[], "\n");

    assert_eq!(code, ExitCode::NoDirectory);
    assert!(out.starts_with("Directory to scan: "));
}

#[test]
fn test_prompted_directory_is_scanned() {
    let dir = hello_dir();
    let input = format!("{}\ny\n", dir.path().display());

    let (code, out) = run(&[], &input);

    assert_eq!(code, ExitCode::Success);
    assert!(out.contains("1 file(s) moved to trash!"));
    assert!(!dir.path().join("b.txt").exists());
}

#[test]
fn test_json_without_yes_does_not_trash() {
    let dir = hello_dir();

    let (code, out) = run(&[dir.path().to_str().unwrap(), "--output", "json"], "y\n");

    assert_eq!(code, ExitCode::Success);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["pairs"].as_array().unwrap().len(), 1);
    assert_eq!(json["summary"]["duplicate_files"], 1);
    assert!(dir.path().join("b.txt").exists());
}

#[test]
fn test_json_with_yes_trashes() {
    let dir = hello_dir();

    let (code, _) = run(&[dir.path().to_str().unwrap(), "-o", "json", "--yes"], "");

    assert_eq!(code, ExitCode::Success);
    assert!(!dir.path().join("b.txt").exists());
}

#[test]
fn test_csv_output() {
    let dir = hello_dir();

    let (code, out) = run(&[dir.path().to_str().unwrap(), "-o", "csv"], "");

    assert_eq!(code, ExitCode::Success);
    let mut lines = out.lines();
    assert_eq!(lines.next(), Some("index,keep,dispose"));
    assert!(lines.next().unwrap().ends_with("b.txt"));
}

#[test]
fn test_dry_run_moves_nothing() {
    let dir = hello_dir();

    let (code, out) = run(&[dir.path().to_str().unwrap(), "--dry-run"], "y\n");

    assert_eq!(code, ExitCode::Success);
    assert!(out.contains("Dry run: 1 of 1"));
    assert!(dir.path().join("b.txt").exists());
}

#[test]
fn test_refused_trash_is_partial_success() {
    let dir = hello_dir();
    let mut out = Vec::new();

    let code = run_with(
        cli(&[dir.path().to_str().unwrap(), "--yes"]),
        &mut Cursor::new(""),
        &mut out,
        &|_: &Path| false,
    )
    .unwrap();

    assert_eq!(code, ExitCode::PartialSuccess);
    assert!(dir.path().join("b.txt").exists());
}

#[test]
fn test_missing_config_file_is_an_error() {
    let dir = hello_dir();
    let config = dir.path().join("absent.toml");
    let mut out = Vec::new();

    let result = run_with(
        cli(&[dir.path().to_str().unwrap(), "--config", config.to_str().unwrap()]),
        &mut Cursor::new(""),
        &mut out,
        &remove,
    );

    assert!(result.is_err());
}

#[test]
fn test_huge_chunk_size_is_clamped_and_scans() {
    let dir = hello_dir();

    let (code, out) = run(
        &[dir.path().to_str().unwrap(), "--chunk-size", "9EiB", "--dry-run"],
        "",
    );

    assert_eq!(code, ExitCode::Success);
    assert!(out.contains("1 duplicate file(s) found!"));
    assert!(dir.path().join("b.txt").exists());
}
