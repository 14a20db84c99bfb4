use clap::Parser;
use dupes2trash::cli::{Cli, OutputFormat};
use dupes2trash::config::{Config, ConfigError};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_load_toml_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dupes2trash.toml");
    fs::write(
        &path,
        r#"
output = "json"
min_size = 1024
skip_hidden = true
ignore_patterns = ["*.tmp", "node_modules/"]
chunk_size = 65536
"#,
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();

    assert_eq!(config.output, OutputFormat::Json);
    assert_eq!(config.min_size, Some(1024));
    assert_eq!(config.max_size, None);
    assert!(config.skip_hidden);
    assert_eq!(config.ignore_patterns, vec!["*.tmp", "node_modules/"]);
    assert_eq!(config.chunk_size, 65_536);
    assert!(!config.dry_run);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("partial.toml");
    fs::write(&path, "dry_run = true\n").unwrap();

    let config = Config::load(Some(&path)).unwrap();

    assert!(config.dry_run);
    assert_eq!(config.output, OutputFormat::Text);
    assert_eq!(config.chunk_size, Config::default().chunk_size);
}

#[test]
fn test_zero_chunk_size_in_file_is_clamped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("zero.toml");
    fs::write(&path, "chunk_size = 0\n").unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.chunk_size, 1);
}

#[test]
fn test_invalid_value_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "output = \"html\"\n").unwrap();

    let result = Config::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_malformed_toml_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "output = [unterminated\n").unwrap();

    assert!(Config::load(Some(&path)).is_err());
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    match Config::load(Some(&path)) {
        Err(ConfigError::NotFound(p)) => assert_eq!(p, path),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_cli_flags_override_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dupes2trash.toml");
    fs::write(
        &path,
        "output = \"json\"\nmin_size = 10\nignore_patterns = [\"*.bak\"]\n",
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "dupes2trash",
        "/data",
        "--config",
        path.to_str().unwrap(),
        "--output",
        "csv",
        "--min-size",
        "2KiB",
        "-i",
        "*.tmp",
    ])
    .unwrap();

    let config = Config::from_cli(&cli).unwrap();

    assert_eq!(config.output, OutputFormat::Csv);
    assert_eq!(config.min_size, Some(2048));
    assert_eq!(config.ignore_patterns, vec!["*.bak", "*.tmp"]);
}

#[test]
fn test_finder_config_carries_settings() {
    let config = Config {
        skip_hidden: true,
        ignore_patterns: vec!["target/".to_string()],
        chunk_size: 512,
        ..Config::default()
    };

    let finder = config.finder_config();

    assert!(finder.walker_config.skip_hidden);
    assert_eq!(finder.walker_config.ignore_patterns, vec!["target/"]);
    assert_eq!(finder.pairer_config.chunk_size, 512);
    assert!(finder.pairer_config.shutdown_flag.is_none());
}
