//! Command-line interface definitions.
//!
//! ```bash
//! # Scan a directory, review the pairs, confirm to trash
//! dupes2trash ~/Downloads
//!
//! # Prompt for the directory
//! dupes2trash
//!
//! # Machine-readable output, never trashes without --yes
//! dupes2trash ~/Downloads --output json
//!
//! # Only consider files of at least 1 MiB, skip dotfiles
//! dupes2trash ~/Downloads --min-size 1MiB --skip-hidden
//! ```

use std::path::PathBuf;

use bytesize::ByteSize;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::scanner::MAX_CHUNK_SIZE;

/// Find byte-identical duplicate files and move the extra copies to the trash.
///
/// For every set of identical files, the first one found is kept and every
/// later copy is listed as disposable. Nothing is moved until you confirm.
#[derive(Debug, Parser)]
#[command(name = "dupes2trash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan (prompted for when omitted)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Read settings from this TOML file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Minimum file size to consider (e.g., 1KB, 1MiB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Maximum file size to consider (e.g., 1KB, 1MiB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub max_size: Option<u64>,

    /// Gitignore-style patterns to skip (can be given multiple times)
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    pub ignore_patterns: Vec<String>,

    /// Skip hidden files and directories (names starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Bytes read per comparison step (e.g., 8KiB, 64KiB)
    #[arg(long, value_name = "SIZE", value_parser = parse_chunk_size)]
    pub chunk_size: Option<usize>,

    /// Move duplicates to the trash without asking
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// List what would be moved, move nothing
    #[arg(long, conflicts_with = "yes")]
    pub dry_run: bool,
}

/// Output format for scan results.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned columns with an interactive confirmation
    #[default]
    Text,
    /// JSON for scripting
    Json,
    /// CSV for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Parse a human-readable size such as `1024`, `1KB` or `1.5MiB` into bytes.
///
/// ```
/// use dupes2trash::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
/// ```
///
/// # Errors
///
/// Returns a message when the string is not a valid size.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }
    s.parse::<ByteSize>()
        .map(|b| b.as_u64())
        .map_err(|e| format!("Invalid size '{s}': {e}"))
}

/// Parse `--chunk-size`; values above [`MAX_CHUNK_SIZE`] are clamped.
fn parse_chunk_size(s: &str) -> Result<usize, String> {
    let bytes = parse_size(s)?;
    if bytes == 0 {
        return Err("Chunk size must be at least 1 byte".to_string());
    }
    let clamped = usize::try_from(bytes).map_or(MAX_CHUNK_SIZE, |b| b.min(MAX_CHUNK_SIZE));
    if clamped as u64 != bytes {
        log::warn!("Chunk size {} clamped to {} bytes", s, clamped);
    }
    Ok(clamped)
}
