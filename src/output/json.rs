//! JSON output for scan results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "pairs": [
//!     { "keep": "/photos/a.jpg", "dispose": "/photos/copy/a.jpg" }
//!   ],
//!   "summary": {
//!     "total_files": 100,
//!     "total_size": 1048576,
//!     "candidate_files": 12,
//!     "comparisons": 20,
//!     "duplicate_files": 4,
//!     "reclaimable_space": 51200,
//!     "skipped_entries": 0,
//!     "scan_duration_ms": 1234,
//!     "interrupted": false,
//!     "exit_code": 0,
//!     "exit_code_name": "DT000"
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{DuplicatePair, ScanResult, ScanSummary};
use crate::error::ExitCode;

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Regular files found by the walk
    pub total_files: usize,
    /// Total size of those files in bytes
    pub total_size: u64,
    /// Files sharing their size with another file
    pub candidate_files: usize,
    /// Content comparisons performed
    pub comparisons: usize,
    /// Disposable files (one per pair)
    pub duplicate_files: usize,
    /// Bytes freed if every disposable file is trashed
    pub reclaimable_space: u64,
    /// Directory entries that could not be read
    pub skipped_entries: usize,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// Whether the scan was interrupted
    pub interrupted: bool,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DT000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Build from a scan summary and the exit code of this run.
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            total_files: summary.total_files,
            total_size: summary.total_size,
            candidate_files: summary.candidate_files,
            comparisons: summary.comparisons,
            duplicate_files: summary.duplicate_files,
            reclaimable_space: summary.reclaimable_space,
            skipped_entries: summary.skipped_entries,
            scan_duration_ms: u64::try_from(summary.scan_duration.as_millis()).unwrap_or(u64::MAX),
            interrupted: summary.interrupted,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Pairs in discovery order
    pub pairs: Vec<DuplicatePair>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Create the document for one scan.
    ///
    /// ```
    /// use dupes2trash::duplicates::{ScanResult, ScanSummary};
    /// use dupes2trash::error::ExitCode;
    /// use dupes2trash::output::JsonOutput;
    ///
    /// let output = JsonOutput::new(&ScanResult::new(), &ScanSummary::default(), ExitCode::NoDuplicates);
    /// assert!(output.pairs.is_empty());
    /// assert_eq!(output.summary.exit_code, 2);
    /// ```
    #[must_use]
    pub fn new(result: &ScanResult, summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            pairs: result.iter().cloned().collect(),
            summary: JsonSummary::from_scan_summary(summary, exit_code),
        }
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
