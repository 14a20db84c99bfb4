//! CSV output for scan results.
//!
//! One row per pair, in discovery order.
//!
//! # Columns
//!
//! - `index`: 1-based position of the pair
//! - `keep`: path of the kept file
//! - `dispose`: path of the disposable file

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::duplicates::ScanResult;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Output was not valid UTF-8.
    #[error("CSV output is not valid UTF-8")]
    Utf8,
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    index: usize,
    keep: &'a str,
    dispose: &'a str,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    result: &'a ScanResult,
}

impl<'a> CsvOutput<'a> {
    /// Create a formatter over `result`.
    #[must_use]
    pub fn new(result: &'a ScanResult) -> Self {
        Self { result }
    }

    /// Write the CSV document to `writer`.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        if self.result.is_empty() {
            csv_writer.write_record(["index", "keep", "dispose"])?;
        }

        for (idx, pair) in self.result.iter().enumerate() {
            let keep = pair.keep.to_string_lossy();
            let dispose = pair.dispose.to_string_lossy();
            csv_writer.serialize(CsvRow {
                index: idx + 1,
                keep: &keep,
                dispose: &dispose,
            })?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Render the CSV document to a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_csv_string(&self) -> Result<String, CsvOutputError> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        String::from_utf8(buf).map_err(|_| CsvOutputError::Utf8)
    }
}
