//! Terminal rendering of a scan result as two aligned columns.
//!
//! ```text
//! Keep                 Dispose
//! /photos/a.jpg        /photos/copy/a.jpg
//! /photos/a.jpg        /backup/a.jpg
//! ```
//!
//! Colors come from `yansi` and follow its global switch, so
//! `yansi::disable()` yields plain text.

use std::io::{self, Write};

use yansi::Paint;

use crate::duplicates::{ScanResult, ScanSummary};

/// Column widths never exceed this many characters; longer kept paths push
/// their row's second column right instead.
const MAX_KEEP_WIDTH: usize = 60;

/// Two-column text formatter.
pub struct TextOutput<'a> {
    result: &'a ScanResult,
    summary: &'a ScanSummary,
}

impl<'a> TextOutput<'a> {
    /// Create a formatter for one scan.
    #[must_use]
    pub fn new(result: &'a ScanResult, summary: &'a ScanSummary) -> Self {
        Self { result, summary }
    }

    fn keep_width(&self) -> usize {
        self.result
            .iter()
            .map(|p| p.keep.to_string_lossy().chars().count())
            .max()
            .unwrap_or(0)
            .clamp("Keep".len(), MAX_KEEP_WIDTH)
    }

    /// Write the column table. Nothing is written for an empty result.
    ///
    /// # Errors
    ///
    /// Returns any error from `writer`.
    pub fn write_table<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        if self.result.is_empty() {
            return Ok(());
        }

        let width = self.keep_width();
        writeln!(
            writer,
            "{}  {}",
            format!("{:<width$}", "Keep").bold(),
            "Dispose".bold()
        )?;

        for pair in self.result {
            let keep = format!("{:<width$}", pair.keep.to_string_lossy());
            writeln!(
                writer,
                "{}  {}",
                keep.green(),
                pair.dispose.to_string_lossy().yellow()
            )?;
        }
        Ok(())
    }

    /// Write the one-line outcome of the scan.
    ///
    /// # Errors
    ///
    /// Returns any error from `writer`.
    pub fn write_summary<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        if self.summary.interrupted {
            writeln!(
                writer,
                "{}",
                "Scan interrupted, the list above is incomplete.".red()
            )?;
        }

        if self.result.is_empty() {
            return writeln!(writer, "{}", duplicate_count_message(0));
        }

        writeln!(
            writer,
            "{} ({} reclaimable, {} files scanned in {:.2}s)",
            duplicate_count_message(self.result.len()).bold(),
            self.summary.reclaimable_display(),
            self.summary.total_files,
            self.summary.scan_duration.as_secs_f64()
        )
    }

    /// Write the table followed by the summary line.
    ///
    /// # Errors
    ///
    /// Returns any error from `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.write_table(writer)?;
        self.write_summary(writer)
    }
}

/// The headline for `count` duplicates.
#[must_use]
pub fn duplicate_count_message(count: usize) -> String {
    if count == 0 {
        "0 duplicate files found!".to_string()
    } else {
        format!("{count} duplicate file(s) found!")
    }
}
