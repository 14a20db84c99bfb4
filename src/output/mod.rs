//! Renderers for a [`ScanResult`](crate::duplicates::ScanResult).
//!
//! - [`text`]: two aligned columns (kept, disposable) for a terminal
//! - [`json`]: pairs plus summary for scripting
//! - [`csv`]: one row per pair for spreadsheets
//!
//! ```no_run
//! use dupes2trash::duplicates::DuplicateFinder;
//! use dupes2trash::error::ExitCode;
//! use dupes2trash::output::JsonOutput;
//! use std::path::Path;
//!
//! let (result, summary) = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("."))
//!     .unwrap();
//! let output = JsonOutput::new(&result, &summary, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod json;
pub mod text;

pub use self::csv::{CsvOutput, CsvOutputError};
pub use json::{JsonOutput, JsonOutputError, JsonSummary};
pub use text::TextOutput;
