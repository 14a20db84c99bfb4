//! Dupes2Trash - find byte-identical duplicate files and move the extra
//! copies to the system trash.
//!
//! The pipeline walks a directory tree, groups files by size, confirms
//! duplicates with a chunked byte comparison, and produces an ordered list of
//! `(keep, dispose)` pairs. Detection runs on a background worker; disposal
//! re-checks every file immediately before moving it.

pub mod actions;
pub mod app;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;
pub mod worker;

pub use app::{run_app, run_with};
