//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for enumerating every regular
//! file beneath a root directory. Traversal is iterative: walkdir keeps an
//! explicit stack of open directories instead of recursing, so arbitrarily
//! deep trees cannot exhaust the call stack.
//!
//! # Discovery order
//!
//! Children of each directory are visited in file-name order, depth-first
//! pre-order. The order is stable across runs on an unchanged tree and is
//! what decides which copy of a duplicate set is kept.
//!
//! # Skipped entries
//!
//! Symbolic links are never followed or reported, special files (sockets,
//! FIFOs, devices) are ignored, and entries that cannot be read are logged
//! and skipped. A directory that cannot be listed contributes nothing.
//!
//! # Example
//!
//! ```no_run
//! use dupes2trash::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! let (files, errors) = walker.collect_files();
//! println!("{} files, {} unreadable entries", files.len(), errors.len());
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use walkdir::{DirEntry, WalkDir};

use super::{FileRecord, ScanError, WalkerConfig};
use crate::progress::ProgressCallback;

/// Directory walker for deterministic file discovery.
pub struct Walker {
    /// Absolute root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional cancellation flag
    shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback, notified once per discovered file
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("root", &self.root)
            .field("config", &self.config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// Relative roots are made absolute against the current directory;
    /// symbolic links in the root are left unresolved.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        let root = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        Self {
            root,
            config,
            shutdown_flag: None,
            progress_callback: None,
        }
    }

    /// Set the cancellation flag.
    ///
    /// When the flag becomes `true` the walk stops before the next entry.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// The absolute root this walker starts from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build the gitignore matcher from the configured patterns.
    fn build_gitignore(&self) -> Option<Gitignore> {
        if self.config.ignore_patterns.is_empty() {
            return None;
        }

        let mut builder = GitignoreBuilder::new(&self.root);
        for pattern in &self.config.ignore_patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                log::warn!("Invalid ignore pattern '{}': {}", pattern, e);
            }
        }

        match builder.build() {
            Ok(gitignore) if !gitignore.is_empty() => Some(gitignore),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Failed to build ignore patterns: {}", e);
                None
            }
        }
    }

    /// Check if a file passes the size bounds.
    fn passes_size_filter(&self, size: u64) -> bool {
        self.config.min_size.is_none_or(|min| size >= min)
            && self.config.max_size.is_none_or(|max| size <= max)
    }

    /// Walk the directory tree, yielding file records in discovery order.
    ///
    /// Unreadable entries are yielded as [`ScanError`] values rather than
    /// stopping iteration. A root that is not a directory yields nothing.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileRecord, ScanError>> + '_ {
        let root_is_dir = self.root.is_dir();
        if !root_is_dir {
            log::debug!("Walk root is not a directory: {}", self.root.display());
        }

        let gitignore = self.build_gitignore();
        let skip_hidden = self.config.skip_hidden;
        let root = self.root.clone();
        let mut discovered = 0usize;

        WalkDir::new(&self.root)
            .follow_links(false)
            .max_depth(if root_is_dir { usize::MAX } else { 0 })
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| keep_entry(entry, &root, skip_hidden, gitignore.as_ref()))
            .take_while(move |_| !self.is_shutdown_requested())
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    if entry.depth() == 0 {
                        return None;
                    }
                    let record = self.process_entry(&entry)?;
                    if let Ok(ref file) = record {
                        discovered += 1;
                        if let Some(ref cb) = self.progress_callback {
                            cb.on_progress(discovered, &file.path.to_string_lossy());
                        }
                    }
                    Some(record)
                }
                Err(e) => {
                    if !root_is_dir {
                        return None;
                    }
                    Some(Err(self.handle_walkdir_error(e)))
                }
            })
    }

    /// Walk the whole tree and split the results into records and errors.
    #[must_use]
    pub fn collect_files(&self) -> (Vec<FileRecord>, Vec<ScanError>) {
        let mut files = Vec::new();
        let mut errors = Vec::new();

        for result in self.walk() {
            match result {
                Ok(file) => files.push(file),
                Err(e) => errors.push(e),
            }
        }

        log::debug!(
            "Walk of {} found {} files ({} entries skipped)",
            self.root.display(),
            files.len(),
            errors.len()
        );

        (files, errors)
    }

    fn is_shutdown_requested(&self) -> bool {
        let requested = self
            .shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst));
        if requested {
            log::debug!("Walker: shutdown requested, stopping iteration");
        }
        requested
    }

    /// Turn a walk entry into a record, or `None` if it is not a regular file.
    fn process_entry(&self, entry: &DirEntry) -> Option<Result<FileRecord, ScanError>> {
        let file_type = entry.file_type();

        if file_type.is_dir() {
            return None;
        }
        if file_type.is_symlink() {
            log::trace!("Skipping symlink: {}", entry.path().display());
            return None;
        }
        if !file_type.is_file() {
            log::trace!("Skipping special file: {}", entry.path().display());
            return None;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => return Some(Err(self.handle_walkdir_error(e))),
        };

        let size = metadata.len();
        if !self.passes_size_filter(size) {
            log::trace!(
                "Skipping file due to size filter ({}): {}",
                size,
                entry.path().display()
            );
            return None;
        }

        Some(Ok(FileRecord::new(entry.path().to_path_buf(), size)))
    }

    fn handle_walkdir_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        let scan_error = match error.into_io_error() {
            Some(io) => ScanError::from_io(path, io),
            None => ScanError::Io {
                path,
                source: std::io::Error::other("filesystem loop detected"),
            },
        };

        match scan_error {
            ScanError::NotFound(ref p) => {
                log::debug!("Entry vanished during walk: {}", p.display());
            }
            ref other => log::warn!("Skipping entry: {}", other),
        }
        scan_error
    }
}

/// Decide whether walkdir should yield (and, for directories, descend into)
/// an entry. The root itself is always kept.
fn keep_entry(
    entry: &DirEntry,
    root: &Path,
    skip_hidden: bool,
    gitignore: Option<&Gitignore>,
) -> bool {
    if entry.depth() == 0 {
        return true;
    }

    if skip_hidden && entry.file_name().to_string_lossy().starts_with('.') {
        log::trace!("Skipping hidden entry: {}", entry.path().display());
        return false;
    }

    if let Some(gi) = gitignore {
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let is_dir = entry.file_type().is_dir();
        if gi.matched(relative, is_dir).is_ignore() {
            log::trace!("Ignoring: {}", entry.path().display());
            return false;
        }
    }

    true
}

/// Enumerate every regular file under `root` with default settings.
///
/// Returns an empty list if `root` does not exist or is not a directory.
/// Unreadable entries are skipped.
#[must_use]
pub fn walk(root: &Path) -> Vec<FileRecord> {
    Walker::new(root, WalkerConfig::default()).collect_files().0
}
