//! Moving confirmed duplicates to the system trash.
//!
//! # Overview
//!
//! [`dispose`] drains a [`ScanResult`] from the front. For each pair it pops
//! the pair first, re-checks the disposable path against the filesystem as
//! it is *now*, and only then asks the [`TrashCapability`] to move it. The
//! kept path of a pair is never touched.
//!
//! A path is eligible when it still exists, is a regular file (a symlink put
//! in its place is not), can be opened for reading, and can be opened for
//! writing. Ineligible paths are skipped and counted, never deleted.
//!
//! ```no_run
//! use dupes2trash::actions::{dispose, DisposeConfig, SystemTrash};
//! use dupes2trash::duplicates::DuplicateFinder;
//! use std::path::Path;
//!
//! let (mut result, _) = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("."))
//!     .unwrap();
//! let report = dispose(&mut result, &SystemTrash, &DisposeConfig::default(), None);
//! println!("{} file(s) moved to trash!", report.success_count());
//! ```

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytesize::ByteSize;
use thiserror::Error;

use crate::duplicates::ScanResult;

/// Why a disposable path was not eligible for the trash.
#[derive(Debug, Error)]
pub enum DisposeError {
    /// The file no longer exists.
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// The path exists but is not a regular file.
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),

    /// The file cannot be opened for reading.
    #[error("not readable: {0}")]
    NotReadable(PathBuf),

    /// The file cannot be opened for writing.
    #[error("not writable: {0}")]
    NotWritable(PathBuf),

    /// Metadata could not be read.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DisposeError {
    /// The path this error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::NotAFile(p)
            | Self::NotReadable(p)
            | Self::NotWritable(p)
            | Self::Io { path: p, .. } => p,
        }
    }
}

/// Something that can move a file to a recoverable trash.
///
/// Returns `true` when the file was moved.
pub trait TrashCapability {
    /// Move `path` to the trash.
    fn move_to_trash(&self, path: &Path) -> bool;
}

/// The operating system's trash (recycle bin), via the `trash` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTrash;

impl TrashCapability for SystemTrash {
    fn move_to_trash(&self, path: &Path) -> bool {
        match trash::delete(path) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Trash operation failed for {}: {}", path.display(), e);
                false
            }
        }
    }
}

impl<F> TrashCapability for F
where
    F: Fn(&Path) -> bool,
{
    fn move_to_trash(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Check that `path` may be moved to the trash right now.
///
/// Returns the file's current size on success.
///
/// # Errors
///
/// Returns the first failed condition as a [`DisposeError`].
pub fn check_eligible(path: &Path) -> Result<u64, DisposeError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DisposeError::NotFound(path.to_path_buf()),
        _ => DisposeError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    if !metadata.file_type().is_file() {
        return Err(DisposeError::NotAFile(path.to_path_buf()));
    }

    fs::File::open(path).map_err(|_| DisposeError::NotReadable(path.to_path_buf()))?;

    // Opening for write without truncate or create leaves the file untouched.
    OpenOptions::new()
        .write(true)
        .open(path)
        .map_err(|_| DisposeError::NotWritable(path.to_path_buf()))?;

    Ok(metadata.len())
}

/// Outcome of a disposal run.
#[derive(Debug, Clone, Default)]
pub struct DisposeReport {
    /// Paths moved to the trash.
    pub moved: Vec<PathBuf>,
    /// Paths that failed the eligibility check, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
    /// Eligible paths the trash refused.
    pub failed: Vec<PathBuf>,
    /// Total bytes moved to the trash.
    pub bytes_freed: u64,
    /// Whether the run stopped early on cancellation.
    pub interrupted: bool,
}

impl DisposeReport {
    /// Number of files moved to the trash.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.moved.len()
    }

    /// Number of pairs processed, whatever their outcome.
    #[must_use]
    pub fn processed_count(&self) -> usize {
        self.moved.len() + self.skipped.len() + self.failed.len()
    }

    /// Whether every processed pair was moved.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }

    /// One-line human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} file(s) moved to trash! ({} freed)",
            self.success_count(),
            ByteSize::b(self.bytes_freed)
        );
        if !self.skipped.is_empty() {
            line.push_str(&format!(", {} skipped", self.skipped.len()));
        }
        if !self.failed.is_empty() {
            line.push_str(&format!(", {} failed", self.failed.len()));
        }
        line
    }
}

/// Options for [`dispose`].
#[derive(Debug, Clone, Default)]
pub struct DisposeConfig {
    /// Cancellation flag checked before each pair.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
}

impl DisposeConfig {
    /// Set the cancellation flag.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Per-file progress for a disposal run.
pub trait DisposeProgressCallback: Send + Sync {
    /// Called before the pair at `index` (0-based, of `total`) is handled.
    fn on_before_dispose(&self, path: &Path, index: usize, total: usize);

    /// Called after a file was moved.
    fn on_moved(&self, path: &Path, size: u64);

    /// Called when a file was skipped as ineligible.
    fn on_skipped(&self, path: &Path, error: &DisposeError);

    /// Called when the trash refused an eligible file.
    fn on_failed(&self, path: &Path);

    /// Called once the run ends.
    fn on_complete(&self, report: &DisposeReport);
}

/// Move every disposable path in `result` to the trash.
///
/// Pairs are removed from the front of `result` before they are acted on,
/// whether or not the move succeeds. On cancellation the loop stops between
/// pairs and the untouched tail stays in `result`.
pub fn dispose<T>(
    result: &mut ScanResult,
    trash: &T,
    config: &DisposeConfig,
    callback: Option<&dyn DisposeProgressCallback>,
) -> DisposeReport
where
    T: TrashCapability + ?Sized,
{
    let mut report = DisposeReport::default();
    let total = result.len();
    let mut index = 0;

    while !result.is_empty() {
        if config.is_shutdown_requested() {
            log::info!(
                "Disposal interrupted, {} pair(s) left untouched",
                result.len()
            );
            report.interrupted = true;
            break;
        }

        let Some(pair) = result.pop_front() else {
            break;
        };
        let path = pair.dispose;

        if let Some(cb) = callback {
            cb.on_before_dispose(&path, index, total);
        }
        index += 1;

        match check_eligible(&path) {
            Ok(size) => {
                if trash.move_to_trash(&path) {
                    log::info!("Moved to trash: {} ({} bytes)", path.display(), size);
                    report.bytes_freed += size;
                    if let Some(cb) = callback {
                        cb.on_moved(&path, size);
                    }
                    report.moved.push(path);
                } else {
                    if let Some(cb) = callback {
                        cb.on_failed(&path);
                    }
                    report.failed.push(path);
                }
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                if let Some(cb) = callback {
                    cb.on_skipped(&path, &e);
                }
                report.skipped.push((path, e.to_string()));
            }
        }
    }

    if let Some(cb) = callback {
        cb.on_complete(&report);
    }

    log::info!("{}", report.summary());
    report
}
