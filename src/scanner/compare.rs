//! Byte-exact content comparison of two files.
//!
//! # Overview
//!
//! [`Comparator`] streams both files in lockstep through two fixed-size
//! buffers and stops at the first differing chunk, so memory use is bounded
//! regardless of file size and unequal files are usually rejected after the
//! first read.
//!
//! Comparison fails closed: any I/O error on either side is logged and the
//! files are reported as different. A single unreadable file never aborts a
//! scan.
//!
//! # Example
//!
//! ```no_run
//! use dupes2trash::scanner::Comparator;
//! use std::path::Path;
//!
//! let comparator = Comparator::new();
//! if comparator.equal(Path::new("a.bin"), Path::new("b.bin")) {
//!     println!("identical");
//! }
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default chunk size for streaming comparison (8 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Largest chunk size accepted (16 MiB). Larger requests are clamped.
pub const MAX_CHUNK_SIZE: usize = 16 * 1024 * 1024;

/// Errors that can occur while comparing two files.
#[derive(Debug, Error)]
pub enum CompareError {
    /// The file was not found (it may have been deleted after the walk).
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when opening or reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Any other I/O error while opening or reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl CompareError {
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Streaming, bounded-memory file comparator.
#[derive(Debug, Clone, Copy)]
pub struct Comparator {
    chunk_size: usize,
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new()
    }
}

impl Comparator {
    /// Create a comparator with the default 8 KiB chunk size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Create a comparator with a custom chunk size, clamped to
    /// `1..=MAX_CHUNK_SIZE`.
    #[must_use]
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.clamp(1, MAX_CHUNK_SIZE),
        }
    }

    /// The chunk size used for each read.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Decide whether two files have identical content.
    ///
    /// Returns `false` on any I/O error.
    #[must_use]
    pub fn equal(&self, a: &Path, b: &Path) -> bool {
        match self.try_equal(a, b) {
            Ok(equal) => equal,
            Err(e) => {
                log::warn!("Treating files as different: {}", e);
                false
            }
        }
    }

    /// Compare two files, surfacing I/O errors.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError`] if either file cannot be opened, inspected,
    /// or read.
    pub fn try_equal(&self, a: &Path, b: &Path) -> Result<bool, CompareError> {
        if a == b {
            return Ok(true);
        }

        let mut file_a = File::open(a).map_err(|e| CompareError::from_io(a, e))?;
        let mut file_b = File::open(b).map_err(|e| CompareError::from_io(b, e))?;

        // Sizes were matched during grouping, but either file may have
        // changed since then.
        let len_a = file_a
            .metadata()
            .map_err(|e| CompareError::from_io(a, e))?
            .len();
        let len_b = file_b
            .metadata()
            .map_err(|e| CompareError::from_io(b, e))?
            .len();
        if len_a != len_b {
            log::debug!(
                "Length mismatch: {} ({} bytes) vs {} ({} bytes)",
                a.display(),
                len_a,
                b.display(),
                len_b
            );
            return Ok(false);
        }

        // Small files never need a full-size buffer.
        let buf_len = usize::try_from(len_a)
            .unwrap_or(usize::MAX)
            .clamp(1, self.chunk_size);
        let mut buf_a = vec![0u8; buf_len];
        let mut buf_b = vec![0u8; buf_len];

        loop {
            let n_a = fill_chunk(&mut file_a, &mut buf_a).map_err(|e| CompareError::from_io(a, e))?;
            let n_b = fill_chunk(&mut file_b, &mut buf_b).map_err(|e| CompareError::from_io(b, e))?;

            if n_a != n_b {
                log::debug!(
                    "Read length diverged between {} and {} (file changed during comparison?)",
                    a.display(),
                    b.display()
                );
                return Ok(false);
            }
            if n_a == 0 {
                return Ok(true);
            }
            if buf_a[..n_a] != buf_b[..n_b] {
                log::trace!("Content differs: {} vs {}", a.display(), b.display());
                return Ok(false);
            }
        }
    }
}

/// Read until `buf` is full or the reader hits end-of-file.
///
/// Returns the number of bytes read; anything less than `buf.len()` means
/// end-of-file was reached.
fn fill_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Compare two files with the default chunk size.
#[must_use]
pub fn files_equal(a: &Path, b: &Path) -> bool {
    Comparator::new().equal(a, b)
}
