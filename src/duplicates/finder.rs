//! Duplicate pairing and the detection pipeline.
//!
//! # Overview
//!
//! This module turns size groups into an ordered [`ScanResult`]:
//! 1. **Walk**: enumerate regular files under the root
//! 2. **Group**: bucket files by exact size (see [`crate::duplicates::groups`])
//! 3. **Pair**: within each group, compare files pairwise and record
//!    `(keep, dispose)` pairs
//!
//! # Pairing policy
//!
//! For a group `f0, f1, ..., fk` in discovery order, every `fi` is compared
//! against each later `fj` that has not yet been claimed as a duplicate. A
//! match records `(fi, fj)` and claims `fj`, so each file is disposable on
//! account of exactly one kept original. Claimed files are not used as
//! comparison sources. Three identical files `a, b, c` therefore yield
//! `(a, b)` and `(a, c)`, never `(b, c)`.
//!
//! Each group costs O(k²) comparisons in the worst case, but every
//! comparison stops at the first differing chunk.
//!
//! # Example
//!
//! ```no_run
//! use dupes2trash::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let (result, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! for pair in &result {
//!     println!("{} <- {}", pair.keep.display(), pair.dispose.display());
//! }
//! println!("{} reclaimable", summary.reclaimable_display());
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::{group_by_size, DuplicatePair, ScanResult, SizeGroup};
use crate::progress::{ProgressCallback, PHASE_COMPARE, PHASE_WALK};
use crate::scanner::{Comparator, Walker, WalkerConfig, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};

/// Configuration for the pairing phase.
#[derive(Clone)]
pub struct PairerConfig {
    /// Chunk size for content comparison.
    pub chunk_size: usize,
    /// Optional cancellation flag, checked before every comparison source.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for PairerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PairerConfig")
            .field("chunk_size", &self.chunk_size)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for PairerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl PairerConfig {
    /// Set the comparison chunk size, clamped to `1..=MAX_CHUNK_SIZE`.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.clamp(1, MAX_CHUNK_SIZE);
        self
    }

    /// Set the cancellation flag.
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

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Statistics from the pairing phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairStats {
    /// Files that entered pairing (members of candidate groups)
    pub input_files: usize,
    /// Files whose turn as comparison source has completed
    pub compared_files: usize,
    /// Number of content comparisons performed
    pub comparisons: usize,
    /// Number of disposable files found (one per pair)
    pub duplicate_files: usize,
    /// Bytes that disposing every duplicate would free
    pub reclaimable_bytes: u64,
    /// Whether pairing stopped early on cancellation
    pub interrupted: bool,
}

/// Outcome of pairing: the ordered result plus statistics.
#[derive(Debug, Clone, Default)]
pub struct PairOutcome {
    /// Pairs in discovery order
    pub result: ScanResult,
    /// Pairing statistics
    pub stats: PairStats,
}

/// Pair byte-identical files within each size group.
///
/// Groups are processed in the order given and members in their stored
/// order. After each comparison source finishes, the cumulative number of
/// processed files is reported to the progress callback. Cancellation is
/// checked before each source; when observed, the pairs found so far are
/// returned with `stats.interrupted` set.
///
/// # Example
///
/// ```no_run
/// use dupes2trash::duplicates::{group_by_size, pair_duplicates, PairerConfig};
/// use dupes2trash::scanner::walk;
/// use std::path::Path;
///
/// let (groups, _) = group_by_size(walk(Path::new(".")));
/// let outcome = pair_duplicates(&groups, &PairerConfig::default());
/// println!("{} duplicates", outcome.result.len());
/// ```
#[must_use]
pub fn pair_duplicates(groups: &[SizeGroup], config: &PairerConfig) -> PairOutcome {
    let comparator = Comparator::with_chunk_size(config.chunk_size);
    let mut outcome = PairOutcome::default();
    let stats = &mut outcome.stats;
    stats.input_files = groups.iter().map(SizeGroup::len).sum();

    if let Some(ref cb) = config.progress_callback {
        cb.on_phase_start(PHASE_COMPARE, stats.input_files);
    }

    'groups: for group in groups {
        let files = &group.files;
        // Indices (within this group) already recorded as a dispose path.
        let mut claimed: HashSet<usize> = HashSet::new();

        for i in 0..files.len() {
            if config.is_shutdown_requested() {
                log::info!(
                    "Pairing interrupted after {} of {} files",
                    stats.compared_files,
                    stats.input_files
                );
                stats.interrupted = true;
                break 'groups;
            }

            let source = &files[i];
            if !claimed.contains(&i) {
                for (j, candidate) in files.iter().enumerate().skip(i + 1) {
                    if claimed.contains(&j) || candidate.path == source.path {
                        continue;
                    }

                    stats.comparisons += 1;
                    if comparator.equal(&source.path, &candidate.path) {
                        let pair = DuplicatePair::new(source.path.clone(), candidate.path.clone());
                        log::debug!(
                            "Duplicate: {} == {}",
                            pair.keep.display(),
                            pair.dispose.display()
                        );
                        if let Some(ref cb) = config.progress_callback {
                            cb.on_pair_found(&pair);
                        }
                        claimed.insert(j);
                        stats.duplicate_files += 1;
                        stats.reclaimable_bytes += group.size;
                        outcome.result.push(pair);
                    }
                }
            }

            stats.compared_files += 1;
            if let Some(ref cb) = config.progress_callback {
                cb.on_progress(stats.compared_files, &source.path.to_string_lossy());
            }
        }
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_phase_end(PHASE_COMPARE);
    }

    outcome
}

/// Configuration for the duplicate finder.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Pairing configuration (chunk size, cancellation, progress).
    pub pairer_config: PairerConfig,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("pairer_config", &self.pairer_config)
            .finish()
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the comparison chunk size.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.pairer_config = self.pairer_config.with_chunk_size(chunk_size);
        self
    }

    /// Set the cancellation flag for both walking and pairing.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.pairer_config = self.pairer_config.with_shutdown_flag(flag);
        self
    }

    /// Set the progress callback for both walking and pairing.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.pairer_config = self.pairer_config.with_progress_callback(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.pairer_config.is_shutdown_requested()
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Total number of files found by the walk
    pub total_files: usize,
    /// Total size of all files found, in bytes
    pub total_size: u64,
    /// Entries skipped during the walk (unreadable, vanished)
    pub skipped_entries: usize,
    /// Files sharing their size with at least one other file
    pub candidate_files: usize,
    /// Content comparisons performed
    pub comparisons: usize,
    /// Number of duplicate pairs (one per disposable file)
    pub duplicate_files: usize,
    /// Space that disposing every duplicate would free
    pub reclaimable_space: u64,
    /// Duration of the entire scan
    pub scan_duration: Duration,
    /// Whether the scan was cancelled before finishing
    pub interrupted: bool,
}

impl ScanSummary {
    /// Format reclaimable space as a human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Format total size as a human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize::b(self.total_size).to_string()
    }
}

/// Errors that keep a scan from starting.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

impl FinderError {
    /// The rejected root path.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PathNotFound(p) | Self::NotADirectory(p) => p,
        }
    }
}

/// Runs walk, size grouping, and pairing for one root directory.
///
/// # Example
///
/// ```no_run
/// use dupes2trash::duplicates::DuplicateFinder;
/// use std::path::Path;
///
/// let finder = DuplicateFinder::with_defaults();
/// match finder.find_duplicates(Path::new(".")) {
///     Ok((result, summary)) => {
///         println!("Found {} duplicate files", result.len());
///         println!("Can reclaim {}", summary.reclaimable_display());
///     }
///     Err(e) => eprintln!("Scan did not start: {}", e),
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Check that `path` is an existing directory.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::PathNotFound`] or [`FinderError::NotADirectory`].
    pub fn validate_root(path: &Path) -> Result<(), FinderError> {
        if !path.exists() {
            return Err(FinderError::PathNotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(FinderError::NotADirectory(path.to_path_buf()));
        }
        Ok(())
    }

    /// Find all duplicate files under `path`.
    ///
    /// Cancellation is not an error: the pairs found so far are returned and
    /// `summary.interrupted` is set.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] if the path does not exist or is not a
    /// directory.
    pub fn find_duplicates(&self, path: &Path) -> Result<(ScanResult, ScanSummary), FinderError> {
        let start_time = Instant::now();
        Self::validate_root(path)?;

        log::info!("Starting duplicate scan of {}", path.display());

        let callback = self.config.pairer_config.progress_callback.clone();
        if let Some(ref cb) = callback {
            cb.on_phase_start(PHASE_WALK, 0);
            cb.on_message(&format!("Walking {}", path.display()));
        }

        let mut walker = Walker::new(path, self.config.walker_config.clone());
        if let Some(ref flag) = self.config.pairer_config.shutdown_flag {
            walker = walker.with_shutdown_flag(Arc::clone(flag));
        }
        if let Some(ref cb) = callback {
            walker = walker.with_progress_callback(Arc::clone(cb));
        }
        let (files, errors) = walker.collect_files();

        if let Some(ref cb) = callback {
            cb.on_phase_end(PHASE_WALK);
        }

        let mut summary = ScanSummary {
            skipped_entries: errors.len(),
            ..ScanSummary::default()
        };

        if self.config.is_shutdown_requested() {
            log::info!("Scan interrupted during walk");
            summary.total_files = files.len();
            summary.total_size = files.iter().map(|f| f.size).sum();
            summary.interrupted = true;
            summary.scan_duration = start_time.elapsed();
            return Ok((ScanResult::new(), summary));
        }

        let (groups, grouping) = group_by_size(files);
        summary.total_files = grouping.total_files;
        summary.total_size = grouping.total_size;
        summary.candidate_files = grouping.candidate_files;

        log::info!(
            "Found {} files ({}), {} share a size with another file",
            summary.total_files,
            summary.total_size_display(),
            summary.candidate_files
        );

        let outcome = pair_duplicates(&groups, &self.config.pairer_config);
        summary.comparisons = outcome.stats.comparisons;
        summary.duplicate_files = outcome.stats.duplicate_files;
        summary.reclaimable_space = outcome.stats.reclaimable_bytes;
        summary.interrupted = outcome.stats.interrupted;
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan {}: {} duplicate files, {} reclaimable, {} comparisons",
            if summary.interrupted { "interrupted" } else { "complete" },
            summary.duplicate_files,
            summary.reclaimable_display(),
            summary.comparisons
        );

        Ok((outcome.result, summary))
    }
}
