//! Size-based file grouping.
//!
//! # Overview
//!
//! Grouping by exact byte length is the cheap pre-filter of duplicate
//! detection: files of different sizes cannot be identical, so only groups
//! with two or more members go on to content comparison.
//!
//! Empty files form a normal group. All zero-length files are identical, so
//! a tree with N empty files yields N-1 duplicate pairs.
//!
//! # Example
//!
//! ```
//! use dupes2trash::scanner::FileRecord;
//! use dupes2trash::duplicates::group_by_size;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileRecord::new(PathBuf::from("/file1.txt"), 1024),
//!     FileRecord::new(PathBuf::from("/file2.txt"), 1024),
//!     FileRecord::new(PathBuf::from("/file3.txt"), 2048),
//! ];
//!
//! let (groups, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.candidate_files, 2);
//! assert_eq!(groups.len(), 1);
//! ```

use std::collections::HashMap;

use crate::scanner::FileRecord;

/// Files sharing one exact byte length, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeGroup {
    /// File size in bytes (shared by all files in this group)
    pub size: u64,
    /// Files with this exact size, in discovery order
    pub files: Vec<FileRecord>,
}

impl SizeGroup {
    /// Create a size group with initial files.
    #[must_use]
    pub fn with_files(size: u64, files: Vec<FileRecord>) -> Self {
        Self { size, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check if this group can contain duplicates (2+ files).
    #[must_use]
    pub fn is_candidate(&self) -> bool {
        self.files.len() > 1
    }
}

/// Statistics from size grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of distinct file sizes
    pub unique_sizes: usize,
    /// Files dropped because no other file shares their size
    pub eliminated_unique: usize,
    /// Files left in groups of two or more
    pub candidate_files: usize,
    /// Number of groups with two or more files
    pub candidate_groups: usize,
    /// Number of zero-length files seen
    pub empty_files: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group files by exact size.
///
/// Returns only groups with two or more members. Groups appear in the order
/// their first member was discovered and keep their members in discovery
/// order, so pairing over the result is deterministic.
///
/// # Example
///
/// ```
/// use dupes2trash::scanner::FileRecord;
/// use dupes2trash::duplicates::group_by_size;
/// use std::path::PathBuf;
///
/// let files = vec![
///     FileRecord::new(PathBuf::from("/a.txt"), 100),
///     FileRecord::new(PathBuf::from("/c.txt"), 200),
///     FileRecord::new(PathBuf::from("/b.txt"), 100),
/// ];
///
/// let (groups, stats) = group_by_size(files);
///
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].size, 100);
/// assert_eq!(groups[0].files[1].path, PathBuf::from("/b.txt"));
/// assert_eq!(stats.eliminated_unique, 1);
/// ```
#[must_use]
pub fn group_by_size(files: impl IntoIterator<Item = FileRecord>) -> (Vec<SizeGroup>, GroupingStats) {
    let mut stats = GroupingStats::default();
    let mut groups: Vec<SizeGroup> = Vec::new();
    let mut index_by_size: HashMap<u64, usize> = HashMap::new();

    for file in files {
        stats.total_files += 1;
        stats.total_size += file.size;
        if file.size == 0 {
            stats.empty_files += 1;
        }

        match index_by_size.get(&file.size) {
            Some(&idx) => groups[idx].files.push(file),
            None => {
                index_by_size.insert(file.size, groups.len());
                groups.push(SizeGroup::with_files(file.size, vec![file]));
            }
        }
    }

    stats.unique_sizes = groups.len();

    groups.retain(|group| {
        if group.is_candidate() {
            stats.candidate_files += group.len();
            stats.candidate_groups += 1;
            log::trace!(
                "Size group {} bytes: {} candidates",
                group.size,
                group.len()
            );
            true
        } else {
            stats.eliminated_unique += group.len();
            false
        }
    });

    log::debug!(
        "Size grouping: {} files -> {} candidates in {} groups ({:.1}% eliminated)",
        stats.total_files,
        stats.candidate_files,
        stats.candidate_groups,
        stats.elimination_rate()
    );

    (groups, stats)
}
