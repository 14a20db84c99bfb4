//! Duplicate pairs and the ordered scan result.
//!
//! A [`ScanResult`] is the model the presentation layer renders: an ordered
//! queue of [`DuplicatePair`]s, also viewable as two index-aligned columns
//! (kept paths and disposable paths). It is independent of any widget; a
//! list view is only a downstream renderer of it.
//!
//! The trash executor consumes the result from the front, so a partially
//! completed disposal run leaves exactly the unprocessed tail behind.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// A disposable file and the earlier-discovered original it duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicatePair {
    /// The earliest-discovered copy; never touched by disposal.
    pub keep: PathBuf,
    /// A later-discovered, byte-identical copy that may be trashed.
    pub dispose: PathBuf,
}

impl DuplicatePair {
    /// Create a new pair.
    #[must_use]
    pub fn new(keep: PathBuf, dispose: PathBuf) -> Self {
        debug_assert_ne!(keep, dispose, "a file cannot duplicate itself");
        Self { keep, dispose }
    }
}

/// Ordered sequence of duplicate pairs from one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pairs: VecDeque<DuplicatePair>,
}

impl ScanResult {
    /// Create an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair in discovery order.
    pub fn push(&mut self, pair: DuplicatePair) {
        self.pairs.push_back(pair);
    }

    /// Remove and return the front pair.
    pub fn pop_front(&mut self) -> Option<DuplicatePair> {
        self.pairs.pop_front()
    }

    /// Peek at the front pair.
    #[must_use]
    pub fn front(&self) -> Option<&DuplicatePair> {
        self.pairs.front()
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the result holds no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Drop every pair.
    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    /// Iterate over the pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = &DuplicatePair> {
        self.pairs.iter()
    }

    /// The kept paths, index-aligned with [`ScanResult::dispose_paths`].
    #[must_use]
    pub fn kept_paths(&self) -> Vec<&Path> {
        self.pairs.iter().map(|p| p.keep.as_path()).collect()
    }

    /// The disposable paths, index-aligned with [`ScanResult::kept_paths`].
    #[must_use]
    pub fn dispose_paths(&self) -> Vec<&Path> {
        self.pairs.iter().map(|p| p.dispose.as_path()).collect()
    }

    /// Split into owned, index-aligned (kept, disposable) columns.
    #[must_use]
    pub fn into_columns(self) -> (Vec<PathBuf>, Vec<PathBuf>) {
        self.pairs.into_iter().map(|p| (p.keep, p.dispose)).unzip()
    }
}

impl FromIterator<DuplicatePair> for ScanResult {
    fn from_iter<I: IntoIterator<Item = DuplicatePair>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ScanResult {
    type Item = DuplicatePair;
    type IntoIter = std::collections::vec_deque::IntoIter<DuplicatePair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<'a> IntoIterator for &'a ScanResult {
    type Item = &'a DuplicatePair;
    type IntoIter = std::collections::vec_deque::Iter<'a, DuplicatePair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}
