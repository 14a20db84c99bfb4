//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping (cheap pre-filter)
//! - Pairwise byte-exact confirmation within each size group
//! - The ordered `(keep, dispose)` result model

pub mod finder;
pub mod groups;
pub mod result;

pub use finder::{
    pair_duplicates, DuplicateFinder, FinderConfig, FinderError, PairOutcome, PairStats,
    PairerConfig, ScanSummary,
};
pub use groups::{group_by_size, GroupingStats, SizeGroup};
pub use result::{DuplicatePair, ScanResult};
