//! Deduplication policies.
//!
//! # Overview
//!
//! Both policies are pure: they read one or two [`ChecksumIndex`] values and
//! return an immutable [`RemovalPlan`] without touching the filesystem.
//!
//! - [`dedup_against_reference`]: every target file whose digest also occurs
//!   in the reference index is removed; reference files are always kept.
//! - [`dedup_within_tree`]: in each group of two or more files the first by
//!   [`keep_order`] is kept and the rest are removed.
//!
//! Plans list removals grouped by digest (ascending) and, inside a group, in
//! [`keep_order`]. Neither depends on the order in which hashing finished.
//!
//! # Example
//!
//! ```
//! use dupeprune::duplicates::{dedup_within_tree, ChecksumIndex};
//! use dupeprune::scanner::{Digest, FileRecord};
//! use std::path::PathBuf;
//!
//! let digest = Digest::from_bytes([1; 16]);
//! let index = ChecksumIndex::from_records(vec![
//!     FileRecord::new(PathBuf::from("bb/y.txt"), None, digest),
//!     FileRecord::new(PathBuf::from("a/x.txt"), None, digest),
//! ]);
//!
//! let plan = dedup_within_tree(&index);
//! assert_eq!(plan.len(), 1);
//! assert_eq!(plan.removals()[0].path, PathBuf::from("bb/y.txt"));
//! assert_eq!(plan.removals()[0].kept, Some(PathBuf::from("a/x.txt")));
//! ```

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use super::ChecksumIndex;
use crate::scanner::{Digest, FileRecord};

/// Tie-break order for choosing which copy to keep.
///
/// Shorter paths (in characters) sort first; equal lengths fall back to
/// lexicographic order of the path text, then of the raw OS string so that
/// names differing only in non-UTF-8 bytes still have a fixed order.
///
/// # Examples
///
/// ```
/// use dupeprune::duplicates::keep_order;
/// use std::cmp::Ordering;
/// use std::path::Path;
///
/// assert_eq!(keep_order(Path::new("a/x.txt"), Path::new("bb/y.txt")), Ordering::Less);
/// assert_eq!(keep_order(Path::new("b/x.txt"), Path::new("a/x.txt")), Ordering::Greater);
/// ```
#[must_use]
pub fn keep_order(a: &Path, b: &Path) -> Ordering {
    let a_text = a.to_string_lossy();
    let b_text = b.to_string_lossy();
    a_text
        .chars()
        .count()
        .cmp(&b_text.chars().count())
        .then_with(|| a_text.cmp(&b_text))
        .then_with(|| a.as_os_str().cmp(b.as_os_str()))
}

fn sorted_records(records: &[FileRecord]) -> Vec<&FileRecord> {
    let mut sorted: Vec<&FileRecord> = records.iter().collect();
    sorted.sort_by(|a, b| keep_order(&a.path, &b.path));
    sorted
}

/// Why a path was planned for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    /// Content also exists in the reference tree.
    InReference,
    /// Another copy in the same tree sorts first and is kept.
    DuplicateInTree,
}

impl fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemovalReason::InReference => write!(f, "content exists in reference"),
            RemovalReason::DuplicateInTree => write!(f, "duplicate within tree"),
        }
    }
}

/// One planned removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRemoval {
    /// Path to remove
    pub path: PathBuf,
    /// Why it is removed
    pub reason: RemovalReason,
    /// The copy that survives (for reference dedup, the first reference
    /// copy by [`keep_order`])
    pub kept: Option<PathBuf>,
    /// Shared content digest
    pub digest: Digest,
    /// Size at hashing time, if known
    pub size: Option<u64>,
}

/// Immutable removal plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalPlan {
    removals: Vec<PlannedRemoval>,
    kept: BTreeSet<PathBuf>,
}

impl RemovalPlan {
    fn new(removals: Vec<PlannedRemoval>, kept: BTreeSet<PathBuf>) -> Self {
        debug_assert!(
            removals.iter().all(|r| !kept.contains(&r.path)),
            "a path cannot be both kept and removed"
        );
        Self { removals, kept }
    }

    /// Planned removals, in execution order.
    #[must_use]
    pub fn removals(&self) -> &[PlannedRemoval] {
        &self.removals
    }

    /// Paths the plan keeps.
    #[must_use]
    pub fn kept(&self) -> &BTreeSet<PathBuf> {
        &self.kept
    }

    /// Paths planned for removal, in execution order.
    #[must_use]
    pub fn removal_paths(&self) -> Vec<&Path> {
        self.removals.iter().map(|r| r.path.as_path()).collect()
    }

    /// Number of planned removals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.removals.len()
    }

    /// Whether nothing is planned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty()
    }

    /// Sum of known sizes of planned removals.
    #[must_use]
    pub fn planned_bytes(&self) -> u64 {
        self.removals.iter().filter_map(|r| r.size).sum()
    }
}

/// Plan removal of every target file whose content exists in `reference`.
///
/// Reference files are always kept. A target path that also appears in the
/// reference index (overlapping roots) is left alone rather than planned
/// for removal.
#[must_use]
pub fn dedup_against_reference(
    reference: &ChecksumIndex,
    target: &ChecksumIndex,
) -> RemovalPlan {
    let mut removals = Vec::new();
    let mut kept = BTreeSet::new();

    for (digest, target_records) in target.groups() {
        let Some(reference_records) = reference.get(digest) else {
            continue;
        };

        let reference_sorted = sorted_records(reference_records);
        kept.extend(reference_sorted.iter().map(|r| r.path.clone()));
        let survivor = reference_sorted.first().map(|r| r.path.clone());

        for record in sorted_records(target_records) {
            if kept.contains(&record.path) {
                log::warn!(
                    "{} is reachable from both roots, leaving it in place",
                    record.path.display()
                );
                continue;
            }
            removals.push(PlannedRemoval {
                path: record.path.clone(),
                reason: RemovalReason::InReference,
                kept: survivor.clone(),
                digest: *digest,
                size: record.size,
            });
        }
    }

    log::debug!(
        "Reference plan: {} removal(s), {} reference file(s) kept",
        removals.len(),
        kept.len()
    );

    RemovalPlan::new(removals, kept)
}

/// Plan removal of all but one copy in every duplicate group.
///
/// The survivor of each group is the first path by [`keep_order`], so the
/// plan is the same for the same file set whatever order hashing finished in.
#[must_use]
pub fn dedup_within_tree(index: &ChecksumIndex) -> RemovalPlan {
    let mut removals = Vec::new();
    let mut kept = BTreeSet::new();

    for (digest, records) in index.groups() {
        if records.len() < 2 {
            continue;
        }

        let sorted = sorted_records(records);
        let (survivor, rest) = match sorted.split_first() {
            Some(split) => split,
            None => continue,
        };
        kept.insert(survivor.path.clone());

        removals.extend(rest.iter().map(|record| PlannedRemoval {
            path: record.path.clone(),
            reason: RemovalReason::DuplicateInTree,
            kept: Some(survivor.path.clone()),
            digest: *digest,
            size: record.size,
        }));
    }

    log::debug!(
        "Within-tree plan: {} removal(s), {} group(s) kept one copy",
        removals.len(),
        kept.len()
    );

    RemovalPlan::new(removals, kept)
}
