//! Digest index construction.
//!
//! # Overview
//!
//! A [`ChecksumIndex`] maps each [`Digest`] to the records that share it.
//! It is built single-threaded from a [`HashOutcome`] after the worker pool
//! has finished. The order of records inside a group follows merge order
//! and carries no meaning; [`ChecksumIndex::groups`] and
//! [`ChecksumIndex::paths_for`] hand out sorted views so callers never
//! depend on it.
//!
//! # Example
//!
//! ```
//! use dupeprune::duplicates::ChecksumIndex;
//! use dupeprune::scanner::{Digest, FileRecord};
//! use std::path::PathBuf;
//!
//! let digest = Digest::from_bytes([7; 16]);
//! let index = ChecksumIndex::from_records(vec![
//!     FileRecord::new(PathBuf::from("/b.txt"), Some(3), digest),
//!     FileRecord::new(PathBuf::from("/a.txt"), Some(3), digest),
//! ]);
//!
//! assert_eq!(index.len(), 1);
//! assert_eq!(index.file_count(), 2);
//! assert_eq!(index.duplicate_group_count(), 1);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use crate::scanner::{Digest, FileRecord, HashOutcome};

/// Mapping from digest to the records sharing it.
#[derive(Debug, Clone, Default)]
pub struct ChecksumIndex {
    groups: HashMap<Digest, Vec<FileRecord>>,
}

impl ChecksumIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from hashed records.
    #[must_use]
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = FileRecord>,
    {
        let mut index = Self::new();
        for record in records {
            index.insert(record);
        }
        index
    }

    /// Build an index from the successful part of a hashing run.
    /// Failed files are not present in the outcome's records and are
    /// therefore never indexed.
    #[must_use]
    pub fn from_outcome(outcome: &HashOutcome) -> Self {
        Self::from_records(outcome.records.iter().cloned())
    }

    /// Insert one record under its digest.
    pub fn insert(&mut self, record: FileRecord) {
        self.groups.entry(record.digest).or_default().push(record);
    }

    /// Number of distinct digests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the index holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of indexed records.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Number of digests shared by two or more records.
    #[must_use]
    pub fn duplicate_group_count(&self) -> usize {
        self.groups.values().filter(|g| g.len() > 1).count()
    }

    /// Whether any record has this digest.
    #[must_use]
    pub fn contains(&self, digest: &Digest) -> bool {
        self.groups.contains_key(digest)
    }

    /// Records with this digest, in arbitrary order.
    #[must_use]
    pub fn get(&self, digest: &Digest) -> Option<&[FileRecord]> {
        self.groups.get(digest).map(Vec::as_slice)
    }

    /// Paths with this digest, sorted by [`keep_order`](super::policy::keep_order).
    #[must_use]
    pub fn paths_for(&self, digest: &Digest) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .get(digest)
            .unwrap_or_default()
            .iter()
            .map(|r| r.path.clone())
            .collect();
        paths.sort_by(|a, b| super::policy::keep_order(a, b));
        paths
    }

    /// All groups sorted by digest. Records inside each group stay in
    /// arbitrary order.
    #[must_use]
    pub fn groups(&self) -> Vec<(&Digest, &[FileRecord])> {
        let mut groups: Vec<_> = self
            .groups
            .iter()
            .map(|(d, records)| (d, records.as_slice()))
            .collect();
        groups.sort_by(|a, b| a.0.cmp(b.0));
        groups
    }
}
