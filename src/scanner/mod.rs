//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Lazy depth-first directory walking using walkdir
//! - Streaming content digests (XXH3-128 or BLAKE3)
//! - Parallel hashing on a bounded worker pool
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal with name-based subtree exclusion
//! - [`hasher`]: Single-file streaming digest
//! - [`pool`]: Parallel hashing of an enumerated file list
//!
//! # Example
//!
//! ```no_run
//! use dupeprune::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig::default().with_skip_dirs(vec![".git".to_string()]);
//!
//! let walker = Walker::new(Path::new("."), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(path) => println!("{}", path.display()),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod pool;
pub mod walker;

use std::collections::HashSet;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

pub use hasher::{Digest, HashAlgorithm, Hasher, READ_CHUNK_SIZE};
pub use pool::{hash_files, resolve_workers, HashOutcome, HashRunConfig};
pub use walker::Walker;

/// A successfully hashed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path to the file as discovered under its root
    pub path: PathBuf,
    /// File size in bytes, when metadata was readable
    pub size: Option<u64>,
    /// Content digest
    pub digest: Digest,
}

impl FileRecord {
    /// Create a new file record.
    #[must_use]
    pub fn new(path: PathBuf, size: Option<u64>, digest: Digest) -> Self {
        Self { path, size, digest }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Directory names whose subtrees are never descended into.
    /// Matched against the final path component only.
    pub skip_dirs: HashSet<String>,
}

impl WalkerConfig {
    /// Set the excluded directory names. Empty names are dropped.
    #[must_use]
    pub fn with_skip_dirs<I>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.skip_dirs = names.into_iter().filter(|n| !n.is_empty()).collect();
        self
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ScanError {
    /// Permission was denied when listing a directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The path disappeared during the walk.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while listing a directory.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: Arc<io::Error>,
    },
}

impl ScanError {
    pub(crate) fn from_io(path: PathBuf, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io {
                path,
                source: Arc::new(err),
            },
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug, Clone)]
pub enum HashError {
    /// The file was not found (possibly removed mid-run).
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Hashing was skipped because shutdown was requested.
    #[error("Interrupted before hashing: {0}")]
    Interrupted(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: Arc<io::Error>,
    },
}

impl HashError {
    pub(crate) fn from_io(path: PathBuf, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io {
                path,
                source: Arc::new(err),
            },
        }
    }

    /// Path of the file that failed.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Interrupted(p) => p,
            Self::Io { path, .. } => path,
        }
    }
}
