//! Directory walker built on walkdir.
//!
//! # Overview
//!
//! [`Walker`] produces a lazy, depth-first sequence of regular-file paths
//! under a root. Directories whose name is in [`WalkerConfig::skip_dirs`]
//! are pruned through `filter_entry`, so walkdir never opens them and
//! errors inside them are never reported.
//!
//! Symbolic links are not followed and are not yielded. Other non-regular
//! entries (sockets, fifos, devices) are skipped silently.
//!
//! # Example
//!
//! ```no_run
//! use dupeprune::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::io;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{ScanError, WalkerConfig};

/// Depth-first file enumerator for one root.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Root this walker enumerates.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether walkdir should descend into (or yield) this entry.
    ///
    /// The root is always accepted so a root named like an excluded
    /// directory is still scanned.
    fn should_descend(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        let skip = entry
            .file_name()
            .to_str()
            .is_some_and(|name| self.config.skip_dirs.contains(name));
        if skip {
            log::debug!("Skipping excluded directory: {}", entry.path().display());
        }
        !skip
    }

    /// Walk the directory tree, yielding regular-file paths.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration; walkdir continues with the next sibling. Each call starts
    /// a fresh traversal.
    pub fn walk(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| self.should_descend(entry))
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    if entry.file_type().is_file() {
                        Some(Ok(entry.into_path()))
                    } else {
                        if !entry.file_type().is_dir() {
                            log::trace!("Skipping non-regular entry: {}", entry.path().display());
                        }
                        None
                    }
                }
                Err(err) => {
                    let path = err
                        .path()
                        .map_or_else(|| self.root.clone(), Path::to_path_buf);
                    let io_err = err
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "filesystem loop"));
                    let scan_err = ScanError::from_io(path, io_err);
                    log::warn!("{}", scan_err);
                    Some(Err(scan_err))
                }
            })
    }

    /// Walk and split the results into file paths and enumeration errors.
    #[must_use]
    pub fn collect_files(&self) -> (Vec<PathBuf>, Vec<ScanError>) {
        let mut files = Vec::new();
        let mut errors = Vec::new();
        for item in self.walk() {
            match item {
                Ok(path) => files.push(path),
                Err(e) => errors.push(e),
            }
        }
        (files, errors)
    }
}
