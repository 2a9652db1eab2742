//! Empty directory removal.
//!
//! # Overview
//!
//! [`prune_empty_dirs`] visits the tree bottom-up and removes every directory
//! that has no entries at the moment it is checked. Children are visited
//! before their parent, so a chain such as `a/b/c` collapses in a single
//! pass. Passes repeat until one removes nothing.
//!
//! Dry-run removes nothing but remembers every directory it would remove;
//! a directory whose only entries are such directories counts as empty, so
//! dry-run reports the same cascade a real run performs.
//!
//! The root is the scan boundary and is only removed when
//! [`PruneConfig::include_root`] is set. Subtrees named in
//! [`PruneConfig::skip_dirs`] are left alone, like in the dedup walk.

use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::{DirEntry, WalkDir};

use crate::report::PruneReport;

/// Configuration for an empty-directory pass.
#[derive(Debug, Clone, Default)]
pub struct PruneConfig {
    /// Report decisions without touching the filesystem.
    pub dry_run: bool,
    /// Also remove the root if it ends up empty.
    pub include_root: bool,
    /// Directory names never descended into below the root.
    pub skip_dirs: HashSet<String>,
    /// Paths treated as already gone when checking emptiness, such as
    /// files a dry-run dedup pass would have removed.
    pub assume_removed: HashSet<PathBuf>,
    /// Set by the Ctrl+C handler; checked before each directory.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
}

impl PruneConfig {
    /// Enable or disable dry-run.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Allow removing the root itself.
    #[must_use]
    pub fn with_include_root(mut self, include_root: bool) -> Self {
        self.include_root = include_root;
        self
    }

    /// Set the excluded directory names. Empty names are ignored.
    #[must_use]
    pub fn with_skip_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_dirs = names
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| !name.is_empty())
            .collect();
        self
    }

    /// Treat these paths as already removed.
    #[must_use]
    pub fn with_assume_removed<I>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.assume_removed = paths.into_iter().collect();
        self
    }

    /// Set the shutdown flag.
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

    fn is_skipped(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.skip_dirs.contains(name))
    }
}

struct Pruner<'a, W: Write> {
    root: &'a Path,
    config: &'a PruneConfig,
    out: &'a mut W,
    report: PruneReport,
    /// Directories removed, or scheduled for removal under dry-run, plus
    /// [`PruneConfig::assume_removed`].
    gone: HashSet<PathBuf>,
    /// Paths that already produced an error line.
    failed: HashSet<PathBuf>,
}

impl<W: Write> Pruner<'_, W> {
    fn record_error(
        &mut self,
        path: &Path,
        action: &str,
        reason: &dyn std::fmt::Display,
    ) -> io::Result<()> {
        if !self.failed.insert(path.to_path_buf()) {
            return Ok(());
        }
        log::warn!("Failed to {} {}: {}", action, path.display(), reason);
        let line = format!("error: failed to {} {}: {}", action, path.display(), reason);
        writeln!(self.out, "{line}")?;
        self.report.errors.push(line);
        Ok(())
    }

    /// Live emptiness check. Entries already removed or scheduled do not count.
    fn is_empty(&mut self, dir: &Path) -> io::Result<Option<bool>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                self.record_error(dir, "list", &e)?;
                return Ok(None);
            }
        };

        for entry in entries {
            match entry {
                Ok(entry) if self.gone.contains(&entry.path()) => {}
                Ok(_) => return Ok(Some(false)),
                Err(e) => {
                    self.record_error(dir, "list", &e)?;
                    return Ok(None);
                }
            }
        }
        Ok(Some(true))
    }

    fn remove(&mut self, dir: &Path) -> io::Result<bool> {
        if self.config.dry_run {
            writeln!(self.out, "[dry-run] remove {}", dir.display())?;
        } else {
            match fs::remove_dir(dir) {
                Ok(()) => writeln!(self.out, "removed {}", dir.display())?,
                Err(e) => {
                    self.record_error(dir, "remove", &e)?;
                    return Ok(false);
                }
            }
        }
        self.gone.insert(dir.to_path_buf());
        self.report.dirs_removed += 1;
        Ok(true)
    }

    /// Directories under the root, children before parents and siblings in
    /// name order. Skipped subtrees are never opened.
    fn directories(&mut self) -> io::Result<Vec<PathBuf>> {
        let config = self.config;
        let walker = WalkDir::new(self.root)
            .follow_links(false)
            .sort_by(|a, b| b.file_name().cmp(a.file_name()))
            .into_iter()
            .filter_entry(move |entry| !config.is_skipped(entry));

        let mut dirs = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_dir() => dirs.push(entry.into_path()),
                Ok(_) => {}
                Err(err) => {
                    let path = err
                        .path()
                        .map_or_else(|| self.root.to_path_buf(), Path::to_path_buf);
                    let not_found = err
                        .io_error()
                        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound);
                    if !not_found {
                        self.record_error(&path, "list", &err)?;
                    }
                }
            }
        }
        dirs.reverse();
        Ok(dirs)
    }

    fn pass(&mut self) -> io::Result<usize> {
        let mut removed = 0;
        for dir in self.directories()? {
            if self.config.is_shutdown_requested() {
                self.report.interrupted = true;
                break;
            }
            if dir.as_path() == self.root && !self.config.include_root {
                continue;
            }
            if self.gone.contains(&dir) || self.failed.contains(&dir) {
                continue;
            }
            if self.is_empty(&dir)? == Some(true) && self.remove(&dir)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// Remove empty directories under `root` until a pass removes nothing.
///
/// Writes `removed <dir>` (or `[dry-run] remove <dir>`) per directory and
/// an `error:` line per directory that could not be listed or removed.
/// Directories named in [`PruneConfig::skip_dirs`] are never opened. Once
/// the shutdown flag is set no further directory is removed and the report
/// is marked interrupted.
///
/// # Errors
///
/// Only failures to write to `out` are returned.
pub fn prune_empty_dirs<W: Write>(
    root: &Path,
    config: &PruneConfig,
    out: &mut W,
) -> io::Result<PruneReport> {
    let mut pruner = Pruner {
        root,
        config,
        out,
        report: PruneReport::new(config.dry_run),
        gone: config.assume_removed.clone(),
        failed: HashSet::new(),
    };

    loop {
        pruner.report.passes += 1;
        let removed = pruner.pass()?;
        log::debug!("Prune pass {} removed {}", pruner.report.passes, removed);
        if pruner.report.interrupted {
            log::info!("Pruning interrupted by shutdown signal");
            break;
        }
        if removed == 0 || pruner.gone.contains(root) {
            break;
        }
    }

    Ok(pruner.report)
}
