//! Plan execution.
//!
//! # Overview
//!
//! [`execute_plan`] walks a [`RemovalPlan`] in order and removes each path,
//! either permanently (default) or to the system trash. Every decision is
//! written to the output as one line:
//!
//! ```text
//! removed /tgt/copy.bin
//! [dry-run] remove /root/bb/y.txt (kept /root/a/x.txt)
//! error: failed to remove /root/gone.txt: file not found: /root/gone.txt
//! ```
//!
//! A failure on one path is recorded in the [`RunReport`] and the batch
//! continues. Dry-run performs the same per-path checks as a real run, so
//! it reports the same count and the same failures for an unchanged tree.
//! The shutdown flag is checked before each path; once it is set the batch
//! stops and the report is marked interrupted.
//!
//! # Example
//!
//! ```no_run
//! use dupeprune::actions::delete::{remove_file, RemovalMode};
//! use std::path::Path;
//!
//! match remove_file(Path::new("/path/to/duplicate.txt"), RemovalMode::Trash) {
//!     Ok(size) => println!("freed {size} bytes"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::duplicates::{RemovalPlan, RemovalReason};
use crate::report::RunReport;

/// Error type for a single removal.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// Path no longer exists.
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Path exists but is no longer a regular file.
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// Any other I/O failure.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::NotAFile(p)
            | Self::TrashFailed { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }
}

/// How a file is removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RemovalMode {
    /// `fs::remove_file`; cannot be undone.
    #[default]
    Permanent,
    /// Move to the system trash.
    Trash,
}

/// Configuration for executing a plan.
#[derive(Debug, Clone, Default)]
pub struct DeleteConfig {
    /// Report decisions without touching the filesystem.
    pub dry_run: bool,
    /// Removal mode for real runs.
    pub mode: RemovalMode,
    /// Set by the Ctrl+C handler; checked before each path.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
}

impl DeleteConfig {
    /// Permanent removal.
    #[must_use]
    pub fn permanent() -> Self {
        Self::default()
    }

    /// Removal to the system trash.
    #[must_use]
    pub fn trash() -> Self {
        Self {
            mode: RemovalMode::Trash,
            ..Self::default()
        }
    }

    /// Enable or disable dry-run.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
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
}

/// Check that `path` is still a regular file and return its size.
///
/// Symlinks are not followed: a path that has become a symlink is refused.
///
/// # Errors
///
/// `NotFound`, `PermissionDenied` or `Io` when the metadata cannot be read,
/// `NotAFile` when the path is a directory or anything else.
pub fn check_removable(path: &Path) -> Result<u64, DeleteError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| DeleteError::from_io(path, e))?;
    if !metadata.file_type().is_file() {
        return Err(DeleteError::NotAFile(path.to_path_buf()));
    }
    Ok(metadata.len())
}

/// Remove one regular file and return the bytes freed.
///
/// # Errors
///
/// See [`check_removable`]; additionally `TrashFailed` for trash mode and
/// the mapped I/O error when `remove_file` fails.
pub fn remove_file(path: &Path, mode: RemovalMode) -> Result<u64, DeleteError> {
    let size = check_removable(path)?;

    match mode {
        RemovalMode::Permanent => {
            fs::remove_file(path).map_err(|e| DeleteError::from_io(path, e))?;
            log::debug!("Removed {} ({} bytes)", path.display(), size);
        }
        RemovalMode::Trash => {
            trash::delete(path).map_err(|e| DeleteError::TrashFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            log::debug!("Moved to trash: {} ({} bytes)", path.display(), size);
        }
    }

    Ok(size)
}

/// Execute `plan` in order, writing one line per decision to `out` and
/// accumulating counts into `report`.
///
/// Returns the paths removed, or that would be removed under dry-run.
///
/// # Errors
///
/// Only failures to write to `out` are returned; removal failures are
/// recorded in `report` instead.
pub fn execute_plan<W: Write>(
    plan: &RemovalPlan,
    config: &DeleteConfig,
    report: &mut RunReport,
    out: &mut W,
) -> io::Result<Vec<PathBuf>> {
    log::debug!(
        "Executing {} planned removal(s){}",
        plan.len(),
        if config.dry_run { " (dry-run)" } else { "" }
    );

    let mut removed = Vec::with_capacity(plan.len());
    for removal in plan.removals() {
        if config.is_shutdown_requested() {
            log::info!(
                "Removal interrupted by shutdown signal after {} file(s)",
                removed.len()
            );
            report.interrupted = true;
            break;
        }

        let suffix = match (&removal.reason, &removal.kept) {
            (RemovalReason::DuplicateInTree, Some(kept)) => {
                format!(" (kept {})", kept.display())
            }
            _ => String::new(),
        };

        let result = if config.dry_run {
            check_removable(&removal.path)
        } else {
            remove_file(&removal.path, config.mode)
        };

        match result {
            Ok(size) => {
                report.files_removed += 1;
                report.bytes_freed += size;
                if config.dry_run {
                    writeln!(out, "[dry-run] remove {}{}", removal.path.display(), suffix)?;
                } else {
                    writeln!(out, "removed {}{}", removal.path.display(), suffix)?;
                }
                removed.push(removal.path.clone());
            }
            Err(e) => {
                log::warn!("Failed to remove {}: {}", removal.path.display(), e);
                let line = format!("error: failed to remove {}: {}", removal.path.display(), e);
                writeln!(out, "{line}")?;
                report.removal_errors += 1;
                report.errors.push(line);
            }
        }
    }

    Ok(removed)
}
