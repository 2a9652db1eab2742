//! Pipeline orchestration.
//!
//! # Overview
//!
//! Each mode runs the same pipeline:
//!
//! 1. Check that every root is a directory ([`EngineError::NotADirectory`]).
//! 2. Enumerate regular files with [`Walker`].
//! 3. Hash them on the worker pool ([`hash_files`]).
//! 4. Merge the results into a [`ChecksumIndex`].
//! 5. Build a [`RemovalPlan`](crate::duplicates::RemovalPlan) with a policy.
//! 6. Execute it with [`execute_plan`], then optionally prune empty folders.
//!
//! If the shutdown flag is set before step 6, the run returns
//! [`EngineError::Interrupted`] and nothing is removed. If it is set during
//! step 6, the current removal finishes, no further path is touched and the
//! run returns the same error.
//!
//! The prune pass skips the same directory names as the dedup walk, and
//! under dry-run it treats the files the plan would remove as gone.
//!
//! # Example
//!
//! ```no_run
//! use dupeprune::config::EngineConfig;
//! use dupeprune::engine::dedup_within;
//! use std::path::Path;
//!
//! let config = EngineConfig::default().with_dry_run(true);
//! let mut out = std::io::stdout();
//! let report = dedup_within(Path::new("/photos"), &config, &mut out)?;
//! println!("{} duplicate(s)", report.duplicates_found);
//! # Ok::<(), dupeprune::error::EngineError>(())
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

use crate::actions::{execute_plan, prune_empty_dirs, PruneConfig};
use crate::config::EngineConfig;
use crate::duplicates::{dedup_against_reference, dedup_within_tree, ChecksumIndex};
use crate::error::EngineError;
use crate::report::{PruneReport, RunReport};
use crate::scanner::{hash_files, HashError, ScanError, Walker};

/// Index of one tree plus the per-item errors met while building it.
#[derive(Debug, Default)]
pub struct IndexedTree {
    /// Digest index of every file hashed successfully.
    pub index: ChecksumIndex,
    /// Regular files found by enumeration.
    pub files_scanned: usize,
    /// Directories that could not be listed.
    pub scan_errors: Vec<ScanError>,
    /// Files that could not be hashed.
    pub hash_errors: Vec<HashError>,
}

fn ensure_directory(path: &Path) -> Result<(), EngineError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(EngineError::NotADirectory(path.to_path_buf()))
    }
}

fn check_shutdown(config: &EngineConfig) -> Result<(), EngineError> {
    if config
        .shutdown_flag
        .as_ref()
        .is_some_and(|f| f.load(Ordering::SeqCst))
    {
        return Err(EngineError::Interrupted);
    }
    Ok(())
}

/// Enumerate and hash every regular file under `root`.
///
/// # Errors
///
/// [`EngineError::Interrupted`] if the shutdown flag was set while hashing.
pub fn index_tree(root: &Path, config: &EngineConfig) -> Result<IndexedTree, EngineError> {
    let walker = Walker::new(root, config.walker_config());
    let (paths, scan_errors) = walker.collect_files();
    let files_scanned = paths.len();

    log::info!("Indexing {} files in {}", files_scanned, root.display());
    if let Some(callback) = &config.progress_callback {
        callback.on_message(&root.display().to_string());
    }

    let outcome = hash_files(paths, &config.hash_config());
    if outcome.interrupted {
        return Err(EngineError::Interrupted);
    }
    check_shutdown(config)?;

    Ok(IndexedTree {
        index: ChecksumIndex::from_outcome(&outcome),
        files_scanned,
        scan_errors,
        hash_errors: outcome.errors,
    })
}

fn record_tree<W: Write>(
    tree: &IndexedTree,
    report: &mut RunReport,
    out: &mut W,
) -> std::io::Result<()> {
    report.files_scanned += tree.files_scanned;
    report.digests_computed += tree.index.file_count();
    report.enumeration_errors += tree.scan_errors.len();
    report.hash_errors += tree.hash_errors.len();

    let lines = tree
        .scan_errors
        .iter()
        .map(|e| format!("error: cannot list directory: {e}"))
        .chain(
            tree.hash_errors
                .iter()
                .map(|e| format!("error: cannot read file: {e}")),
        );
    for line in lines {
        writeln!(out, "{line}")?;
        report.errors.push(line);
    }
    Ok(())
}

fn finish<W: Write>(
    root: &Path,
    config: &EngineConfig,
    mut report: RunReport,
    removed: Vec<PathBuf>,
    out: &mut W,
) -> Result<RunReport, EngineError> {
    if report.interrupted {
        return Err(EngineError::Interrupted);
    }

    log::info!(
        "{} {} file(s), {}",
        if config.dry_run { "Would remove" } else { "Removed" },
        report.files_removed,
        report.bytes_freed_display()
    );

    if config.prune_empty {
        // Real removals are already gone from disk.
        let assumed = if config.dry_run { removed } else { Vec::new() };
        let prune_config = config.prune_config().with_assume_removed(assumed);
        report.prune = Some(prune_empty(root, &prune_config, out)?);
    }
    Ok(report)
}

/// Remove from `target` every file whose content also exists under
/// `reference`. Reference files are never touched.
///
/// # Errors
///
/// [`EngineError::NotADirectory`] before any work if either root is not a
/// directory, [`EngineError::Interrupted`] on Ctrl+C, and
/// [`EngineError::Output`] if `out` cannot be written.
pub fn dedup_against<W: Write>(
    reference: &Path,
    target: &Path,
    config: &EngineConfig,
    out: &mut W,
) -> Result<RunReport, EngineError> {
    ensure_directory(reference)?;
    ensure_directory(target)?;

    let reference_tree = index_tree(reference, config)?;
    let target_tree = index_tree(target, config)?;

    let plan = dedup_against_reference(&reference_tree.index, &target_tree.index);

    let mut report = RunReport::new(config.dry_run);
    record_tree(&reference_tree, &mut report, out)?;
    record_tree(&target_tree, &mut report, out)?;
    report.duplicate_groups = target_tree
        .index
        .groups()
        .iter()
        .filter(|(digest, _)| reference_tree.index.contains(digest))
        .count();
    report.duplicates_found = plan.len();

    check_shutdown(config)?;
    let removed = execute_plan(&plan, &config.delete_config(), &mut report, out)?;
    finish(target, config, report, removed, out)
}

/// Keep one copy of every content group under `root` and remove the rest.
/// The copy kept is the one with the shortest path, ties broken
/// lexicographically.
///
/// # Errors
///
/// Same as [`dedup_against`].
pub fn dedup_within<W: Write>(
    root: &Path,
    config: &EngineConfig,
    out: &mut W,
) -> Result<RunReport, EngineError> {
    ensure_directory(root)?;

    let tree = index_tree(root, config)?;
    let plan = dedup_within_tree(&tree.index);

    let mut report = RunReport::new(config.dry_run);
    record_tree(&tree, &mut report, out)?;
    report.duplicate_groups = tree.index.duplicate_group_count();
    report.duplicates_found = plan.len();

    check_shutdown(config)?;
    let removed = execute_plan(&plan, &config.delete_config(), &mut report, out)?;
    finish(root, config, report, removed, out)
}

/// Remove empty directories under `root` to a fixpoint.
///
/// # Errors
///
/// [`EngineError::NotADirectory`] if `root` is not a directory,
/// [`EngineError::Interrupted`] on Ctrl+C, and [`EngineError::Output`] if
/// `out` cannot be written.
pub fn prune_empty<W: Write>(
    root: &Path,
    config: &PruneConfig,
    out: &mut W,
) -> Result<PruneReport, EngineError> {
    ensure_directory(root)?;
    let report = prune_empty_dirs(root, config, out)?;
    log::debug!(
        "Pruned {} empty folder(s) in {} pass(es)",
        report.dirs_removed,
        report.passes
    );
    if report.interrupted {
        return Err(EngineError::Interrupted);
    }
    Ok(report)
}
