//! Run reports.
//!
//! A [`RunReport`] is filled in by the engine as the pipeline runs and is
//! handed back to the caller, who decides how to render it.

use bytesize::ByteSize;

use crate::error::ExitCode;

/// Counters and error lines for one dedup run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Whether nothing was actually removed.
    pub dry_run: bool,
    /// Regular files found by enumeration.
    pub files_scanned: usize,
    /// Files hashed successfully.
    pub digests_computed: usize,
    /// Digests shared by two or more files (or by target and reference).
    pub duplicate_groups: usize,
    /// Files planned for removal.
    pub duplicates_found: usize,
    /// Files removed, or that would be removed under dry-run.
    pub files_removed: usize,
    /// Planned removals that failed.
    pub removal_errors: usize,
    /// Directories that could not be listed.
    pub enumeration_errors: usize,
    /// Files that could not be hashed.
    pub hash_errors: usize,
    /// Bytes freed, or that would be freed.
    pub bytes_freed: u64,
    /// Human-readable per-item error lines.
    pub errors: Vec<String>,
    /// Result of the optional empty-directory pass.
    pub prune: Option<PruneReport>,
    /// Whether Ctrl+C stopped execution partway through the plan.
    pub interrupted: bool,
}

impl RunReport {
    /// Empty report.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Per-item errors across every stage.
    #[must_use]
    pub fn total_errors(&self) -> usize {
        self.removal_errors
            + self.enumeration_errors
            + self.hash_errors
            + self.prune.as_ref().map_or(0, |p| p.errors.len())
    }

    /// Exit code for a run that reached the end.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        if self.total_errors() > 0 {
            ExitCode::PartialSuccess
        } else {
            ExitCode::Success
        }
    }

    /// Closing lines for stdout.
    ///
    /// The first line is `Done. Removed N files.` or, under dry-run,
    /// `Would remove N files.`. Failure totals follow only when non-zero.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![count_line(self.dry_run, self.files_removed, "files")];

        let mut failures = Vec::new();
        if self.removal_errors > 0 {
            failures.push(format!("{} removal", self.removal_errors));
        }
        if self.hash_errors > 0 {
            failures.push(format!("{} unreadable file", self.hash_errors));
        }
        if self.enumeration_errors > 0 {
            failures.push(format!("{} unlistable directory", self.enumeration_errors));
        }
        if !failures.is_empty() {
            lines.push(format!("Errors: {}.", failures.join(", ")));
        }

        if let Some(prune) = &self.prune {
            lines.extend(prune.summary_lines());
        }
        lines
    }

    /// Bytes freed, formatted for humans.
    #[must_use]
    pub fn bytes_freed_display(&self) -> String {
        ByteSize::b(self.bytes_freed).to_string()
    }
}

/// Counters and error lines for one empty-directory pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Whether nothing was actually removed.
    pub dry_run: bool,
    /// Directories removed, or that would be removed.
    pub dirs_removed: usize,
    /// Full passes over the tree, including the final one that found nothing.
    pub passes: usize,
    /// Human-readable per-item error lines.
    pub errors: Vec<String>,
    /// Whether Ctrl+C stopped the pass early.
    pub interrupted: bool,
}

impl PruneReport {
    /// Empty report.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Exit code for a prune that reached the end.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        if self.errors.is_empty() {
            ExitCode::Success
        } else {
            ExitCode::PartialSuccess
        }
    }

    /// Closing lines for stdout.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![count_line(self.dry_run, self.dirs_removed, "empty folders")];
        if !self.errors.is_empty() {
            lines.push(format!("Errors: {} directory.", self.errors.len()));
        }
        lines
    }
}

fn count_line(dry_run: bool, count: usize, noun: &str) -> String {
    if dry_run {
        format!("Would remove {count} {noun}.")
    } else {
        format!("Done. Removed {count} {noun}.")
    }
}
