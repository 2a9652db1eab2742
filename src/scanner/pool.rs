//! Parallel hashing of an enumerated file list.
//!
//! # Overview
//!
//! [`hash_files`] hashes every path exactly once. With one worker it runs
//! sequentially on the calling thread; with more it builds a dedicated
//! rayon pool of that many threads. Workers share nothing mutable: each
//! maps its path to a `Result` and the results are merged on the caller's
//! thread after the pool finishes.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use super::{FileRecord, HashAlgorithm, HashError, Hasher};
use crate::progress::{ProgressCallback, PHASE_HASHING};

/// Configuration for a hashing run.
#[derive(Clone, Default)]
pub struct HashRunConfig {
    /// Requested worker count. 0 picks the available parallelism.
    pub workers: usize,
    /// Digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for HashRunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashRunConfig")
            .field("workers", &self.workers)
            .field("algorithm", &self.algorithm)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl HashRunConfig {
    /// Set the worker count.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Merged result of a hashing run.
#[derive(Debug, Clone, Default)]
pub struct HashOutcome {
    /// Successfully hashed files, in completion-independent input order.
    pub records: Vec<FileRecord>,
    /// Files that could not be hashed.
    pub errors: Vec<HashError>,
    /// Whether the run was cut short by a shutdown request.
    pub interrupted: bool,
}

impl HashOutcome {
    /// Number of files attempted (hashed, failed, or skipped).
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.records.len() + self.errors.len()
    }
}

/// Resolve a requested worker count, mapping 0 to the available parallelism.
///
/// # Examples
///
/// ```
/// use dupeprune::scanner::resolve_workers;
///
/// assert_eq!(resolve_workers(3), 3);
/// assert!(resolve_workers(0) >= 1);
/// ```
#[must_use]
pub fn resolve_workers(requested: usize) -> usize {
    if requested > 0 {
        return requested;
    }
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Hash every path once and merge the results.
///
/// A failure on one file is recorded in [`HashOutcome::errors`] and never
/// stops the others. Once the shutdown flag is set, remaining files are
/// skipped and the outcome is marked interrupted.
#[must_use]
pub fn hash_files(paths: Vec<PathBuf>, config: &HashRunConfig) -> HashOutcome {
    let total = paths.len();
    let workers = resolve_workers(config.workers);
    let hasher = Hasher::with_algorithm(config.algorithm);
    let finished = AtomicUsize::new(0);

    if total == 0 {
        log::debug!("No files to hash");
        return HashOutcome::default();
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_start(PHASE_HASHING, total);
    }

    log::debug!(
        "Hashing {} files with {} worker(s) using {}",
        total,
        workers,
        hasher.algorithm()
    );

    let hash_one = |path: PathBuf| -> Result<FileRecord, HashError> {
        if config.is_shutdown_requested() {
            return Err(HashError::Interrupted(path));
        }

        let result = hasher.hash_file_sized(&path).map(|(digest, size)| {
            log::trace!("Hashed {} -> {} ({} bytes)", path.display(), digest, size);
            FileRecord::new(path.clone(), Some(size), digest)
        });

        let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(ref callback) = config.progress_callback {
            callback.on_progress(done, path.to_string_lossy().as_ref());
        }
        result
    };

    let results: Vec<Result<FileRecord, HashError>> = if workers == 1 {
        paths.into_iter().map(hash_one).collect()
    } else {
        match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool.install(|| paths.into_par_iter().map(hash_one).collect()),
            Err(e) => {
                log::warn!(
                    "Failed to create a pool of {} workers ({}), hashing sequentially",
                    workers,
                    e
                );
                paths.into_iter().map(hash_one).collect()
            }
        }
    };

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_end(PHASE_HASHING);
    }

    let mut outcome = HashOutcome::default();
    for result in results {
        match result {
            Ok(record) => outcome.records.push(record),
            Err(HashError::Interrupted(_)) => outcome.interrupted = true,
            Err(e) => {
                log::warn!("Failed to hash {}", e);
                outcome.errors.push(e);
            }
        }
    }

    if outcome.interrupted {
        log::info!("Hashing interrupted by shutdown signal");
    }

    outcome
}
