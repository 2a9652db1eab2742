//! Run configuration.
//!
//! There is no configuration file. The CLI argument structs are converted
//! into an [`EngineConfig`] (and a [`PruneConfig`] for empty-directory
//! passes), which is all the engine reads.

use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::actions::{DeleteConfig, PruneConfig, RemovalMode};
use crate::progress::ProgressCallback;
use crate::scanner::{HashAlgorithm, HashRunConfig, WalkerConfig};

/// Settings for one dedup run.
#[derive(Clone, Default)]
pub struct EngineConfig {
    /// Hashing workers; 0 uses the available parallelism.
    pub workers: usize,
    /// Report decisions without touching the filesystem.
    pub dry_run: bool,
    /// Directory names never descended into.
    pub skip_dirs: HashSet<String>,
    /// Digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Permanent removal or trash.
    pub removal_mode: RemovalMode,
    /// Run an empty-directory pass after removing duplicates.
    pub prune_empty: bool,
    /// Set by the Ctrl+C handler.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Receives hashing progress.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("workers", &self.workers)
            .field("dry_run", &self.dry_run)
            .field("skip_dirs", &self.skip_dirs)
            .field("algorithm", &self.algorithm)
            .field("removal_mode", &self.removal_mode)
            .field("prune_empty", &self.prune_empty)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl EngineConfig {
    /// Set the worker count.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Enable or disable dry-run.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
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

    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the removal mode.
    #[must_use]
    pub fn with_removal_mode(mut self, mode: RemovalMode) -> Self {
        self.removal_mode = mode;
        self
    }

    /// Enable or disable the trailing empty-directory pass.
    #[must_use]
    pub fn with_prune_empty(mut self, prune_empty: bool) -> Self {
        self.prune_empty = prune_empty;
        self
    }

    /// Set the shutdown flag.
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

    pub(crate) fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::default().with_skip_dirs(self.skip_dirs.iter().cloned())
    }

    pub(crate) fn hash_config(&self) -> HashRunConfig {
        let mut config = HashRunConfig::default()
            .with_workers(self.workers)
            .with_algorithm(self.algorithm);
        if let Some(flag) = &self.shutdown_flag {
            config = config.with_shutdown_flag(Arc::clone(flag));
        }
        if let Some(callback) = &self.progress_callback {
            config = config.with_progress_callback(Arc::clone(callback));
        }
        config
    }

    pub(crate) fn delete_config(&self) -> DeleteConfig {
        DeleteConfig {
            dry_run: self.dry_run,
            mode: self.removal_mode,
            shutdown_flag: self.shutdown_flag.clone(),
        }
    }

    pub(crate) fn prune_config(&self) -> PruneConfig {
        let config = PruneConfig::default()
            .with_dry_run(self.dry_run)
            .with_skip_dirs(self.skip_dirs.iter().cloned());
        match &self.shutdown_flag {
            Some(flag) => config.with_shutdown_flag(Arc::clone(flag)),
            None => config,
        }
    }
}
