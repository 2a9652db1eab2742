//! Command-line interface definitions.
//!
//! ```bash
//! # Remove from ~/inbox every file that already exists in ~/archive
//! dupeprune against ~/archive ~/inbox
//!
//! # Keep one copy per content group, skipping VCS metadata, and preview only
//! dupeprune within ~/photos --skip-dir .git --dry-run
//!
//! # Remove empty folders left behind
//! dupeprune prune ~/photos
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::actions::{PruneConfig, RemovalMode};
use crate::config::EngineConfig;
use crate::scanner::HashAlgorithm;

/// Content-addressed duplicate file removal.
///
/// dupeprune hashes every file under the given directories, groups files
/// with identical content, and removes the redundant copies.
#[derive(Debug, Parser)]
#[command(name = "dupeprune")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress logs and progress except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Remove files from TARGET whose content also exists in REFERENCE
    Against(AgainstArgs),
    /// Keep one copy of each file under ROOT and remove the rest
    Within(WithinArgs),
    /// Remove empty directories under ROOT
    Prune(PruneArgs),
}

/// Options shared by the dedup subcommands.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Number of hashing workers (0 = one per CPU)
    #[arg(short, long, value_name = "N", default_value_t = 0)]
    pub workers: usize,

    /// Print what would be removed without removing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Move files to the system trash instead of deleting them
    #[arg(long)]
    pub trash: bool,

    /// Digest algorithm
    #[arg(long, value_enum, default_value_t = HashAlgorithm::Xxh3)]
    pub algorithm: HashAlgorithm,
}

impl RunArgs {
    /// Engine settings for these options.
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        let mode = if self.trash {
            RemovalMode::Trash
        } else {
            RemovalMode::Permanent
        };
        EngineConfig::default()
            .with_workers(self.workers)
            .with_dry_run(self.dry_run)
            .with_algorithm(self.algorithm)
            .with_removal_mode(mode)
    }
}

/// Arguments for the `against` subcommand.
#[derive(Debug, Args)]
pub struct AgainstArgs {
    /// Directory whose files are always kept
    #[arg(value_name = "REFERENCE")]
    pub reference: PathBuf,

    /// Directory to remove duplicates from
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Arguments for the `within` subcommand.
#[derive(Debug, Args)]
pub struct WithinArgs {
    /// Directory to deduplicate
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Directory name to skip (can be specified multiple times)
    ///
    /// Matched against the directory's own name at any depth.
    #[arg(long = "skip-dir", value_name = "NAME")]
    pub skip_dirs: Vec<String>,

    /// Remove directories left empty afterwards
    #[arg(long)]
    pub prune_empty: bool,

    #[command(flatten)]
    pub run: RunArgs,
}

impl WithinArgs {
    /// Engine settings for these options.
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        self.run
            .engine_config()
            .with_skip_dirs(self.skip_dirs.iter().cloned())
            .with_prune_empty(self.prune_empty)
    }
}

/// Arguments for the `prune` subcommand.
#[derive(Debug, Args)]
pub struct PruneArgs {
    /// Directory to prune
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Print what would be removed without removing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Also remove ROOT if it ends up empty
    #[arg(long)]
    pub include_root: bool,

    /// Directory name to leave untouched (can be specified multiple times)
    #[arg(long = "skip-dir", value_name = "NAME")]
    pub skip_dirs: Vec<String>,
}

impl PruneArgs {
    /// Prune settings for these options.
    #[must_use]
    pub fn prune_config(&self) -> PruneConfig {
        PruneConfig::default()
            .with_dry_run(self.dry_run)
            .with_include_root(self.include_root)
            .with_skip_dirs(self.skip_dirs.iter().cloned())
    }
}
