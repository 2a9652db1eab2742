//! Filesystem actions.
//!
//! - [`delete`]: executes a removal plan, permanently or to the trash
//! - [`prune`]: removes directories left empty, to a fixpoint
//!
//! Both write one line per decision and never stop on a per-item failure.
//!
//! ```no_run
//! use dupeprune::actions::prune::{prune_empty_dirs, PruneConfig};
//! use std::path::Path;
//!
//! let mut out = std::io::stdout();
//! let report = prune_empty_dirs(Path::new("/data"), &PruneConfig::default(), &mut out)?;
//! println!("{} empty folders", report.dirs_removed);
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod delete;
pub mod prune;

pub use delete::{
    check_removable, execute_plan, remove_file, DeleteConfig, DeleteError, RemovalMode,
};
pub use prune::{prune_empty_dirs, PruneConfig};
