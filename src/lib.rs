//! dupeprune - content-addressed duplicate file removal
//!
//! Walks directory trees, hashes every regular file, groups files by
//! content digest and removes redundant copies, either against a reference
//! tree or within a single tree. A separate pass removes directories left
//! empty.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod engine;
pub mod error;
pub mod logging;
pub mod progress;
pub mod report;
pub mod scanner;
pub mod signal;

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;

use crate::cli::{Cli, Commands};
use crate::config::EngineConfig;
use crate::error::ExitCode;
use crate::progress::Progress;

/// Run the command described by `cli` and return the exit code.
///
/// Decision lines and the summary are written to stdout.
///
/// # Errors
///
/// Fatal errors only: an unusable root, an interrupted run, or a failure to
/// write to stdout. Per-item failures are reported through the exit code.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let shutdown = match signal::install_handler() {
        Ok(handler) => handler,
        Err(e) => {
            log::warn!("{e}; Ctrl+C will stop the process immediately");
            signal::ShutdownHandler::new()
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let with_runtime = |config: EngineConfig| {
        config
            .with_shutdown_flag(shutdown.get_flag())
            .with_progress_callback(Arc::new(Progress::new(cli.quiet)))
    };

    let (summary, code) = match &cli.command {
        Commands::Against(args) => {
            let config = with_runtime(args.run.engine_config());
            let report = engine::dedup_against(&args.reference, &args.target, &config, &mut out)
                .with_context(|| {
                    format!(
                        "deduplicating {} against {}",
                        args.target.display(),
                        args.reference.display()
                    )
                })?;
            (report.summary_lines(), report.exit_code())
        }
        Commands::Within(args) => {
            let config = with_runtime(args.engine_config());
            let report = engine::dedup_within(&args.root, &config, &mut out)
                .with_context(|| format!("deduplicating {}", args.root.display()))?;
            (report.summary_lines(), report.exit_code())
        }
        Commands::Prune(args) => {
            let config = args.prune_config().with_shutdown_flag(shutdown.get_flag());
            let report = engine::prune_empty(&args.root, &config, &mut out)
                .with_context(|| format!("pruning {}", args.root.display()))?;
            (report.summary_lines(), report.exit_code())
        }
    };

    for line in summary {
        writeln!(out, "{line}")?;
    }
    out.flush()?;

    Ok(code)
}
