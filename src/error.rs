//! Exit codes and run-ending errors.

use std::path::PathBuf;

use serde::Serialize;

/// Process exit codes.
///
/// - 0: every planned action succeeded
/// - 1: fatal error (bad arguments, unusable root)
/// - 3: finished, but some files or directories could not be processed
/// - 130: interrupted by Ctrl+C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Run finished without per-item errors.
    Success = 0,
    /// A fatal error stopped the run.
    GeneralError = 1,
    /// Run finished but recorded per-item errors.
    PartialSuccess = 3,
    /// Run was interrupted by Ctrl+C.
    Interrupted = 130,
}

impl ExitCode {
    /// Numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DP000",
            Self::GeneralError => "DP001",
            Self::PartialSuccess => "DP003",
            Self::Interrupted => "DP130",
        }
    }
}

/// Errors that end a run before any removal is attempted.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A root argument does not name an existing directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Ctrl+C arrived while files were being indexed.
    #[error("interrupted by Ctrl+C")]
    Interrupted,

    /// Writing decision lines failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Error report printed with `--json-errors`.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// Code prefix, e.g. "DP001"
    pub code: String,
    /// Numeric exit code
    pub exit_code: i32,
    /// Human-readable message
    pub message: String,
    /// Whether the run was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Build a report from an error and the exit code it maps to.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}

/// Map a fatal error to its exit code.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<EngineError>() {
        Some(EngineError::Interrupted) => ExitCode::Interrupted,
        _ => ExitCode::GeneralError,
    }
}
