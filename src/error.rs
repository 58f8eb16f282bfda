//! Exit codes and structured error output.

use serde::Serialize;

use crate::duplicates::FinderError;

/// Process exit codes.
///
/// - 0: Scan completed and at least one duplicate group was found
/// - 1: An error occurred
/// - 2: Scan completed and no duplicates were found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Duplicates found (or a non-scan command succeeded).
    Success = 0,
    /// An error occurred.
    GeneralError = 1,
    /// No duplicates found.
    NoDuplicates = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::NoDuplicates => "DS002",
        }
    }
}

/// Structured error information for `--json-errors`.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Error category, when the failure came from the finder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    /// Path the error refers to, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Human-readable error message
    pub message: String,
}

impl StructuredError {
    /// Build a structured error from an application error.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        let finder_error = err.downcast_ref::<FinderError>();
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            kind: finder_error.map(error_kind),
            path: finder_error.and_then(error_path),
            message: format!("{:#}", err),
        }
    }
}

/// Stable category name for a finder error.
#[must_use]
pub fn error_kind(err: &FinderError) -> &'static str {
    match err {
        FinderError::InvalidSearchDirectory { .. } => "invalid_search_directory",
        FinderError::FileReadFailure { .. } => "file_read_failure",
        FinderError::DirectoryBootstrapFailure { .. } => "directory_bootstrap_failure",
        FinderError::Walk(_) => "walk_error",
    }
}

fn error_path(err: &FinderError) -> Option<String> {
    let path = match err {
        FinderError::InvalidSearchDirectory { path, .. }
        | FinderError::FileReadFailure { path, .. }
        | FinderError::DirectoryBootstrapFailure { path, .. } => path.as_path(),
        FinderError::Walk(e) => e.path(),
    };
    Some(path.display().to_string())
}
