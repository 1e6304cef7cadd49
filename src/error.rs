//! Structured error handling and exit codes.

use serde::Serialize;

use crate::cache::CacheError;

/// Exit codes for the statcache binary.
///
/// - 0: Success (files or directories are identical, or the command has no verdict)
/// - 1: General error (unexpected failure)
/// - 2: Different (compared files or directories differ)
/// - 3: Not found (a path could not be stat'd)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: The command completed and found no differences.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Different: The compared inputs differ.
    Different = 2,
    /// Not found: A required path does not exist or can't be stat'd.
    NotFound = 3,
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
            Self::Success => "SC000",
            Self::GeneralError => "SC001",
            Self::Different => "SC002",
            Self::NotFound => "SC003",
        }
    }

    /// Pick the exit code for an error returned by [`crate::run_app`].
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<CacheError>() {
            Some(CacheError::NotFound { .. }) => Self::NotFound,
            _ => Self::GeneralError,
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "SC001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Path involved, when the error is about one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
            path: err
                .downcast_ref::<CacheError>()
                .map(|e| e.path().display().to_string()),
        }
    }
}
