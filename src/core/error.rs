//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`SaltError`] which provides comprehensive error handling
//! for all salt operations. It uses `thiserror` for ergonomic error definitions
//! and maps every error kind onto the process exit codes the CLI contract fixes:
//! `1` generic, `2` configuration, `3` Git/operation.
//!
//! # Public API
//! - [`SaltError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, SaltError>`
//!
//! # Error Categories
//! - **Configuration**: missing/malformed `salt.conf`, unknown submodules
//! - **State**: missing or unreadable `.salt/state.json`
//! - **Git operations**: clone, checkout, pull, push, merge conflicts, timeouts
//! - **Skips**: conditions that are reported and never fatal
//!   ([`SaltError::NoChanges`], [`SaltError::UncommittedChanges`],
//!   [`SaltError::BranchMismatch`])

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for salt
#[derive(Error, Debug)]
pub enum SaltError {
    // Configuration errors
    #[error("No salt.conf found. Run 'salt init' or 'salt add <url>' first.")]
    ConfigNotFound,

    #[error("Failed to parse salt.conf (line {line}): {message}")]
    ConfigParseError { line: usize, message: String },

    #[error("Submodule '{name}' is not configured in salt.conf")]
    SubmoduleNotFound { name: String },

    #[error("Submodule '{name}' already exists")]
    SubmoduleAlreadyExists { name: String },

    #[error("Path '{path}' already exists in the parent tree")]
    PathAlreadyExists { path: PathBuf },

    // State errors
    #[error("No sync state recorded for '{name}'. Run 'salt sync' first.")]
    NoState { name: String },

    // Skip conditions (reported, never fatal)
    #[error("No changes to push for '{name}'")]
    NoChanges { name: String },

    #[error("Uncommitted changes under '{path}'. Commit them or use --force.")]
    UncommittedChanges { path: PathBuf },

    #[error("'{name}' was synced from branch '{synced}' but the current mapping expects '{expected}'. Run 'salt sync' or use --auto-sync.")]
    BranchMismatch {
        name: String,
        synced: String,
        expected: String,
    },

    // Git operation errors
    #[error("Hidden clone for '{name}' is missing. Run 'salt resolve' first.")]
    SourceRepoNotFound { name: String },

    #[error("Merge conflict in hidden clone: {details}")]
    MergeConflict { details: String },

    #[error("Failed to clone '{url}': {details}")]
    CloneFailed { url: String, details: String },

    #[error("Failed to checkout branch '{branch}': {details}")]
    CheckoutFailed { branch: String, details: String },

    #[error("Failed to pull branch '{branch}': {details}")]
    PullFailed { branch: String, details: String },

    #[error("Failed to push branch '{branch}': {details}")]
    PushFailed { branch: String, details: String },

    #[error("git {command} failed: {details}")]
    GitCommandFailed { command: String, details: String },

    #[error("git {command} timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },

    // I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using SaltError
pub type Result<T> = std::result::Result<T, SaltError>;

impl SaltError {
    /// Map this error onto the CLI exit-code contract.
    ///
    /// `2` for configuration errors, `3` for Git/operation errors,
    /// `1` for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            SaltError::ConfigNotFound
            | SaltError::ConfigParseError { .. }
            | SaltError::SubmoduleNotFound { .. }
            | SaltError::SubmoduleAlreadyExists { .. }
            | SaltError::PathAlreadyExists { .. }
            | SaltError::NoState { .. } => 2,

            SaltError::SourceRepoNotFound { .. }
            | SaltError::MergeConflict { .. }
            | SaltError::CloneFailed { .. }
            | SaltError::CheckoutFailed { .. }
            | SaltError::PullFailed { .. }
            | SaltError::PushFailed { .. }
            | SaltError::GitCommandFailed { .. }
            | SaltError::Timeout { .. } => 3,

            _ => 1,
        }
    }

    /// Whether this error is a skip condition: reported, then the run
    /// continues with the next submodule, and the process can still exit 0.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            SaltError::NoChanges { .. }
                | SaltError::UncommittedChanges { .. }
                | SaltError::BranchMismatch { .. }
        )
    }

    /// Create a config parse error at a given 1-based line number
    pub fn config_parse(line: usize, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            line,
            message: message.into(),
        }
    }

    /// Create a submodule not found error
    pub fn submodule_not_found(name: impl Into<String>) -> Self {
        Self::SubmoduleNotFound { name: name.into() }
    }

    /// Create a submodule already exists error
    pub fn submodule_already_exists(name: impl Into<String>) -> Self {
        Self::SubmoduleAlreadyExists { name: name.into() }
    }

    /// Create a path already exists error
    pub fn path_already_exists(path: impl Into<PathBuf>) -> Self {
        Self::PathAlreadyExists { path: path.into() }
    }

    /// Create a source repo not found error
    pub fn source_repo_not_found(name: impl Into<String>) -> Self {
        Self::SourceRepoNotFound { name: name.into() }
    }

    /// Create a no state error
    pub fn no_state(name: impl Into<String>) -> Self {
        Self::NoState { name: name.into() }
    }

    /// Create a no changes skip
    pub fn no_changes(name: impl Into<String>) -> Self {
        Self::NoChanges { name: name.into() }
    }

    /// Create an uncommitted changes skip
    pub fn uncommitted_changes(path: impl Into<PathBuf>) -> Self {
        Self::UncommittedChanges { path: path.into() }
    }

    /// Create a branch mismatch skip
    pub fn branch_mismatch(
        name: impl Into<String>,
        synced: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::BranchMismatch {
            name: name.into(),
            synced: synced.into(),
            expected: expected.into(),
        }
    }

    /// Create a merge conflict error
    pub fn merge_conflict(details: impl Into<String>) -> Self {
        Self::MergeConflict {
            details: details.into(),
        }
    }

    /// Create a git command failed error
    pub fn git_command_failed(command: impl Into<String>, details: impl Into<String>) -> Self {
        Self::GitCommandFailed {
            command: command.into(),
            details: details.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(command: impl Into<String>, seconds: u64) -> Self {
        Self::Timeout {
            command: command.into(),
            seconds,
        }
    }
}
