//! Core functionality for salt.
//!
//! This module provides the fundamental building blocks for coordinating
//! hidden clones, flat copies and persistent state: the Git facade, the
//! config and state stores, the branch-mapping resolver, the status
//! classifier, and the error and output plumbing shared by every command.

pub mod config;
pub mod error;
pub mod fsutil;
pub mod git;
pub mod hash;
pub mod output;
pub mod process;
pub mod resolver;
pub mod state;
pub mod sync_status;
pub mod workspace;

// === Error handling ===
// Core error type and result alias used throughout the application
pub use error::{Result, SaltError};

// === Git operations ===
// Subprocess facade over the external git binary
pub use git::GitRepo;

// === Configuration ===
// salt.conf model, parser and writer
pub use config::{SaltConfig, Submodule};

// === State management ===
// Persistent per-submodule sync records
pub use state::{SubmoduleState, SyncState, STATE_VERSION};

// === Branch mapping ===
// Pure parent-branch -> submodule-branch resolution
pub use resolver::{pattern_matches, resolve_branch};

// === Status classification ===
// SyncStatus enum and the pure classifier
pub use sync_status::{classify, Observation, SyncStatus};

// === Workspace layout ===
// salt.conf / .salt/ path resolution and parent-repo queries
pub use workspace::Workspace;

// === Content hashing ===
pub use hash::hash_tree;

// === Output formatting ===
// Unified output formatting for consistent CLI presentation
pub use output::{
    print_detail, print_error, print_info, print_section_header, print_success, print_warning,
};
