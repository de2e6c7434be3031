//! Salt - a branch-aware alternative to Git submodules.
//!
//! Salt coordinates an external `git` binary to keep, per submodule, a
//! hidden full clone under `.salt/repos/` and a `.git`-free flat copy
//! inside the parent tree. The submodule branch is a deterministic function
//! of the parent's current branch via user-declared mappings with wildcard
//! support.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module:
//! - Config (`salt.conf`) and state (`.salt/state.json`) stores
//! - The branch-mapping resolver and the sync-status classifier
//! - The subprocess Git facade and content hasher
//! - Error handling and result types

pub mod commands;
pub mod core;

// Re-export the core public API for external users
pub use core::{
    classify,
    hash_tree,
    pattern_matches,
    // Branch mapping
    resolve_branch,

    // Git operations
    GitRepo,

    Observation,
    // Error handling
    Result,
    // Configuration
    SaltConfig,
    SaltError,

    // State management
    SubmoduleState,
    Submodule,
    SyncState,

    // Status classification
    SyncStatus,

    // Workspace layout
    Workspace,
    STATE_VERSION,
};
