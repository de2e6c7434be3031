//! Type-safe sync status enumeration and the status classifier.
//!
//! [`SyncStatus`] replaces string-based status codes throughout the codebase
//! and carries the display color and the actionable suggestion shown next to
//! non-synced rows. [`classify`] is the pure classification function; the
//! status command feeds it the live observations (flat-copy hash and hidden
//! clone HEAD).

use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::state::SubmoduleState;

/// Where a submodule stands relative to its recorded sync state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SyncStatus {
    /// Flat copy and hidden clone both match the recorded state.
    Synced,
    /// The flat copy was edited since the last sync.
    Dirty,
    /// The hidden clone moved (or was never materialized) since the last sync.
    Behind,
    /// The hidden clone has unpushed commits while the flat copy is clean.
    Ahead,
    /// Both sides changed since the last sync.
    Diverged,
    /// The recorded source branch differs from what the mapping now expects.
    Stale,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Synced => "SYNCED",
            SyncStatus::Dirty => "DIRTY",
            SyncStatus::Behind => "BEHIND",
            SyncStatus::Ahead => "AHEAD",
            SyncStatus::Diverged => "DIVERGED",
            SyncStatus::Stale => "STALE",
        }
    }

    /// Colored label for table output.
    pub fn colored_label(&self) -> ColoredString {
        match self {
            SyncStatus::Synced => self.as_str().green(),
            SyncStatus::Dirty => self.as_str().yellow(),
            SyncStatus::Behind => self.as_str().cyan(),
            SyncStatus::Ahead => self.as_str().blue(),
            SyncStatus::Diverged => self.as_str().red().bold(),
            SyncStatus::Stale => self.as_str().magenta(),
        }
    }

    /// Actionable next step for non-synced rows.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            SyncStatus::Synced => None,
            SyncStatus::Dirty => Some("run 'salt push' to publish the local edits"),
            SyncStatus::Behind => Some("run 'salt pull' to bring the upstream changes in"),
            SyncStatus::Ahead => {
                Some("the hidden clone has unpushed commits; run 'salt push' to publish them")
            }
            SyncStatus::Diverged => Some("run 'salt pull' first, then 'salt push'"),
            SyncStatus::Stale => Some("run 'salt sync' to materialize the mapped branch"),
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Live observations the classifier compares against the recorded state.
#[derive(Debug, Clone)]
pub struct Observation {
    /// Content hash of the flat copy at `submodule.path`.
    pub current_hash: String,
    /// HEAD commit of the hidden clone.
    pub clone_head: String,
}

/// Classify a submodule given its recorded state, the branch the current
/// mapping expects, and the live observations.
///
/// No state means never synced, reported as [`SyncStatus::Behind`]. A source
/// branch differing from `expected_branch` dominates everything else: the
/// flat copy may hold files from the wrong branch entirely.
pub fn classify(
    state: Option<&SubmoduleState>,
    expected_branch: &str,
    observed: &Observation,
) -> SyncStatus {
    let Some(state) = state else {
        return SyncStatus::Behind;
    };

    if state.source_branch != expected_branch {
        return SyncStatus::Stale;
    }

    let parent_changed = observed.current_hash != state.parent_files_hash;
    let source_changed = observed.clone_head != state.last_sync_commit;

    match (parent_changed, source_changed) {
        (true, true) => SyncStatus::Diverged,
        (true, false) => SyncStatus::Dirty,
        (false, true) => SyncStatus::Behind,
        (false, false) => SyncStatus::Synced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn state(branch: &str, hash: &str, commit: &str) -> SubmoduleState {
        SubmoduleState {
            last_sync_commit: commit.to_string(),
            last_push_commit: commit.to_string(),
            parent_files_hash: hash.to_string(),
            source_branch: branch.to_string(),
            last_sync_time: Utc::now(),
            last_push_time: None,
        }
    }

    fn observed(hash: &str, head: &str) -> Observation {
        Observation {
            current_hash: hash.to_string(),
            clone_head: head.to_string(),
        }
    }

    #[test]
    fn test_no_state_is_behind() {
        assert_eq!(
            classify(None, "main", &observed("h", "c")),
            SyncStatus::Behind
        );
    }

    #[test]
    fn test_synced() {
        let s = state("main", "h1", "c1");
        assert_eq!(
            classify(Some(&s), "main", &observed("h1", "c1")),
            SyncStatus::Synced
        );
    }

    #[test]
    fn test_dirty_when_only_parent_changed() {
        let s = state("main", "h1", "c1");
        assert_eq!(
            classify(Some(&s), "main", &observed("h2", "c1")),
            SyncStatus::Dirty
        );
    }

    #[test]
    fn test_behind_when_only_source_changed() {
        let s = state("main", "h1", "c1");
        assert_eq!(
            classify(Some(&s), "main", &observed("h1", "c2")),
            SyncStatus::Behind
        );
    }

    #[test]
    fn test_diverged_when_both_changed() {
        let s = state("main", "h1", "c1");
        assert_eq!(
            classify(Some(&s), "main", &observed("h2", "c2")),
            SyncStatus::Diverged
        );
    }

    #[test]
    fn test_stale_dominates_everything() {
        let s = state("main", "h1", "c1");
        // Even a fully matching observation is stale under a different
        // expected branch.
        assert_eq!(
            classify(Some(&s), "develop", &observed("h1", "c1")),
            SyncStatus::Stale
        );
        assert_eq!(
            classify(Some(&s), "develop", &observed("h2", "c2")),
            SyncStatus::Stale
        );
    }

    #[test]
    fn test_classifier_is_deterministic() {
        let s = state("main", "h1", "c1");
        let obs = observed("h2", "c1");
        let first = classify(Some(&s), "main", &obs);
        for _ in 0..10 {
            assert_eq!(classify(Some(&s), "main", &obs), first);
        }
    }

    #[test]
    fn test_every_status_has_stable_label() {
        for (status, label) in [
            (SyncStatus::Synced, "SYNCED"),
            (SyncStatus::Dirty, "DIRTY"),
            (SyncStatus::Behind, "BEHIND"),
            (SyncStatus::Ahead, "AHEAD"),
            (SyncStatus::Diverged, "DIVERGED"),
            (SyncStatus::Stale, "STALE"),
        ] {
            assert_eq!(status.as_str(), label);
            assert_eq!(status.to_string(), label);
        }
    }

    #[test]
    fn test_serde_uses_uppercase_labels() {
        let json = serde_json::to_string(&SyncStatus::Diverged).unwrap();
        assert_eq!(json, "\"DIVERGED\"");
        let parsed: SyncStatus = serde_json::from_str("\"STALE\"").unwrap();
        assert_eq!(parsed, SyncStatus::Stale);
    }

    #[test]
    fn test_non_synced_statuses_have_suggestions() {
        assert!(SyncStatus::Synced.suggestion().is_none());
        for status in [
            SyncStatus::Dirty,
            SyncStatus::Behind,
            SyncStatus::Ahead,
            SyncStatus::Diverged,
            SyncStatus::Stale,
        ] {
            assert!(status.suggestion().is_some());
        }
    }
}
