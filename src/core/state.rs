//! Persistent sync-state records for every submodule.
//!
//! The state lives in `.salt/state.json`, loaded once per command and saved
//! atomically (write-temp-then-rename) after every mutation, so a crash
//! mid-save leaves the prior state intact.
//!
//! # Public API
//! - [`SubmoduleState`]: one record per submodule name
//! - [`SyncState`]: the versioned container with the three named mutations
//!   (initialize, update-after-sync, update-after-push)
//!
//! Missing state means "never synced"; a missing file loads as an empty
//! container, not an error.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::fsutil::atomic_write;

pub const STATE_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmoduleState {
    /// Commit of the hidden clone at the last successful sync or pull.
    pub last_sync_commit: String,
    /// Commit of the hidden clone at the last successful push.
    pub last_push_commit: String,
    /// Content hash of the flat copy at the moment of the last sync or push.
    pub parent_files_hash: String,
    /// Branch checked out in the hidden clone at the last sync or push.
    pub source_branch: String,
    pub last_sync_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_push_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncState {
    pub version: String,
    pub submodules: BTreeMap<String, SubmoduleState>,
}

impl Default for SyncState {
    fn default() -> Self {
        SyncState {
            version: STATE_VERSION.to_string(),
            submodules: BTreeMap::new(),
        }
    }
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `.salt/state.json`; a missing file yields an empty state.
    pub fn load(path: &Path) -> Result<SyncState> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SyncState::new());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    /// Serialize and atomically replace `.salt/state.json`, creating the
    /// `.salt` directory if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        atomic_write(path, json.as_bytes())
    }

    pub fn get(&self, name: &str) -> Option<&SubmoduleState> {
        self.submodules.get(name)
    }

    /// The `add` mutation: both commits point at the fresh clone's HEAD,
    /// push time unset.
    pub fn initialize(&mut self, name: &str, head: &str, files_hash: &str, branch: &str) {
        self.submodules.insert(
            name.to_string(),
            SubmoduleState {
                last_sync_commit: head.to_string(),
                last_push_commit: head.to_string(),
                parent_files_hash: files_hash.to_string(),
                source_branch: branch.to_string(),
                last_sync_time: Utc::now(),
                last_push_time: None,
            },
        );
    }

    /// The `sync`/`pull`/`resolve` mutation: refresh sync commit, hash,
    /// source branch and sync time; push fields untouched. Creates the
    /// record when the submodule was never initialized.
    pub fn update_after_sync(&mut self, name: &str, head: &str, files_hash: &str, branch: &str) {
        match self.submodules.get_mut(name) {
            Some(record) => {
                record.last_sync_commit = head.to_string();
                record.parent_files_hash = files_hash.to_string();
                record.source_branch = branch.to_string();
                record.last_sync_time = Utc::now();
            }
            None => self.initialize(name, head, files_hash, branch),
        }
    }

    /// The `push` mutation: refresh push commit, hash and push time; sync
    /// fields untouched. Returns whether a record existed to update.
    pub fn update_after_push(&mut self, name: &str, head: &str, files_hash: &str) -> bool {
        match self.submodules.get_mut(name) {
            Some(record) => {
                record.last_push_commit = head.to_string();
                record.parent_files_hash = files_hash.to_string();
                record.last_push_time = Some(Utc::now());
                true
            }
            None => false,
        }
    }

    /// Drop a submodule's record; returns whether one existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.submodules.remove(name).is_some()
    }
}
