//! Repository-root layout and parent-repo queries.
//!
//! A salt workspace is the directory holding `salt.conf`, the `.salt/`
//! metadata directory (state file plus hidden clones under `.salt/repos/`)
//! and the flat submodule copies. Parent-repository Git queries are
//! best-effort: salt also works when the parent directory is not a Git
//! repository at all.

use std::path::{Path, PathBuf};

use crate::core::config::SaltConfig;
use crate::core::error::Result;
use crate::core::git::GitRepo;
use crate::core::state::SyncState;

pub const CONFIG_FILE: &str = "salt.conf";
pub const SALT_DIR: &str = ".salt";
pub const REPOS_DIR: &str = "repos";
pub const STATE_FILE: &str = "state.json";

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Open the workspace at the current directory.
    pub fn open() -> Result<Workspace> {
        Ok(Workspace {
            root: std::env::current_dir()?,
        })
    }

    pub fn at(root: impl Into<PathBuf>) -> Workspace {
        Workspace { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join(SALT_DIR).join(STATE_FILE)
    }

    pub fn repos_dir(&self) -> PathBuf {
        self.root.join(SALT_DIR).join(REPOS_DIR)
    }

    /// The hidden clone directory for a submodule name.
    pub fn clone_dir(&self, name: &str) -> PathBuf {
        self.repos_dir().join(name)
    }

    /// The flat copy location for a submodule's configured path.
    pub fn submodule_path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    pub fn load_config(&self) -> Result<SaltConfig> {
        SaltConfig::load(&self.config_path())
    }

    /// Like [`Workspace::load_config`], but a missing file yields an empty
    /// config (used by `add`, which creates it, and read-only listings).
    pub fn load_config_or_default(&self) -> Result<SaltConfig> {
        match self.load_config() {
            Ok(config) => Ok(config),
            Err(crate::core::error::SaltError::ConfigNotFound) => Ok(SaltConfig::default()),
            Err(e) => Err(e),
        }
    }

    pub fn save_config(&self, config: &SaltConfig) -> Result<()> {
        config.save(&self.config_path())
    }

    pub fn load_state(&self) -> Result<SyncState> {
        SyncState::load(&self.state_path())
    }

    pub fn save_state(&self, state: &SyncState) -> Result<()> {
        state.save(&self.state_path())
    }

    /// Handle on the hidden clone for a submodule.
    pub fn clone_repo(&self, name: &str) -> GitRepo {
        GitRepo::at(self.clone_dir(name))
    }

    /// Handle on the parent repository, if the workspace root is inside one.
    pub fn parent_repo(&self) -> Option<GitRepo> {
        let repo = GitRepo::at(&self.root);
        repo.is_work_tree().then_some(repo)
    }

    /// The parent repository's current branch, when determinable. `None`
    /// outside a Git repo, on an unborn HEAD, or in detached state.
    pub fn parent_branch(&self) -> Option<String> {
        let branch = self.parent_repo()?.current_branch().ok()?;
        (branch != "HEAD" && !branch.is_empty()).then_some(branch)
    }

    /// Whether the parent tree has uncommitted changes under `path`.
    /// Best-effort: outside a Git parent this reports clean.
    pub fn parent_has_changes_under(&self, path: &str) -> bool {
        self.parent_repo()
            .and_then(|repo| repo.has_uncommitted_changes(Some(path)).ok())
            .unwrap_or(false)
    }

    /// Count of modified entries in the parent tree under `path`,
    /// best-effort, 0 on any failure.
    pub fn count_parent_modified(&self, path: &str) -> usize {
        self.parent_repo()
            .and_then(|repo| repo.count_modified_files(path).ok())
            .unwrap_or(0)
    }

    /// Keep `.salt/` out of the parent's index via `.git/info/exclude`; the
    /// hidden clones must never be tracked by the parent. Best-effort, and
    /// a no-op outside a Git parent.
    pub fn exclude_salt_dir(&self) {
        if self.parent_repo().is_none() {
            return;
        }
        let exclude = self.root.join(".git").join("info").join("exclude");
        let entry = format!("{SALT_DIR}/");
        let mut text = std::fs::read_to_string(&exclude).unwrap_or_default();
        if text.lines().any(|line| line.trim() == entry) {
            return;
        }
        if let Some(dir) = exclude.parent() {
            if std::fs::create_dir_all(dir).is_err() {
                return;
            }
        }
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&entry);
        text.push('\n');
        if let Err(e) = std::fs::write(&exclude, text) {
            log::debug!("could not update .git/info/exclude: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_paths() {
        let ws = Workspace::at("/repo");
        assert_eq!(ws.config_path(), PathBuf::from("/repo/salt.conf"));
        assert_eq!(ws.state_path(), PathBuf::from("/repo/.salt/state.json"));
        assert_eq!(ws.clone_dir("x"), PathBuf::from("/repo/.salt/repos/x"));
        assert_eq!(ws.submodule_path("vendor/x"), PathBuf::from("/repo/vendor/x"));
    }

    #[test]
    fn test_load_config_or_default_on_empty_dir() -> Result<()> {
        let dir = TempDir::new()?;
        let ws = Workspace::at(dir.path());
        assert!(ws.load_config_or_default()?.submodules.is_empty());
        assert!(ws.load_config().is_err());
        Ok(())
    }

    #[test]
    fn test_parent_queries_outside_git_repo() -> Result<()> {
        let dir = TempDir::new()?;
        let ws = Workspace::at(dir.path());
        assert!(ws.parent_repo().is_none());
        assert!(ws.parent_branch().is_none());
        assert!(!ws.parent_has_changes_under("anything"));
        assert_eq!(ws.count_parent_modified("anything"), 0);
        Ok(())
    }

    #[test]
    fn test_state_round_trip_through_workspace() -> Result<()> {
        let dir = TempDir::new()?;
        let ws = Workspace::at(dir.path());

        let mut state = ws.load_state()?;
        assert!(state.submodules.is_empty());
        state.initialize("x", "c", "h", "main");
        ws.save_state(&state)?;

        assert_eq!(ws.load_state()?, state);
        Ok(())
    }
}
