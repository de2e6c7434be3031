//! Typed wrappers around the external `git` binary.
//!
//! This module provides a high-level interface to git operations through the
//! [`GitRepo`] struct. Salt is a coordinator over the `git` executable, so
//! every operation here spawns a subprocess through [`crate::core::process`]
//! and classifies failures into [`SaltError`] kinds by inspecting stderr.
//!
//! # Public API
//! - [`GitRepo`]: handle on a working tree, one method per git operation
//!
//! # Timeouts
//! Network operations carry timeouts (300s for clone, 120s for fetch, pull
//! and push); local queries run unbounded.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::error::{Result, SaltError};
use crate::core::process::{run_command, ProcessOutput};

const CLONE_TIMEOUT: Duration = Duration::from_secs(300);
const TRANSFER_TIMEOUT: Duration = Duration::from_secs(120);

/// A git working tree salt operates on: either a hidden clone under
/// `.salt/repos/` or the parent repository itself.
#[derive(Debug, Clone)]
pub struct GitRepo {
    workdir: PathBuf,
}

impl GitRepo {
    pub fn at(workdir: impl Into<PathBuf>) -> Self {
        GitRepo {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Whether the working tree exists and carries a `.git` directory.
    pub fn exists(&self) -> bool {
        self.workdir.join(".git").exists()
    }

    /// Clone `url` into `dest` on `branch`. A shallow clone uses
    /// `--depth 1 --branch <b> --single-branch`; a full clone `--branch <b>`.
    pub fn clone_repo(url: &str, dest: &Path, branch: &str, shallow: bool) -> Result<GitRepo> {
        let dest_str = dest.to_string_lossy().into_owned();
        let mut args: Vec<&str> = vec!["clone"];
        if shallow {
            args.extend(["--depth", "1", "--single-branch"]);
        }
        args.extend(["--branch", branch, url, dest_str.as_str()]);

        let out = run_command("git", &args, None, Some(CLONE_TIMEOUT))?;
        if !out.success() {
            return Err(SaltError::CloneFailed {
                url: url.to_string(),
                details: out.stderr_trimmed().to_string(),
            });
        }
        Ok(GitRepo::at(dest))
    }

    /// `git fetch origin`
    pub fn fetch(&self) -> Result<()> {
        let out = self.run(&["fetch", "origin"], Some(TRANSFER_TIMEOUT))?;
        if !out.success() {
            return Err(SaltError::git_command_failed(
                "fetch",
                out.stderr_trimmed(),
            ));
        }
        Ok(())
    }

    /// `git fetch origin <branch>`
    pub fn fetch_branch(&self, branch: &str) -> Result<()> {
        let out = self.run(&["fetch", "origin", branch], Some(TRANSFER_TIMEOUT))?;
        if !out.success() {
            return Err(SaltError::git_command_failed(
                "fetch",
                out.stderr_trimmed(),
            ));
        }
        Ok(())
    }

    /// `git checkout <branch>`
    pub fn checkout(&self, branch: &str) -> Result<()> {
        let out = self.run(&["checkout", branch], None)?;
        if !out.success() {
            return Err(SaltError::CheckoutFailed {
                branch: branch.to_string(),
                details: out.stderr_trimmed().to_string(),
            });
        }
        Ok(())
    }

    /// `git pull origin <branch>`. Merge conflicts are classified as
    /// [`SaltError::MergeConflict`]; other failures as [`SaltError::PullFailed`].
    pub fn pull(&self, branch: &str) -> Result<()> {
        let out = self.run(&["pull", "origin", branch], Some(TRANSFER_TIMEOUT))?;
        if !out.success() {
            // Conflict markers can land on either stream.
            let combined = format!("{}\n{}", out.stdout, out.stderr);
            if is_merge_conflict(&combined) {
                return Err(SaltError::merge_conflict(out.stderr_trimmed()));
            }
            return Err(SaltError::PullFailed {
                branch: branch.to_string(),
                details: out.stderr_trimmed().to_string(),
            });
        }
        Ok(())
    }

    /// `git push origin <branch>` with stderr classified into missing
    /// upstream, non-fast-forward rejection, or a generic push failure.
    pub fn push(&self, branch: &str) -> Result<()> {
        let out = self.run(&["push", "origin", branch], Some(TRANSFER_TIMEOUT))?;
        if !out.success() {
            return Err(classify_push_error(branch, out.stderr_trimmed()));
        }
        Ok(())
    }

    /// `git add .`
    pub fn add_all(&self) -> Result<()> {
        let out = self.run(&["add", "."], None)?;
        if !out.success() {
            return Err(SaltError::git_command_failed("add", out.stderr_trimmed()));
        }
        Ok(())
    }

    /// `git add -- <path>`
    pub fn add_path(&self, path: &str) -> Result<()> {
        let out = self.run(&["add", "--", path], None)?;
        if !out.success() {
            return Err(SaltError::git_command_failed("add", out.stderr_trimmed()));
        }
        Ok(())
    }

    /// `git rm -r --cached -- <path>`
    pub fn rm_cached(&self, path: &str) -> Result<()> {
        let out = self.run(&["rm", "-r", "--cached", "--", path], None)?;
        if !out.success() {
            return Err(SaltError::git_command_failed("rm", out.stderr_trimmed()));
        }
        Ok(())
    }

    /// `git commit -m <message>`
    pub fn commit(&self, message: &str) -> Result<()> {
        let out = self.run(&["commit", "-m", message], None)?;
        if !out.success() {
            return Err(SaltError::git_command_failed(
                "commit",
                out.stderr_trimmed(),
            ));
        }
        Ok(())
    }

    /// `git status --porcelain [-- <path>]`, raw output
    pub fn status_porcelain(&self, path: Option<&str>) -> Result<String> {
        let mut args = vec!["status", "--porcelain"];
        if let Some(p) = path {
            args.extend(["--", p]);
        }
        let out = self.run(&args, None)?;
        if !out.success() {
            return Err(SaltError::git_command_failed(
                "status",
                out.stderr_trimmed(),
            ));
        }
        Ok(out.stdout)
    }

    /// Whether the working tree (optionally restricted to `path`) has
    /// uncommitted changes.
    pub fn has_uncommitted_changes(&self, path: Option<&str>) -> Result<bool> {
        Ok(!self.status_porcelain(path)?.trim().is_empty())
    }

    /// Count of modified/untracked entries under `path` (porcelain lines).
    pub fn count_modified_files(&self, path: &str) -> Result<usize> {
        Ok(self
            .status_porcelain(Some(path))?
            .lines()
            .filter(|l| !l.trim().is_empty())
            .count())
    }

    /// `git rev-parse HEAD`
    pub fn head_commit(&self) -> Result<String> {
        let out = self.run(&["rev-parse", "HEAD"], None)?;
        if !out.success() {
            return Err(SaltError::git_command_failed(
                "rev-parse",
                out.stderr_trimmed(),
            ));
        }
        Ok(out.stdout_trimmed().to_string())
    }

    /// `git rev-parse --abbrev-ref HEAD`
    pub fn current_branch(&self) -> Result<String> {
        let out = self.run(&["rev-parse", "--abbrev-ref", "HEAD"], None)?;
        if !out.success() {
            return Err(SaltError::git_command_failed(
                "rev-parse",
                out.stderr_trimmed(),
            ));
        }
        Ok(out.stdout_trimmed().to_string())
    }

    /// `git rev-list --left-right --count <branch>...origin/<branch>`,
    /// returning `(ahead, behind)` relative to the remote.
    pub fn ahead_behind(&self, branch: &str) -> Result<(usize, usize)> {
        let range = format!("{branch}...origin/{branch}");
        let out = self.run(&["rev-list", "--left-right", "--count", &range], None)?;
        if !out.success() {
            return Err(SaltError::git_command_failed(
                "rev-list",
                out.stderr_trimmed(),
            ));
        }
        let mut parts = out.stdout_trimmed().split_whitespace();
        let ahead = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
        let behind = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
        Ok((ahead, behind))
    }

    /// Whether `workdir` is inside a git working tree at all.
    pub fn is_work_tree(&self) -> bool {
        self.run(&["rev-parse", "--is-inside-work-tree"], None)
            .map(|out| out.success() && out.stdout_trimmed() == "true")
            .unwrap_or(false)
    }

    fn run(&self, args: &[&str], timeout: Option<Duration>) -> Result<ProcessOutput> {
        run_command("git", args, Some(&self.workdir), timeout)
    }
}

/// Merge-conflict signatures git prints on conflicting pulls/merges.
fn is_merge_conflict(output: &str) -> bool {
    output.contains("CONFLICT")
        || output.contains("Automatic merge failed")
        || output.contains("needs merge")
        || output.contains("would be overwritten by merge")
}

fn classify_push_error(branch: &str, stderr: &str) -> SaltError {
    let details = if stderr.contains("has no upstream") {
        format!("branch '{branch}' has no upstream on origin")
    } else if stderr.contains("non-fast-forward") || stderr.contains("[rejected]") {
        "remote rejected the push (non-fast-forward); run 'salt pull' first".to_string()
    } else {
        stderr.to_string()
    };
    SaltError::PushFailed {
        branch: branch.to_string(),
        details,
    }
}
