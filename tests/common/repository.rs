//! Git repository management and setup utilities
//!
//! Provides functions for creating parent repositories and local bare
//! "remotes" so clone, pull and push run against the filesystem with no
//! network access.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{ensure, Context, Result};
use tempfile::TempDir;

/// A test environment rooted in one temporary directory:
/// a parent repository plus any bare remotes created next to it.
/// The TempDir must be kept alive for the duration of the test.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub parent: PathBuf,
}

impl TestEnv {
    pub fn parent(&self) -> &Path {
        &self.parent
    }

    /// Scratch space inside the environment (for actor clones etc.).
    pub fn scratch(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

/// Run git with a fixed identity and no user/system config interference.
pub fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GIT_AUTHOR_NAME", "Test User")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test User")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .output()
        .with_context(|| format!("failed to spawn git {args:?}"))?;
    ensure!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Build a `salt` invocation running inside `dir`, with the same pinned
/// git identity so commits made by salt's subprocesses succeed.
pub fn salt_cmd(dir: &Path) -> Result<Command> {
    use assert_cmd::prelude::*;
    let mut cmd = Command::cargo_bin("salt")?;
    cmd.current_dir(dir)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GIT_AUTHOR_NAME", "Test User")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test User")
        .env("GIT_COMMITTER_EMAIL", "test@example.com");
    Ok(cmd)
}

/// Set up a fresh parent repository on branch `main` with one commit.
pub fn setup_parent_repo() -> Result<TestEnv> {
    let temp_dir = TempDir::new()?;
    let parent = temp_dir.path().join("parent");
    fs::create_dir(&parent)?;

    run_git(&parent, &["init", "-b", "main"])?;
    run_git(&parent, &["config", "user.name", "Test User"])?;
    run_git(&parent, &["config", "user.email", "test@example.com"])?;

    create_file(&parent, "README.md", "parent repo\n")?;
    run_git(&parent, &["add", "."])?;
    run_git(&parent, &["commit", "-m", "Initial commit"])?;

    Ok(TestEnv { temp_dir, parent })
}

/// Create a bare remote named `<name>.git` inside the environment, seeded
/// with a commit on `main` containing a README and one source file.
/// Returns the path usable as a clone URL.
pub fn create_remote(env: &TestEnv, name: &str) -> Result<PathBuf> {
    create_remote_with_branches(env, name, &[])
}

/// Like [`create_remote`], but also creates each extra branch with a
/// branch-specific marker file.
pub fn create_remote_with_branches(
    env: &TestEnv,
    name: &str,
    extra_branches: &[&str],
) -> Result<PathBuf> {
    let seed = env.scratch(&format!("{name}-seed"));
    fs::create_dir_all(&seed)?;

    run_git(&seed, &["init", "-b", "main"])?;
    run_git(&seed, &["config", "user.name", "Test User"])?;
    run_git(&seed, &["config", "user.email", "test@example.com"])?;

    create_file(&seed, "README.md", &format!("{name} submodule\n"))?;
    create_file(&seed, "src/lib.rs", "pub fn hello() {}\n")?;
    run_git(&seed, &["add", "."])?;
    run_git(&seed, &["commit", "-m", "Initial commit"])?;

    for branch in extra_branches {
        run_git(&seed, &["checkout", "-b", branch])?;
        create_file(&seed, &format!("{branch}.marker"), &format!("on {branch}\n"))?;
        run_git(&seed, &["add", "."])?;
        run_git(&seed, &["commit", "-m", &format!("Branch {branch}")])?;
        run_git(&seed, &["checkout", "main"])?;
    }

    let bare = env.scratch(&format!("{name}.git"));
    run_git(
        env.temp_dir.path(),
        &[
            "clone",
            "--bare",
            seed.to_str().unwrap(),
            bare.to_str().unwrap(),
        ],
    )?;
    Ok(bare)
}

/// Simulate another actor: clone the bare remote, add a file on `branch`,
/// and push it back.
pub fn push_upstream_commit(
    env: &TestEnv,
    remote: &Path,
    branch: &str,
    filename: &str,
    content: &str,
) -> Result<()> {
    let actor = env.scratch(&format!("actor-{filename}"));
    run_git(
        env.temp_dir.path(),
        &[
            "clone",
            "--branch",
            branch,
            remote.to_str().unwrap(),
            actor.to_str().unwrap(),
        ],
    )?;
    create_file(&actor, filename, content)?;
    run_git(&actor, &["add", "."])?;
    run_git(&actor, &["commit", "-m", &format!("Add {filename}")])?;
    run_git(&actor, &["push", "origin", branch])?;
    Ok(())
}

/// Create a file (and its parent directories) with the given content.
pub fn create_file(root: &Path, rel: &str, content: &str) -> Result<()> {
    let path = root.join(rel);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Stage and commit everything in the parent repository.
pub fn commit_all(repo: &Path, message: &str) -> Result<()> {
    run_git(repo, &["add", "-A"])?;
    run_git(repo, &["commit", "-m", message])?;
    Ok(())
}

/// HEAD commit of a repository (works for bare remotes too).
pub fn head_of(repo: &Path) -> Result<String> {
    Ok(run_git(repo, &["rev-parse", "HEAD"])?.trim().to_string())
}

/// Subject line of the newest commit on `branch` in a repository.
pub fn latest_subject(repo: &Path, branch: &str) -> Result<String> {
    Ok(run_git(repo, &["log", "-1", "--format=%s", branch])?
        .trim()
        .to_string())
}
