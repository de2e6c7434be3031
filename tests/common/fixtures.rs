//! Predefined test scenarios built on the repository utilities.

#![allow(dead_code)]

use std::path::PathBuf;

use anyhow::Result;
use assert_cmd::prelude::*;

use super::repository::*;

/// Scenario: a parent repository with one submodule `x` already added from
/// a local bare remote, and the flat copy committed in the parent so the
/// working tree starts clean.
pub struct AddedSubmodule {
    pub env: TestEnv,
    pub remote: PathBuf,
}

pub fn setup_added_submodule() -> Result<AddedSubmodule> {
    setup_added_submodule_with_branches(&[])
}

/// Same scenario, with extra branches available on the remote. The clone is
/// taken with `--no-shallow` so every branch is reachable from the hidden
/// clone.
pub fn setup_added_submodule_with_branches(extra_branches: &[&str]) -> Result<AddedSubmodule> {
    let env = setup_parent_repo()?;
    let remote = create_remote_with_branches(&env, "x", extra_branches)?;

    salt_cmd(env.parent())?
        .args(["add", remote.to_str().unwrap(), "--no-shallow"])
        .assert()
        .success();

    commit_all(env.parent(), "Add submodule x")?;
    Ok(AddedSubmodule { env, remote })
}

/// Write a salt.conf with one submodule `x` and the given branch mappings,
/// without running `salt add`.
pub fn write_config_with_mappings(
    env: &TestEnv,
    remote: &std::path::Path,
    mappings: &[(&str, &str)],
) -> Result<()> {
    let mut text = format!(
        "[submodule \"x\"]\n  path = x\n  url = {}\n  default_branch = main\n  shallow = false\n",
        remote.display()
    );
    if !mappings.is_empty() {
        text.push_str("  branches = {\n");
        for (pattern, target) in mappings {
            text.push_str(&format!("    {pattern} -> {target}\n"));
        }
        text.push_str("  }\n");
    }
    std::fs::write(env.parent().join("salt.conf"), text)?;
    Ok(())
}
