use assert_cmd::prelude::*;
use predicates::prelude::*;

mod common;
use common::{fixtures::*, repository::*};

use salt::{SaltConfig, SyncState};

#[test]
fn test_remove_keeps_files_by_default() -> anyhow::Result<()> {
    let fixture = setup_added_submodule()?;
    let parent = fixture.env.parent();

    salt_cmd(parent)?
        .args(["remove", "x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed submodule 'x'"))
        .stdout(predicate::str::contains("left in place"));

    // Files preserved, everything else gone.
    assert!(parent.join("x/README.md").exists());
    assert!(!parent.join(".salt/repos/x").exists());
    assert!(SaltConfig::load(&parent.join("salt.conf"))?.find("x").is_none());
    assert!(SyncState::load(&parent.join(".salt/state.json"))?.get("x").is_none());
    Ok(())
}

#[test]
fn test_remove_delete_files_removes_flat_copy() -> anyhow::Result<()> {
    let fixture = setup_added_submodule()?;
    let parent = fixture.env.parent();

    salt_cmd(parent)?
        .args(["remove", "x", "--delete-files"])
        .assert()
        .success();

    assert!(!parent.join("x").exists());
    assert!(!parent.join(".salt/repos/x").exists());
    Ok(())
}

#[test]
fn test_remove_delete_files_with_uncommitted_changes_requires_force() -> anyhow::Result<()> {
    let fixture = setup_added_submodule()?;
    let parent = fixture.env.parent();

    create_file(parent, "x/README.md", "unsaved work\n")?;

    salt_cmd(parent)?
        .args(["remove", "x", "--delete-files"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Uncommitted changes"));

    // Nothing was touched.
    assert!(parent.join("x/README.md").exists());
    assert!(SaltConfig::load(&parent.join("salt.conf"))?.find("x").is_some());

    salt_cmd(parent)?
        .args(["remove", "x", "--delete-files", "--force"])
        .assert()
        .success();
    assert!(!parent.join("x").exists());
    Ok(())
}

#[test]
fn test_remove_unknown_submodule_fails() -> anyhow::Result<()> {
    let fixture = setup_added_submodule()?;

    salt_cmd(fixture.env.parent())?
        .args(["remove", "ghost"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("not configured"));
    Ok(())
}
