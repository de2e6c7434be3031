use assert_cmd::prelude::*;
use predicates::prelude::*;

mod common;
use common::{assertions, fixtures::*, repository::*};

use salt::SyncState;

#[test]
fn test_resolve_clones_from_hand_written_config() -> anyhow::Result<()> {
    let env = setup_parent_repo()?;
    let remote = create_remote(&env, "x")?;
    write_config_with_mappings(&env, &remote, &[])?;

    salt_cmd(env.parent())?
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolved 'x' (fresh clone)"));

    assert!(env.parent().join(".salt/repos/x/.git").exists());
    assert!(env.parent().join("x/README.md").exists());
    assert!(!env.parent().join("x/.git").exists());

    let state = SyncState::load(&env.parent().join(".salt/state.json"))?;
    assert_eq!(state.get("x").unwrap().source_branch, "main");
    Ok(())
}

#[test]
fn test_resolve_updates_existing_clone() -> anyhow::Result<()> {
    let fixture = setup_added_submodule()?;
    let parent = fixture.env.parent();

    push_upstream_commit(
        &fixture.env,
        &fixture.remote,
        "main",
        "NEWS.md",
        "fresh upstream news\n",
    )?;

    salt_cmd(parent)?
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated 'x'"));

    assert!(parent.join("x/NEWS.md").exists());
    Ok(())
}

#[test]
fn test_resolve_skips_on_uncommitted_changes_without_force() -> anyhow::Result<()> {
    let fixture = setup_added_submodule()?;
    let parent = fixture.env.parent();

    create_file(parent, "x/README.md", "precious local edit\n")?;

    salt_cmd(parent)?
        .arg("resolve")
        .assert()
        .success()
        .stdout(assertions::skipped("x"));
    assert_eq!(
        std::fs::read_to_string(parent.join("x/README.md"))?,
        "precious local edit\n"
    );

    salt_cmd(parent)?
        .args(["resolve", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated 'x'"));
    assert_eq!(
        std::fs::read_to_string(parent.join("x/README.md"))?,
        "x submodule\n"
    );
    Ok(())
}

#[test]
fn test_resolve_notices_nested_config() -> anyhow::Result<()> {
    let env = setup_parent_repo()?;

    // A remote whose tree carries its own salt.conf.
    let seed_remote = create_remote(&env, "outer")?;
    push_upstream_commit(
        &env,
        &seed_remote,
        "main",
        "salt.conf",
        "# nested submodules live here\n",
    )?;
    write_config_with_mappings(&env, &seed_remote, &[])?;

    salt_cmd(env.parent())?
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("nested submodules are not resolved"));
    Ok(())
}

#[test]
fn test_resolve_without_config_fails() -> anyhow::Result<()> {
    let env = setup_parent_repo()?;

    salt_cmd(env.parent())?
        .arg("resolve")
        .assert()
        .failure()
        .code(2)
        .stderr(assertions::config_not_found());
    Ok(())
}

#[test]
fn test_init_creates_config_and_is_idempotent() -> anyhow::Result<()> {
    let env = setup_parent_repo()?;

    salt_cmd(env.parent())?
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created salt.conf"));
    assert!(env.parent().join("salt.conf").exists());

    salt_cmd(env.parent())?
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    Ok(())
}
