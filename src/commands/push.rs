use clap::Args;

use crate::commands::sync::{sync_submodule, target_branch};
use crate::commands::{select_submodules, CommandContext, CommandReport};
use crate::core::error::{Result, SaltError};
use crate::core::fsutil::copy_tree;
use crate::core::state::SyncState;
use crate::core::{hash_tree, print_info, print_success, Submodule, Workspace};

#[derive(Args, Debug, Default)]
pub struct PushArgs {
    /// Push a single submodule instead of all of them
    pub name: Option<String>,

    /// Passed through to the sync run under --auto-sync
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Sync a stale submodule onto the mapped branch before pushing
    #[arg(long = "auto-sync")]
    pub auto_sync: bool,

    /// Fail fast on the first error (CI mode)
    #[arg(long)]
    pub ci: bool,
}

/// Copy flat-copy edits into the hidden clones, commit, and push upstream.
pub fn execute_push(ctx: CommandContext, args: PushArgs) -> Result<()> {
    let ws = Workspace::open()?;
    let config = ws.load_config()?;
    let submodules = select_submodules(&config, args.name.as_deref())?;

    if submodules.is_empty() {
        if !ctx.quiet {
            print_info("No submodules configured");
        }
        return Ok(());
    }

    let parent_branch = ws.parent_branch();
    let mut state = ws.load_state()?;
    let mut report = CommandReport::new();

    for sub in submodules {
        match push_one(&ws, &mut state, sub, parent_branch.as_deref(), &args) {
            Ok(branch) => {
                if !ctx.quiet {
                    print_success(&format!("Pushed '{}' to origin/{branch}", sub.name));
                }
            }
            Err(e) => report.record(&sub.name, e, args.ci)?,
        }
    }

    report.finish()
}

fn push_one(
    ws: &Workspace,
    state: &mut SyncState,
    sub: &Submodule,
    parent_branch: Option<&str>,
    args: &PushArgs,
) -> Result<String> {
    let record = state
        .get(&sub.name)
        .ok_or_else(|| SaltError::no_state(&sub.name))?;

    // A stale tree holds files from the wrong branch; pushing it would
    // publish them onto the mapped branch. Only an explicit sync clears it.
    let expected = target_branch(sub, parent_branch);
    if record.source_branch != expected {
        if !args.auto_sync {
            return Err(SaltError::branch_mismatch(
                &sub.name,
                &record.source_branch,
                &expected,
            ));
        }
        sync_submodule(ws, state, sub, &expected, args.force)?;
    }

    let record = state
        .get(&sub.name)
        .ok_or_else(|| SaltError::no_state(&sub.name))?;

    let flat_path = ws.submodule_path(&sub.path);
    let current_hash = hash_tree(&flat_path)?;
    if current_hash == record.parent_files_hash {
        return Err(SaltError::no_changes(&sub.name));
    }

    let clone = ws.clone_repo(&sub.name);
    if !clone.exists() {
        return Err(SaltError::source_repo_not_found(&sub.name));
    }

    copy_tree(&flat_path, clone.workdir())?;
    clone.add_all()?;

    // Copied but byte-identical: nothing staged, nothing to commit.
    if clone.status_porcelain(None)?.trim().is_empty() {
        return Err(SaltError::no_changes(&sub.name));
    }

    let message = format!(
        "Update from parent repo (branch: {})",
        parent_branch.unwrap_or(&expected)
    );
    clone.commit(&message)?;

    let branch = clone.current_branch()?;
    clone.push(&branch)?;

    let head = clone.head_commit()?;
    state.update_after_push(&sub.name, &head, &current_hash);
    ws.save_state(state)?;
    Ok(branch)
}
