use clap::Args;

use crate::commands::{select_submodules, CommandContext, CommandReport};
use crate::core::error::{Result, SaltError};
use crate::core::fsutil::copy_tree;
use crate::core::state::SyncState;
use crate::core::{
    hash_tree, print_info, print_success, print_warning, resolve_branch, Submodule, Workspace,
};

#[derive(Args, Debug, Default)]
pub struct SyncArgs {
    /// Sync a single submodule instead of all of them
    pub name: Option<String>,

    /// Overwrite the flat copy even when it has uncommitted changes
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Fail fast on the first error (CI mode)
    #[arg(long)]
    pub ci: bool,
}

/// Check out the branch the current parent branch maps to in every hidden
/// clone and refresh the flat copies.
pub fn execute_sync(ctx: CommandContext, args: SyncArgs) -> Result<()> {
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
        let target = target_branch(sub, parent_branch.as_deref());
        match sync_submodule(&ws, &mut state, sub, &target, args.force) {
            Ok(()) => {
                if !ctx.quiet {
                    print_success(&format!("Synced '{}' to branch {target}", sub.name));
                }
            }
            Err(e) => report.record(&sub.name, e, args.ci)?,
        }
    }

    report.finish()
}

/// The branch a submodule should be on: the mapping applied to the parent
/// branch, or the default branch when the parent branch is undeterminable.
pub(crate) fn target_branch(sub: &Submodule, parent_branch: Option<&str>) -> String {
    match parent_branch {
        Some(branch) => resolve_branch(sub, branch),
        None => sub.default_branch.clone(),
    }
}

/// The sync pipeline for one submodule, including state persistence.
/// Shared with `push --auto-sync`.
pub(crate) fn sync_submodule(
    ws: &Workspace,
    state: &mut SyncState,
    sub: &Submodule,
    target: &str,
    force: bool,
) -> Result<()> {
    let clone = ws.clone_repo(&sub.name);
    if !clone.exists() {
        return Err(SaltError::source_repo_not_found(&sub.name));
    }

    let flat_path = ws.submodule_path(&sub.path);
    if !force && ws.parent_has_changes_under(&sub.path) {
        return Err(SaltError::uncommitted_changes(flat_path));
    }

    if let Err(e) = clone.fetch() {
        print_warning(&format!("Fetch failed for '{}': {e}", sub.name));
    }
    clone.checkout(target)?;
    if let Err(e) = clone.pull(target) {
        match e {
            SaltError::MergeConflict { .. } => return Err(e),
            other => print_warning(&format!(
                "Pull failed for '{}', continuing with local state: {other}",
                sub.name
            )),
        }
    }

    copy_tree(clone.workdir(), &flat_path)?;

    let head = clone.head_commit()?;
    let files_hash = hash_tree(&flat_path)?;
    state.update_after_sync(&sub.name, &head, &files_hash, target);
    ws.save_state(state)?;
    Ok(())
}
