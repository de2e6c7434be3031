use clap::Args;

use crate::commands::{select_submodules, CommandContext, CommandReport};
use crate::core::error::{Result, SaltError};
use crate::core::fsutil::copy_tree;
use crate::core::state::SyncState;
use crate::core::{hash_tree, print_info, print_success, print_warning, Submodule, Workspace};

#[derive(Args, Debug, Default)]
pub struct PullArgs {
    /// Pull a single submodule instead of all of them
    pub name: Option<String>,

    /// Fail fast on the first error (CI mode)
    #[arg(long)]
    pub ci: bool,

    /// Accepted for forward compatibility; pulls run serially
    #[arg(long, hide = true)]
    pub parallel: bool,
}

/// Fast-forward every hidden clone on its current branch and refresh the
/// flat copies.
pub fn execute_pull(ctx: CommandContext, args: PullArgs) -> Result<()> {
    let ws = Workspace::open()?;
    let config = ws.load_config()?;
    let submodules = select_submodules(&config, args.name.as_deref())?;

    if submodules.is_empty() {
        if !ctx.quiet {
            print_info("No submodules configured");
        }
        return Ok(());
    }

    let mut state = ws.load_state()?;
    let mut report = CommandReport::new();

    for sub in submodules {
        match pull_one(&ws, &mut state, sub) {
            Ok(Some(branch)) => {
                if !ctx.quiet {
                    print_success(&format!("Pulled '{}' on branch {branch}", sub.name));
                }
            }
            // Skipped on a merge conflict; already reported.
            Ok(None) => {}
            Err(e) => report.record(&sub.name, e, args.ci)?,
        }
    }

    report.finish()
}

/// Pull one submodule. `Ok(None)` means the pull was skipped because the
/// merge conflicted; the conflict is left in the hidden clone for the user
/// and the flat copy and state stay untouched.
fn pull_one(ws: &Workspace, state: &mut SyncState, sub: &Submodule) -> Result<Option<String>> {
    let clone = ws.clone_repo(&sub.name);
    if !clone.exists() {
        return Err(SaltError::source_repo_not_found(&sub.name));
    }

    let branch = clone.current_branch()?;

    // Local commits staged in the hidden clone would be clobbered by a
    // merge; leave them for the user to push first.
    if clone.has_uncommitted_changes(None)? {
        return Err(SaltError::uncommitted_changes(clone.workdir()));
    }

    if let Err(e) = clone.pull(&branch) {
        match e {
            SaltError::MergeConflict { .. } => {
                print_warning(&format!("Skipped '{}': {e}", sub.name));
                return Ok(None);
            }
            other => return Err(other),
        }
    }

    let flat_path = ws.submodule_path(&sub.path);
    copy_tree(clone.workdir(), &flat_path)?;

    let head = clone.head_commit()?;
    let files_hash = hash_tree(&flat_path)?;
    state.update_after_sync(&sub.name, &head, &files_hash, &branch);
    ws.save_state(state)?;
    Ok(Some(branch))
}
