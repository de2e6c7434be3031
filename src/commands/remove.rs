use clap::Args;

use crate::commands::CommandContext;
use crate::core::error::{Result, SaltError};
use crate::core::fsutil::remove_tree_if_exists;
use crate::core::{print_success, print_warning, Workspace};

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Submodule to remove
    pub name: String,

    /// Also delete the flat copy from the parent tree
    #[arg(long = "delete-files")]
    pub delete_files: bool,

    /// Delete the flat copy even when it has uncommitted changes
    #[arg(short = 'f', long)]
    pub force: bool,
}

/// Drop a submodule: its config entry, its hidden clone, its state record,
/// and optionally its flat copy.
pub fn execute_remove(ctx: CommandContext, args: RemoveArgs) -> Result<()> {
    let ws = Workspace::open()?;
    let mut config = ws.load_config()?;

    let sub = config
        .find(&args.name)
        .ok_or_else(|| SaltError::submodule_not_found(&args.name))?
        .clone();

    if args.delete_files && !args.force && ws.parent_has_changes_under(&sub.path) {
        return Err(SaltError::uncommitted_changes(ws.submodule_path(&sub.path)));
    }

    if args.delete_files {
        remove_tree_if_exists(&ws.submodule_path(&sub.path))?;
        // Untracked paths make this a no-op failure; the files are already
        // gone either way.
        if let Some(parent) = ws.parent_repo() {
            if let Err(e) = parent.rm_cached(&sub.path) {
                log::debug!("git rm --cached {} failed: {e}", sub.path);
            }
        }
    }

    remove_tree_if_exists(&ws.clone_dir(&sub.name))?;

    config.remove(&sub.name);
    ws.save_config(&config)?;

    let mut state = ws.load_state()?;
    if state.remove(&sub.name) {
        ws.save_state(&state)?;
    }

    if !ctx.quiet {
        print_success(&format!("Removed submodule '{}'", sub.name));
        if !args.delete_files {
            print_warning(&format!(
                "Files at '{}' were left in place (use --delete-files to remove them)",
                sub.path
            ));
        }
    }
    Ok(())
}
