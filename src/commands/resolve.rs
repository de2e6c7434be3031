use clap::Args;

use crate::commands::{select_submodules, CommandContext, CommandReport};
use crate::core::error::{Result, SaltError};
use crate::core::fsutil::copy_tree;
use crate::core::workspace::CONFIG_FILE;
use crate::core::{
    hash_tree, print_info, print_success, print_warning, GitRepo, Submodule, Workspace,
};

#[derive(Args, Debug, Default)]
pub struct ResolveArgs {
    /// Resolve a single submodule instead of all of them
    pub name: Option<String>,

    /// Overwrite the flat copy even when it has uncommitted changes
    #[arg(short = 'f', long)]
    pub force: bool,
}

enum Outcome {
    Resolved,
    Updated,
}

/// Materialize every submodule on its default branch: clone missing hidden
/// clones, update existing ones, and refresh the flat copies.
pub fn execute_resolve(ctx: CommandContext, args: ResolveArgs) -> Result<()> {
    let ws = Workspace::open()?;
    let config = ws.load_config()?;
    let submodules = select_submodules(&config, args.name.as_deref())?;

    if submodules.is_empty() {
        if !ctx.quiet {
            print_info("No submodules configured");
        }
        return Ok(());
    }

    ws.exclude_salt_dir();
    let mut state = ws.load_state()?;
    let mut report = CommandReport::new();

    for sub in submodules {
        match resolve_one(&ws, &mut state, sub, args.force) {
            Ok(outcome) => {
                if !ctx.quiet {
                    match outcome {
                        Outcome::Resolved => {
                            print_success(&format!("Resolved '{}' (fresh clone)", sub.name))
                        }
                        Outcome::Updated => print_success(&format!("Updated '{}'", sub.name)),
                    }
                }
                notice_nested_config(&ws, sub);
            }
            Err(e) => report.record(&sub.name, e, false)?,
        }
    }

    report.finish()
}

fn resolve_one(
    ws: &Workspace,
    state: &mut crate::core::SyncState,
    sub: &Submodule,
    force: bool,
) -> Result<Outcome> {
    let clone_dir = ws.clone_dir(&sub.name);
    let flat_path = ws.submodule_path(&sub.path);

    let (clone, outcome) = if !clone_dir.join(".git").exists() {
        std::fs::create_dir_all(ws.repos_dir())?;
        let clone = GitRepo::clone_repo(&sub.url, &clone_dir, &sub.default_branch, sub.shallow)?;
        (clone, Outcome::Resolved)
    } else {
        let clone = GitRepo::at(&clone_dir);
        if let Err(e) = clone.fetch() {
            print_warning(&format!("Fetch failed for '{}': {e}", sub.name));
        }
        clone.checkout(&sub.default_branch)?;
        if let Err(e) = clone.pull(&sub.default_branch) {
            match e {
                SaltError::MergeConflict { .. } => return Err(e),
                other => print_warning(&format!(
                    "Pull failed for '{}', using local state: {other}",
                    sub.name
                )),
            }
        }
        (clone, Outcome::Updated)
    };

    if !force && ws.parent_has_changes_under(&sub.path) {
        return Err(SaltError::uncommitted_changes(flat_path));
    }

    copy_tree(clone.workdir(), &flat_path)?;

    let head = clone.head_commit()?;
    let files_hash = hash_tree(&flat_path)?;
    state.update_after_sync(&sub.name, &head, &files_hash, &sub.default_branch);
    ws.save_state(state)?;
    Ok(outcome)
}

/// A submodule carrying its own salt.conf has nested dependencies salt does
/// not resolve automatically.
fn notice_nested_config(ws: &Workspace, sub: &Submodule) {
    if ws.submodule_path(&sub.path).join(CONFIG_FILE).exists() {
        print_warning(&format!(
            "'{}' has its own {CONFIG_FILE}; nested submodules are not resolved automatically",
            sub.name
        ));
    }
}
