use clap::Args;

use crate::commands::CommandContext;
use crate::core::error::{Result, SaltError};
use crate::core::fsutil::copy_tree;
use crate::core::{
    hash_tree, print_detail, print_success, print_warning, GitRepo, Submodule, Workspace,
};

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Remote Git URL of the submodule
    pub url: String,

    /// Directory inside the parent tree for the flat copy (defaults to the
    /// repository name)
    pub path: Option<String>,

    /// Branch to clone and use as the default
    #[arg(short = 'b', long = "branch", default_value = "main")]
    pub branch: String,

    /// Submodule name (defaults to the repository name from the URL)
    #[arg(short = 'n', long = "name")]
    pub name: Option<String>,

    /// Clone with --depth 1 (the default)
    #[arg(long, conflicts_with = "no_shallow")]
    pub shallow: bool,

    /// Clone the full history
    #[arg(long = "no-shallow")]
    pub no_shallow: bool,
}

impl AddArgs {
    fn shallow(&self) -> bool {
        !self.no_shallow
    }
}

/// Clone a new submodule, materialize its flat copy, and register it in
/// `salt.conf` and the sync state.
pub fn execute_add(ctx: CommandContext, args: AddArgs) -> Result<()> {
    let ws = Workspace::open()?;
    let mut config = ws.load_config_or_default()?;

    let name = match &args.name {
        Some(name) => name.clone(),
        None => derive_name(&args.url),
    };
    let path = args.path.clone().unwrap_or_else(|| name.clone());

    if config.find(&name).is_some() {
        return Err(SaltError::submodule_already_exists(&name));
    }
    let flat_path = ws.submodule_path(&path);
    if flat_path.exists() {
        return Err(SaltError::path_already_exists(flat_path));
    }
    let clone_dir = ws.clone_dir(&name);
    if clone_dir.exists() {
        return Err(SaltError::submodule_already_exists(&name));
    }

    ws.exclude_salt_dir();
    std::fs::create_dir_all(ws.repos_dir())?;
    let clone = GitRepo::clone_repo(&args.url, &clone_dir, &args.branch, args.shallow())?;

    copy_tree(clone.workdir(), &flat_path)?;

    // The parent may not be a Git repository at all; registration is
    // best-effort.
    match ws.parent_repo() {
        Some(parent) => {
            if let Err(e) = parent.add_path(&path) {
                print_warning(&format!("Could not register '{path}' with the parent repo: {e}"));
            }
        }
        None => log::debug!("no parent git repository, skipping index registration"),
    }

    let mut submodule = Submodule::new(&name, &path, &args.url, &args.branch);
    submodule.shallow = args.shallow();
    config.upsert(submodule);
    ws.save_config(&config)?;

    let head = clone.head_commit()?;
    let files_hash = hash_tree(&flat_path)?;
    let mut state = ws.load_state()?;
    state.initialize(&name, &head, &files_hash, &args.branch);
    ws.save_state(&state)?;

    if !ctx.quiet {
        print_success(&format!("Added submodule '{name}' at {path}"));
        if ctx.verbose {
            print_detail(&format!("branch {} @ {}", args.branch, &head[..head.len().min(7)]));
        }
    }
    Ok(())
}

/// Derive a submodule name from the last path segment of a Git URL,
/// dropping a `.git` suffix.
fn derive_name(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed
        .rsplit(|c| c == '/' || c == ':')
        .next()
        .unwrap_or(trimmed);
    last.strip_suffix(".git").unwrap_or(last).to_string()
}
