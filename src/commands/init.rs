use clap::Args;

use crate::commands::CommandContext;
use crate::core::error::Result;
use crate::core::workspace::CONFIG_FILE;
use crate::core::{print_success, print_warning, Workspace};

#[derive(Args, Debug, Default)]
pub struct InitArgs {}

const TEMPLATE: &str = "\
# Salt submodule configuration.
#
# Declare submodules with:
#
#   [submodule \"<name>\"]
#     path = <directory inside this repo>
#     url = <remote git url>
#     default_branch = <branch>
#     shallow = true
#     branches = {
#       <parent branch pattern> -> <submodule branch>
#     }
#
# Or let 'salt add <url>' write the entry for you.
";

/// Create an empty `salt.conf` in the current directory.
pub fn execute_init(ctx: CommandContext, _args: InitArgs) -> Result<()> {
    let ws = Workspace::open()?;
    let config_path = ws.config_path();

    if config_path.exists() {
        if !ctx.quiet {
            print_warning(&format!("{CONFIG_FILE} already exists, nothing to do"));
        }
        return Ok(());
    }

    std::fs::write(&config_path, TEMPLATE)?;
    if !ctx.quiet {
        print_success(&format!("Created {CONFIG_FILE}"));
    }
    Ok(())
}
